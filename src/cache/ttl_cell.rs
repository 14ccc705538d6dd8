//! A single expiring value with single-flight refresh.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::cache::Clock;

/// Outcome of an in-flight refresh, `None` until the leader finishes.
type Shared<T, E> = Option<Result<T, E>>;

/// A cached value and the instant it stops being served.
///
/// Entries are replaced wholesale on refresh, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedValue<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

impl<T> CachedValue<T> {
    /// Creates an entry expiring at `expires_at`.
    #[must_use]
    pub const fn new(value: T, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Returns the cached value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Returns the expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` while `now` is strictly before the expiry instant.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

enum Slot<T, E> {
    Empty,
    Ready(CachedValue<T>),
    Loading(watch::Receiver<Shared<T, E>>),
}

enum Claim<T, E> {
    Hit(T),
    Wait(watch::Receiver<Shared<T, E>>),
    Lead(watch::Sender<Shared<T, E>>),
}

/// An expiring cache slot whose refresh runs at most once at a time.
///
/// Callers that miss while a refresh is in flight wait for it and receive
/// the same value or the same error. If the refreshing future is dropped
/// before it completes, the next caller starts a new refresh.
///
/// Failed refreshes are not cached.
pub struct TtlCell<T, E> {
    ttl: Duration,
    slot: Mutex<Slot<T, E>>,
}

impl<T, E> TtlCell<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Creates an empty cell whose entries live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(Slot::Empty),
        }
    }

    /// Returns the lifetime given to new entries.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value if it is still live at `now`.
    #[must_use]
    pub fn peek(&self, now: DateTime<Utc>) -> Option<T> {
        match &*self.lock() {
            Slot::Ready(entry) if entry.is_live(now) => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Drops the cached value. An in-flight refresh is left to complete.
    pub fn invalidate(&self) {
        let mut slot = self.lock();
        if matches!(*slot, Slot::Ready(_)) {
            *slot = Slot::Empty;
        }
    }

    /// Returns the live value, or runs `refresh` to obtain a new one.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `refresh`, either from this caller's
    /// own refresh or from the one it waited on.
    pub async fn get_or_try_refresh<F, Fut>(&self, clock: &dyn Clock, refresh: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let leader = loop {
            match self.claim(clock.now()) {
                Claim::Hit(value) => return Ok(value),
                Claim::Wait(rx) => {
                    if let Some(result) = Self::wait(rx).await {
                        return result;
                    }
                }
                Claim::Lead(tx) => break tx,
            }
        };

        let result = refresh().await;
        self.store(&result, clock.now());
        leader.send_replace(Some(result.clone()));
        result
    }

    fn claim(&self, now: DateTime<Utc>) -> Claim<T, E> {
        let mut slot = self.lock();
        match &*slot {
            Slot::Ready(entry) if entry.is_live(now) => return Claim::Hit(entry.value.clone()),
            // A closed channel means the leader was dropped mid-refresh.
            Slot::Loading(rx) if rx.has_changed().is_ok() => return Claim::Wait(rx.clone()),
            _ => {}
        }

        let (tx, rx) = watch::channel(None);
        *slot = Slot::Loading(rx);
        Claim::Lead(tx)
    }

    async fn wait(mut rx: watch::Receiver<Shared<T, E>>) -> Shared<T, E> {
        if rx.wait_for(Option::is_some).await.is_err() {
            return None;
        }
        let shared = rx.borrow().clone();
        shared
    }

    fn store(&self, result: &Result<T, E>, now: DateTime<Utc>) {
        let mut slot = self.lock();
        *slot = match result {
            Ok(value) => Slot::Ready(CachedValue::new(value.clone(), now + self.ttl)),
            Err(_) => Slot::Empty,
        };
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T, E>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> fmt::Debug for TtlCell<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot.try_lock().as_deref() {
            Ok(Slot::Empty) => "empty",
            Ok(Slot::Ready(_)) => "ready",
            Ok(Slot::Loading(_)) => "loading",
            Err(_) => "locked",
        };
        f.debug_struct("TtlCell")
            .field("ttl", &self.ttl)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_cached_value_is_dead_at_expiry_instant() {
        let entry = CachedValue::new("v", start() + Duration::minutes(1));
        assert!(entry.is_live(start()));
        assert!(!entry.is_live(start() + Duration::minutes(1)));
    }

    #[tokio::test]
    async fn test_hit_does_not_refresh() {
        let clock = ManualClock::new(start());
        let cell: TtlCell<String, ()> = TtlCell::new(Duration::minutes(5));
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        for _ in 0..3 {
            let value = cell
                .get_or_try_refresh(&clock, || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok("token".to_string())
                })
                .await;
            assert_eq!(value, Ok("token".to_string()));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.peek(clock.now()), Some("token".to_string()));
    }

    #[tokio::test]
    async fn test_expired_entry_is_refreshed() {
        let clock = ManualClock::new(start());
        let cell: TtlCell<u32, ()> = TtlCell::new(Duration::minutes(5));

        let first = cell.get_or_try_refresh(&clock, || async { Ok(1) }).await;
        clock.advance(Duration::minutes(5));
        assert_eq!(cell.peek(clock.now()), None);
        let second = cell.get_or_try_refresh(&clock, || async { Ok(2) }).await;

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(2));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let clock = ManualClock::new(start());
        let cell: TtlCell<u32, &'static str> = TtlCell::new(Duration::minutes(5));

        let failed = cell.get_or_try_refresh(&clock, || async { Err("down") }).await;
        let recovered = cell.get_or_try_refresh(&clock, || async { Ok(7) }).await;

        assert_eq!(tokio_test::assert_err!(failed), "down");
        assert_eq!(tokio_test::assert_ok!(recovered), 7);
    }

    #[test]
    fn test_peek_on_empty_cell_does_not_block() {
        let clock = ManualClock::new(start());
        let cell: TtlCell<u32, ()> = TtlCell::new(Duration::minutes(5));

        assert_eq!(cell.peek(clock.now()), None);
        let value = tokio_test::block_on(cell.get_or_try_refresh(&clock, || async { Ok(3) }));
        assert_eq!(value, Ok(3));
        assert_eq!(cell.peek(clock.now()), Some(3));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let clock = ManualClock::new(start());
        let cell: TtlCell<u32, ()> = TtlCell::new(Duration::minutes(5));

        let _ = cell.get_or_try_refresh(&clock, || async { Ok(1) }).await;
        cell.invalidate();
        let value = cell.get_or_try_refresh(&clock, || async { Ok(2) }).await;

        assert_eq!(value, Ok(2));
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_refresh() {
        let clock = Arc::new(ManualClock::new(start()));
        let cell: Arc<TtlCell<u32, String>> = Arc::new(TtlCell::new(Duration::minutes(5)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let clock = Arc::clone(&clock);
            let cell = Arc::clone(&cell);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cell.get_or_try_refresh(clock.as_ref(), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    Ok(42)
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waiters_receive_the_leaders_error() {
        let clock = Arc::new(ManualClock::new(start()));
        let cell: Arc<TtlCell<u32, String>> = Arc::new(TtlCell::new(Duration::minutes(5)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let clock = Arc::clone(&clock);
            let cell = Arc::clone(&cell);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cell.get_or_try_refresh(clock.as_ref(), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    Err::<u32, String>("refused".to_string())
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Err("refused".to_string()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_leader_hands_over_refresh() {
        let clock = ManualClock::new(start());
        let cell: TtlCell<u32, ()> = TtlCell::new(Duration::minutes(5));

        let stalled = cell.get_or_try_refresh(&clock, || async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok(1)
        });
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(10), stalled).await;
        assert!(timed_out.is_err());

        let value = cell.get_or_try_refresh(&clock, || async { Ok(2) }).await;
        assert_eq!(value, Ok(2));
    }
}
