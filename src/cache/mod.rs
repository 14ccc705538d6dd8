//! In-memory expiring caches shared by client operations.
//!
//! [`ClientCache`] holds the access token and the two catalog collections
//! that rarely change (categories and payment methods). It is created once
//! per [`crate::OpenTradeClient`] by default, and can be shared between
//! several clients of the same process through an `Arc`.
//!
//! All entries live in memory only and are lost on restart.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use opentrade_api::cache::{ClientCache, ManualClock};
//!
//! let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
//! let cache = ClientCache::with_clock(clock);
//! assert!(cache.cached_access_token().is_none());
//! ```

mod ttl_cell;

pub use ttl_cell::{CachedValue, TtlCell};

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::auth::{AuthError, ACCESS_TOKEN_TTL_MINUTES};
use crate::rest::{Category, PaymentMethod};

/// Lifetime of the cached categories and payment methods (24 hours).
pub const CATALOG_TTL_MINUTES: i64 = 1440;

/// Source of the current time for cache expiry.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Useful to exercise expiry without waiting.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock stopped at `start`.
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Sets the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marker error for a catalog refresh that failed.
///
/// The cause has already been logged; callers fall back to an empty list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CatalogUnavailable;

/// Expiring caches used by the client.
///
/// | Entry | TTL |
/// |---|---|
/// | access token | 58 minutes |
/// | categories | 1440 minutes |
/// | payment methods | 1440 minutes |
pub struct ClientCache {
    clock: Arc<dyn Clock>,
    access_token: TtlCell<String, AuthError>,
    categories: TtlCell<Vec<Category>, CatalogUnavailable>,
    payments: TtlCell<Vec<PaymentMethod>, CatalogUnavailable>,
}

impl ClientCache {
    /// Creates an empty cache driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            access_token: TtlCell::new(Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)),
            categories: TtlCell::new(Duration::minutes(CATALOG_TTL_MINUTES)),
            payments: TtlCell::new(Duration::minutes(CATALOG_TTL_MINUTES)),
        }
    }

    /// Returns the clock driving expiry.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Returns the cached access token if it is still live.
    #[must_use]
    pub fn cached_access_token(&self) -> Option<String> {
        self.access_token.peek(self.clock.now())
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.access_token.invalidate();
        self.categories.invalidate();
        self.payments.invalidate();
    }

    pub(crate) const fn access_token(&self) -> &TtlCell<String, AuthError> {
        &self.access_token
    }

    pub(crate) const fn categories(&self) -> &TtlCell<Vec<Category>, CatalogUnavailable> {
        &self.categories
    }

    pub(crate) const fn payments(&self) -> &TtlCell<Vec<PaymentMethod>, CatalogUnavailable> {
        &self.payments
    }
}

impl Default for ClientCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCache")
            .field("clock", &self.clock)
            .field("access_token", &self.access_token)
            .field("categories", &self.categories)
            .field("payments", &self.payments)
            .finish()
    }
}

// Verify ClientCache is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientCache>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttls_match_service_contract() {
        let cache = ClientCache::new();
        assert_eq!(cache.access_token().ttl(), Duration::minutes(58));
        assert_eq!(cache.categories().ttl(), Duration::minutes(1440));
        assert_eq!(cache.payments().ttl(), Duration::minutes(1440));
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.advance(Duration::minutes(58));
        assert_eq!(clock.now(), start + Duration::minutes(58));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[tokio::test]
    async fn test_clear_drops_cached_token() {
        let cache = ClientCache::new();
        let token = cache
            .access_token()
            .get_or_try_refresh(cache.clock(), || async { Ok("abc".to_string()) })
            .await;

        assert_eq!(token, Ok("abc".to_string()));
        assert_eq!(cache.cached_access_token(), Some("abc".to_string()));

        cache.clear();
        assert!(cache.cached_access_token().is_none());
    }

    #[test]
    fn test_debug_does_not_print_token() {
        let cache = ClientCache::new();
        let debug = format!("{cache:?}");
        assert!(debug.contains("ClientCache"));
        assert!(debug.contains("empty"));
    }
}
