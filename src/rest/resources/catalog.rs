//! Categories and payment methods.
//!
//! Both lists change rarely and are cached for
//! [`CATALOG_TTL_MINUTES`](crate::cache::CATALOG_TTL_MINUTES). A failed
//! refresh is logged and yields an empty list; it is not cached, so the next
//! call tries again.

use serde::de::DeserializeOwned;

use crate::cache::CatalogUnavailable;
use crate::error::Error;
use crate::rest::{Category, OpenTradeClient, Operation, PaymentMethod, Query};

impl OpenTradeClient {
    /// Returns every category, from cache when possible.
    ///
    /// Never fails: upstream errors are logged and an empty list is returned.
    pub async fn get_categories(&self) -> Vec<Category> {
        let cache = self.cache().as_ref();
        cache
            .categories()
            .get_or_try_refresh(cache.clock(), move || {
                self.fetch_catalog(Operation::Categories, "/categories")
            })
            .await
            .unwrap_or_default()
    }

    /// Returns the category with the given id, looked up in
    /// [`get_categories`](Self::get_categories).
    pub async fn get_category(&self, category_id: &str) -> Option<Category> {
        self.get_categories()
            .await
            .into_iter()
            .find(|category| category.id == category_id)
    }

    /// Returns every payment method, from cache when possible.
    ///
    /// Never fails: upstream errors are logged and an empty list is returned.
    pub async fn get_payments(&self) -> Vec<PaymentMethod> {
        let cache = self.cache().as_ref();
        cache
            .payments()
            .get_or_try_refresh(cache.clock(), move || {
                self.fetch_catalog(Operation::Payments, "/payments")
            })
            .await
            .unwrap_or_default()
    }

    async fn fetch_catalog<T: DeserializeOwned>(
        &self,
        operation: Operation,
        path: &str,
    ) -> Result<Vec<T>, CatalogUnavailable> {
        tracing::debug!(path, "catalog cache miss");

        let result = self
            .call(operation, path, Query::new(), None)
            .await
            .and_then(|data| {
                serde_json::from_value::<Vec<T>>(data)
                    .map_err(|e| Error::malformed(format!("unexpected {path} payload: {e}")))
            });

        result.map_err(|error| {
            let detail = error.as_api_error().and_then(|e| e.debug_detail());
            tracing::error!(path, %error, debug = ?detail, "could not load catalog, returning an empty list");
            CatalogUnavailable
        })
    }
}
