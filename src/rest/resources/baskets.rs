//! Shopping baskets.

use serde_json::Value;

use crate::clients::RequestBody;
use crate::error::Error;
use crate::rest::client::query;
use crate::rest::validation::{require_limit, require_non_empty, segment};
use crate::rest::{OpenTradeClient, Operation, Query};

impl OpenTradeClient {
    /// Lists the baskets of a user.
    ///
    /// An empty response body yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty or `limit`
    /// is zero.
    pub async fn get_baskets(&self, user_id: &str, limit: u32, offset: u32) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_limit(limit)?;

        let path = format!("/baskets/user/{}", segment(user_id));
        self.call(
            Operation::Baskets,
            &path,
            query([("limit", &limit), ("offset", &offset)]),
            None,
        )
        .await
    }

    /// Changes the quantity of a purchase in a basket by `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any id is empty.
    pub async fn increase_purchase_in_basket(
        &self,
        user_id: &str,
        basket_id: &str,
        purchase_id: &str,
        value: i64,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("basket_id", basket_id)?;
        require_non_empty("purchase_id", purchase_id)?;

        let path = format!(
            "/baskets/{}/user/{}/purchases/{}",
            segment(basket_id),
            segment(user_id),
            segment(purchase_id)
        );
        let body = RequestBody::form([("value", value.to_string())]);
        self.call(Operation::IncreasePurchase, &path, Query::new(), Some(body))
            .await
    }
}
