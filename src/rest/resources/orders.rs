//! Orders: history, placing and searching.

use serde_json::Value;

use crate::clients::RequestBody;
use crate::error::Error;
use crate::rest::client::query;
use crate::rest::validation::{require_limit, require_non_empty, segment};
use crate::rest::{OpenTradeClient, Operation, Query};

/// Fields returned by [`OpenTradeClient::get_one_order`].
const ONE_ORDER_FIELDS: &[&str] = &["total", "id", "orderAlias", "status", "date"];

fn fields_param(fields: &[&str]) -> Result<String, Error> {
    serde_json::to_string(fields)
        .map_err(|e| Error::invalid_argument(format!("fields cannot be encoded: {e}")))
}

impl OpenTradeClient {
    async fn list_orders(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
        fields: &[&str],
    ) -> Result<Value, Error> {
        require_limit(limit)?;

        let fields = fields_param(fields)?;
        let params = query([("limit", &limit), ("offset", &offset), ("fields", &fields)]);
        self.call(Operation::OrderList, path, params, None).await
    }

    /// Lists the orders received by a trader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `trader_id` is empty or `limit`
    /// is zero.
    pub async fn get_trader_orders(
        &self,
        trader_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value, Error> {
        require_non_empty("trader_id", trader_id)?;
        let path = format!("/orders/traders/{}", segment(trader_id));
        self.list_orders(&path, limit, offset, &[]).await
    }

    /// Lists the orders placed by a customer, projected on `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `customer_id` is empty or
    /// `limit` is zero.
    pub async fn get_customer_orders(
        &self,
        customer_id: &str,
        limit: u32,
        offset: u32,
        fields: &[&str],
    ) -> Result<Value, Error> {
        require_non_empty("customer_id", customer_id)?;
        let path = format!("/orders/customers/{}", segment(customer_id));
        self.list_orders(&path, limit, offset, fields).await
    }

    /// Returns one order of a customer, optionally scoped to a trader.
    ///
    /// When the order does not exist (HTTP 404) the service message is
    /// returned as a JSON string instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `order_id` or `customer_id` is
    /// empty.
    pub async fn get_one_order(
        &self,
        order_id: &str,
        customer_id: &str,
        trader_id: Option<&str>,
    ) -> Result<Value, Error> {
        require_non_empty("order_id", order_id)?;
        require_non_empty("customer_id", customer_id)?;

        let path = match trader_id.filter(|id| !id.is_empty()) {
            Some(trader_id) => format!(
                "/orders/{}/traders/{}/customers/{}",
                segment(order_id),
                segment(trader_id),
                segment(customer_id)
            ),
            None => format!(
                "/orders/{}/customers/{}",
                segment(order_id),
                segment(customer_id)
            ),
        };

        let fields = fields_param(ONE_ORDER_FIELDS)?;
        self.call(Operation::OneOrder, &path, query([("fields", &fields)]), None)
            .await
    }

    /// Places an order and returns its id.
    ///
    /// `backend_url` is called back by the service when the payment
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with
    /// [`MERCHANT_INACTIVE_MESSAGE`](crate::rest::MERCHANT_INACTIVE_MESSAGE)
    /// when the service answers HTTP 204, and for any status other than 201.
    pub async fn order(&self, user_id: &str, backend_url: &str, order: Value) -> Result<String, Error> {
        require_non_empty("user_id", user_id)?;

        let path = format!("/orders/customers/{}", segment(user_id));
        let data = self
            .call(
                Operation::PlaceOrder,
                &path,
                query([("backend_url", &backend_url)]),
                Some(RequestBody::Json(order)),
            )
            .await?;

        match data {
            Value::String(id) => Ok(id),
            other => Err(Error::malformed(format!(
                "expected the order id as a string, got {other}"
            ))),
        }
    }

    /// Searches the order history of a user.
    ///
    /// Returns an empty list when nothing matches (HTTP 204 or 404).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty or `limit`
    /// is zero.
    pub async fn search_orders(
        &self,
        user_id: &str,
        criteria: Query,
        limit: u32,
        offset: u32,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_limit(limit)?;

        let path = format!("/orders/search/{}", segment(user_id));
        self.call(
            Operation::SearchOrders,
            &path,
            query([("limit", &limit), ("offset", &offset)]),
            Some(RequestBody::Form(criteria)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_sent_as_json_array() {
        assert_eq!(fields_param(&[]).unwrap(), "[]");
        assert_eq!(
            fields_param(ONE_ORDER_FIELDS).unwrap(),
            r#"["total","id","orderAlias","status","date"]"#
        );
    }
}
