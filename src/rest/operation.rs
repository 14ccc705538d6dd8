//! Per-endpoint decoding rules.
//!
//! Each [`Operation`] names one endpoint of the REST service. Its
//! [`Operation::rule`] tells the envelope decoder how that endpoint signals
//! success, and [`Operation::sends_client_id`] whether the client id travels
//! in the query string next to the access token.

use crate::clients::{HttpMethod, ResponseRule, StatusHandler};

const CODE_OK: &[i64] = &[2000];
const CODE_OK_OR_CREATED: &[i64] = &[2000, 2001];
const CODE_CREATED: &[i64] = &[2001];

/// Message of the error returned when an order reaches only inactive merchants.
pub const MERCHANT_INACTIVE_MESSAGE: &str = "The merchant user accounts are inactive";

/// An endpoint of the REST service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /user/signin`
    Login,
    /// `POST /user/subscribe/{user}`
    Follow,
    /// `PUT /items/{item}/like`
    Like,
    /// `GET /items/{item}/like`
    Likes,
    /// `GET /user/{user}/{followers|following}`
    FollowList,
    /// `GET /categories`
    Categories,
    /// `GET /payments`
    Payments,
    /// `GET /baskets/user/{user}`
    Baskets,
    /// `PUT /baskets/{basket}/user/{user}/purchases/{purchase}`
    IncreasePurchase,
    /// `GET /orders/traders/{trader}` and `GET /orders/customers/{customer}`
    OrderList,
    /// `GET /orders/{order}[/traders/{trader}]/customers/{customer}`
    OneOrder,
    /// `POST /orders/customers/{user}`
    PlaceOrder,
    /// `POST /orders/search/{user}`
    SearchOrders,
    /// Item listings under `/items`, `/items/user/{user}` and `/category/{category}/items`.
    ItemList,
    /// `GET /item/{id}`
    Item,
    /// `POST /items/search`
    SearchItems,
    /// `DELETE /item/user/{user}/{item}`
    DeleteItem,
    /// `POST /items/user/{user}`
    AddItem,
    /// `PUT /items/user/{user}/{item}`
    UpdateItem,
    /// `PUT /items/{item}/popularity`
    Popularity,
    /// `GET /recommendation/{user}/{type}/`
    Recommendations,
    /// `GET /user/shops`
    Shops,
    /// `GET /comments/items/{item}`
    Comments,
    /// `POST /comments/items/{item}`
    AddComment,
    /// `PUT /comments/user/{user}/{comment}`
    UpdateComment,
    /// `POST /user/account/confirm`
    Confirmation,
    /// `POST /user/signup`
    Signup,
    /// `POST /user/register`
    Register,
    /// `PUT /user/{user}/shopinfo`
    UpdateShopInfo,
    /// `PUT /user/{user}`
    UpdateProfile,
    /// `GET /user/{login_or_id}`
    UserInfo,
    /// `GET /user/{user}/stats`
    UserStats,
    /// `POST /user/{trader}/contact/email`
    ContactByEmail,
    /// `GET /social/{network}`
    AuthenticationUrl,
    /// `POST /social/{network}/users/{user}/tokens`
    SocialAccessToken,
    /// `PUT /social/{network}/templates/{user}/{type}`
    SocialTemplate,
}

impl Operation {
    /// Returns the decoding rule of this endpoint.
    #[must_use]
    pub const fn rule(self) -> ResponseRule {
        match self {
            Self::Login
            | Self::Likes
            | Self::FollowList
            | Self::Categories
            | Self::IncreasePurchase
            | Self::OrderList
            | Self::ItemList
            | Self::Item
            | Self::SearchItems
            | Self::DeleteItem
            | Self::Comments
            | Self::UpdateShopInfo
            | Self::UpdateProfile
            | Self::UserInfo => ResponseRule::codes(CODE_OK),
            Self::Follow | Self::Like => ResponseRule::codes(CODE_OK_OR_CREATED),
            Self::AddItem | Self::Signup | Self::Register => ResponseRule::codes(CODE_CREATED),
            Self::Baskets => ResponseRule::codes(CODE_OK).empty_body_is_empty(),
            Self::OneOrder => ResponseRule::codes(CODE_OK)
                .with_status_handlers(&[(404, StatusHandler::MessageAsData)]),
            Self::Payments
            | Self::UpdateItem
            | Self::AddComment
            | Self::UpdateComment
            | Self::Confirmation => ResponseRule::status_success(),
            Self::PlaceOrder => ResponseRule::http_status(&[201])
                .with_status_handlers(&[(204, StatusHandler::Fail(MERCHANT_INACTIVE_MESSAGE))]),
            Self::SearchOrders => ResponseRule::http_status(&[200]).with_status_handlers(&[
                (204, StatusHandler::Empty),
                (404, StatusHandler::Empty),
            ]),
            Self::Recommendations | Self::UserStats => ResponseRule::http_status(&[200])
                .with_status_handlers(&[(204, StatusHandler::Empty)]),
            Self::Shops | Self::AuthenticationUrl => ResponseRule::http_status(&[200]),
            Self::SocialTemplate => ResponseRule::http_status(&[200]).status_line_errors(),
            Self::SocialAccessToken => ResponseRule::http_status(&[200, 204]),
            Self::Popularity => ResponseRule::http_status(&[204]),
            Self::ContactByEmail => ResponseRule::data_http_code(&[202]),
        }
    }

    /// Returns the HTTP method of this endpoint.
    #[must_use]
    pub const fn http_method(self) -> HttpMethod {
        match self {
            Self::Login
            | Self::Follow
            | Self::PlaceOrder
            | Self::SearchOrders
            | Self::SearchItems
            | Self::AddItem
            | Self::AddComment
            | Self::Confirmation
            | Self::Signup
            | Self::Register
            | Self::ContactByEmail
            | Self::SocialAccessToken => HttpMethod::Post,
            Self::Like
            | Self::IncreasePurchase
            | Self::UpdateItem
            | Self::Popularity
            | Self::UpdateComment
            | Self::UpdateShopInfo
            | Self::UpdateProfile
            | Self::SocialTemplate => HttpMethod::Put,
            Self::DeleteItem => HttpMethod::Delete,
            Self::Likes
            | Self::FollowList
            | Self::Categories
            | Self::Payments
            | Self::Baskets
            | Self::OrderList
            | Self::OneOrder
            | Self::ItemList
            | Self::Item
            | Self::Recommendations
            | Self::Shops
            | Self::Comments
            | Self::UserInfo
            | Self::UserStats
            | Self::AuthenticationUrl => HttpMethod::Get,
        }
    }

    /// Returns `true` if the endpoint expects `client_id` in the query string.
    #[must_use]
    pub const fn sends_client_id(self) -> bool {
        matches!(
            self,
            Self::Likes
                | Self::Payments
                | Self::IncreasePurchase
                | Self::PlaceOrder
                | Self::SearchOrders
                | Self::Item
                | Self::SearchItems
                | Self::DeleteItem
                | Self::UpdateComment
                | Self::Confirmation
                | Self::Signup
                | Self::Register
                | Self::UserInfo
                | Self::UserStats
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{decode, SuccessCheck};
    use serde_json::json;

    #[test]
    fn test_numeric_code_operations() {
        assert_eq!(Operation::Login.rule().success(), SuccessCheck::Code(&[2000]));
        assert_eq!(Operation::Follow.rule().success(), SuccessCheck::Code(&[2000, 2001]));
        assert_eq!(Operation::AddItem.rule().success(), SuccessCheck::Code(&[2001]));
    }

    #[test]
    fn test_status_string_operations() {
        for op in [
            Operation::Payments,
            Operation::UpdateItem,
            Operation::AddComment,
            Operation::UpdateComment,
            Operation::Confirmation,
        ] {
            assert_eq!(op.rule().success(), SuccessCheck::Status, "{op:?}");
        }
    }

    #[test]
    fn test_place_order_rule() {
        let rule = Operation::PlaceOrder.rule();
        let created = json!({"data": "order-42"}).to_string();
        assert_eq!(decode(201, &created, &rule).unwrap(), json!("order-42"));

        let error = decode(204, "", &rule).unwrap_err();
        assert_eq!(error.to_string(), MERCHANT_INACTIVE_MESSAGE);
    }

    #[test]
    fn test_search_orders_treats_not_found_as_empty() {
        let rule = Operation::SearchOrders.rule();
        assert_eq!(decode(404, "", &rule).unwrap(), json!([]));
        assert_eq!(decode(204, "", &rule).unwrap(), json!([]));
    }

    #[test]
    fn test_baskets_empty_body_is_empty_list() {
        assert_eq!(decode(200, "", &Operation::Baskets.rule()).unwrap(), json!([]));
    }

    #[test]
    fn test_http_methods() {
        assert_eq!(Operation::DeleteItem.http_method(), HttpMethod::Delete);
        assert_eq!(Operation::Like.http_method(), HttpMethod::Put);
        assert_eq!(Operation::Likes.http_method(), HttpMethod::Get);
        assert_eq!(Operation::SearchOrders.http_method(), HttpMethod::Post);
    }

    #[test]
    fn test_client_id_is_sent_where_expected() {
        assert!(Operation::Item.sends_client_id());
        assert!(Operation::PlaceOrder.sends_client_id());
        assert!(!Operation::ItemList.sends_client_id());
        assert!(!Operation::Login.sends_client_id());
    }
}
