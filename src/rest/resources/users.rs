//! User accounts: sign-in, sign-up, profiles, subscriptions and contact.

use serde_json::Value;

use crate::clients::{form_bool, Envelope, MultipartPart, RequestBody};
use crate::error::Error;
use crate::rest::client::query;
use crate::rest::validation::{require_limit, require_multipart, require_non_empty, segment};
use crate::rest::{ContactForm, FollowType, OpenTradeClient, Operation, Query};

impl OpenTradeClient {
    /// Signs a user in and returns the user payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `login` or `password` is empty,
    /// and [`Error::Api`] if the credentials are refused.
    pub async fn login(&self, login: &str, password: &str) -> Result<Value, Error> {
        require_non_empty("login", login)?;
        require_non_empty("password", password)?;

        let body = RequestBody::form([("login", login), ("password", password)]);
        self.call(Operation::Login, "/user/signin", Query::new(), Some(body))
            .await
    }

    /// Subscribes `user_id` to `trader_id`.
    ///
    /// Returns `true` when a new subscription was recorded (`code` 2000) and
    /// `false` when the service reports it with `code` 2001.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for any other envelope code.
    pub async fn follow(&self, user_id: &str, trader_id: &str, notify: bool) -> Result<bool, Error> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("trader_id", trader_id)?;

        let path = format!("/user/subscribe/{}", segment(user_id));
        let body = RequestBody::form([
            ("customer_id", user_id),
            ("trader_id", trader_id),
            ("notify", form_bool(notify)),
        ]);

        let response = self
            .send(Operation::Follow, &path, Query::new(), Some(body))
            .await?;
        let envelope = Envelope::parse(&response.body)?;

        match envelope.code {
            Some(2000) => Ok(true),
            Some(2001) => Ok(false),
            _ => Err(envelope.into_api_error(response.code)),
        }
    }

    /// Lists the followers of a user, or the traders the user follows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty or `limit`
    /// is zero.
    pub async fn get_followers_or_subscriptions(
        &self,
        user_id: &str,
        kind: FollowType,
        limit: u32,
        offset: u32,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_limit(limit)?;

        let path = format!("/user/{}/{kind}", segment(user_id));
        self.call(
            Operation::FollowList,
            &path,
            query([("offset", &offset), ("limit", &limit)]),
            None,
        )
        .await
    }

    /// Confirms an account with the token sent by email.
    ///
    /// The service returns the account as a JSON-encoded string; it is
    /// decoded before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the embedded string is not JSON.
    pub async fn confirmation(&self, token: &str) -> Result<Value, Error> {
        require_non_empty("token", token)?;

        let body = RequestBody::form([("token", token)]);
        let data = self
            .call(Operation::Confirmation, "/user/account/confirm", Query::new(), Some(body))
            .await?;

        match data {
            Value::String(embedded) => serde_json::from_str(&embedded)
                .map_err(|e| Error::malformed(format!("confirmation payload is not JSON: {e}"))),
            other => Ok(other),
        }
    }

    /// Creates an account from a multipart form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a file has an invalid content
    /// type, and [`Error::Api`] unless the service answers `code` 2001.
    #[deprecated(note = "use `register`, which sends the account as JSON")]
    pub async fn signup(&self, form: Vec<MultipartPart>, redirect_url: &str) -> Result<(), Error> {
        require_multipart(&form)?;

        self.call(
            Operation::Signup,
            "/user/signup",
            query([("redirect_url", &redirect_url)]),
            Some(RequestBody::Multipart(form)),
        )
        .await?;
        Ok(())
    }

    /// Creates an account.
    ///
    /// `redirect_url` is where the confirmation link sends the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] unless the service answers `code` 2001.
    pub async fn register(&self, account: Value, redirect_url: &str) -> Result<(), Error> {
        self.call(
            Operation::Register,
            "/user/register",
            query([("redirect_url", &redirect_url)]),
            Some(RequestBody::Json(account)),
        )
        .await?;
        Ok(())
    }

    /// Updates the shop description of a trader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the update is refused.
    pub async fn update_shop_info(&self, shop_info: Value, user_id: &str) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;

        let path = format!("/user/{}/shopinfo", segment(user_id));
        self.call(
            Operation::UpdateShopInfo,
            &path,
            Query::new(),
            Some(RequestBody::Json(shop_info)),
        )
        .await
    }

    /// Updates a user profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the update is refused.
    pub async fn update_profile(&self, user_info: Value, user_id: &str) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;

        let path = format!("/user/{}", segment(user_id));
        self.call(
            Operation::UpdateProfile,
            &path,
            Query::new(),
            Some(RequestBody::Json(user_info)),
        )
        .await
    }

    /// Returns the requested fields of a user, looked up by login or id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the user does not exist.
    pub async fn get_user_info(&self, login_or_id: &str, fields: &[&str]) -> Result<Value, Error> {
        require_non_empty("login_or_id", login_or_id)?;

        let path = format!("/user/{}", segment(login_or_id));
        let fields = serde_json::to_string(fields)
            .map_err(|e| Error::invalid_argument(format!("fields cannot be encoded: {e}")))?;
        self.call(Operation::UserInfo, &path, query([("fields", &fields)]), None)
            .await
    }

    /// Returns statistics about a user; an empty list on HTTP 204.
    ///
    /// `params` are appended to the query string as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty.
    pub async fn user_stats(&self, user_id: &str, params: Query) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;

        let path = format!("/user/{}/stats", segment(user_id));
        self.call(Operation::UserStats, &path, params, None).await
    }

    /// Lists shops.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `limit` is zero, and
    /// [`Error::Api`] for any status other than 200.
    pub async fn get_shops(&self, limit: u32, offset: u32) -> Result<Value, Error> {
        require_limit(limit)?;

        self.call(
            Operation::Shops,
            "/user/shops",
            query([("limit", &limit), ("offset", &offset)]),
            None,
        )
        .await
    }

    /// Sends an email to a trader and returns the confirmation message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] unless the service reports `data.httpCode` 202.
    pub async fn contact_by_email(&self, trader_id: &str, form: &ContactForm) -> Result<String, Error> {
        require_non_empty("trader_id", trader_id)?;

        let path = format!("/user/{}/contact/email", segment(trader_id));
        let data = self
            .call(
                Operation::ContactByEmail,
                &path,
                Query::new(),
                Some(RequestBody::Form(form.to_form())),
            )
            .await?;

        data.get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| Error::malformed("contact response without data.message"))
    }
}
