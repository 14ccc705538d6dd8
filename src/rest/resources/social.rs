//! Social network connection.
//!
//! A trader links a social network account through an OAuth redirect the
//! service builds; the resulting tokens are then stored on the service,
//! which publishes new items and promotions with a per-network template.

use serde_json::Value;

use crate::clients::RequestBody;
use crate::error::Error;
use crate::rest::client::query;
use crate::rest::validation::{require_non_empty, segment};
use crate::rest::{OpenTradeClient, Operation, Query, TemplateType};

/// Link target returned when no authentication URL is available.
pub const NO_AUTHENTICATION_URL: &str = "#";

impl OpenTradeClient {
    /// Returns the URL that starts the authentication flow with a social
    /// network.
    ///
    /// Any status other than 200 yields [`NO_AUTHENTICATION_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `network` is empty, and
    /// propagates token and transport failures.
    pub async fn get_authentication_url(&self, network: &str, callback_url: &str) -> Result<String, Error> {
        require_non_empty("social network", network)?;

        let path = format!("/social/{}", segment(network));
        let response = self
            .send(
                Operation::AuthenticationUrl,
                &path,
                query([("callback_url", &callback_url)]),
                None,
            )
            .await?;

        if response.code != 200 {
            tracing::debug!(status = response.code, network, "no authentication url");
            return Ok(NO_AUTHENTICATION_URL.to_string());
        }
        Ok(response.body)
    }

    /// Stores the OAuth tokens obtained from a social network.
    ///
    /// Returns `false`, after logging the response, when the service
    /// answers anything but 200 or 204.
    ///
    /// # Errors
    ///
    /// Propagates token and transport failures.
    pub async fn update_social_network_access_token(
        &self,
        network: &str,
        user_id: &str,
        oauth_verifier: &str,
        oauth_token: &str,
    ) -> Result<bool, Error> {
        require_non_empty("social network", network)?;
        require_non_empty("user_id", user_id)?;

        let path = format!("/social/{}/users/{}/tokens", segment(network), segment(user_id));
        let body = RequestBody::form([
            ("oauth_token", oauth_token),
            ("oauth_verifier", oauth_verifier),
        ]);
        let response = self
            .send(Operation::SocialAccessToken, &path, Query::new(), Some(body))
            .await?;

        if !matches!(response.code, 200 | 204) {
            tracing::warn!(
                status = response.code,
                body = %response.body,
                network,
                "social network token update rejected"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Replaces the message template used when publishing to a social
    /// network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for any status other than 200.
    pub async fn update_social_network_template_message(
        &self,
        user_id: &str,
        network: &str,
        kind: TemplateType,
        template: &str,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("social network", network)?;

        let path = format!(
            "/social/{}/templates/{}/{kind}",
            segment(network),
            segment(user_id)
        );
        let body = RequestBody::form([("template", template)]);
        self.call(Operation::SocialTemplate, &path, Query::new(), Some(body))
            .await
    }
}
