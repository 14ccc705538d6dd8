//! Item comments.

use serde_json::Value;

use crate::clients::RequestBody;
use crate::error::Error;
use crate::rest::client::query;
use crate::rest::validation::{require_limit, require_non_empty, segment};
use crate::rest::{OpenTradeClient, Operation, Query};

impl OpenTradeClient {
    /// Lists the comments of an item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `item_id` is empty or `limit`
    /// is zero.
    pub async fn get_comments_by_item_id(
        &self,
        item_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value, Error> {
        require_non_empty("item_id", item_id)?;
        require_limit(limit)?;

        let path = format!("/comments/items/{}", segment(item_id));
        self.call(
            Operation::Comments,
            &path,
            query([("limit", &limit), ("offset", &offset)]),
            None,
        )
        .await
    }

    /// Comments an item.
    ///
    /// Anonymous visitors pass an empty `user_id` with a name and an email.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `item_id` or `text` is empty.
    pub async fn add_comment(
        &self,
        user_id: &str,
        item_id: &str,
        text: &str,
        anonymous_name: &str,
        anonymous_email: &str,
    ) -> Result<Value, Error> {
        require_non_empty("item_id", item_id)?;
        require_non_empty("comment_text", text)?;

        let path = format!("/comments/items/{}", segment(item_id));
        let body = RequestBody::form([
            ("user_id", user_id),
            ("comment_text", text),
            ("anonymous_name", anonymous_name),
            ("anonymous_email", anonymous_email),
        ]);
        self.call(Operation::AddComment, &path, Query::new(), Some(body))
            .await
    }

    /// Replaces the text of a comment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any argument is empty.
    pub async fn update_comment(
        &self,
        user_id: &str,
        comment_id: &str,
        text: &str,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("comment_id", comment_id)?;
        require_non_empty("comment_text", text)?;

        let path = format!("/comments/user/{}/{}", segment(user_id), segment(comment_id));
        let body = RequestBody::form([("comment_text", text)]);
        self.call(Operation::UpdateComment, &path, Query::new(), Some(body))
            .await
    }
}
