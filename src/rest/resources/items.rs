//! Items: listings, search, creation and updates, likes, popularity and
//! recommendations.

use serde_json::Value;

use crate::clients::{form_bool, MultipartPart, RequestBody};
use crate::error::Error;
use crate::rest::client::query;
use crate::rest::validation::{
    require_item_id, require_limit, require_multipart, require_non_empty, segment,
};
use crate::rest::{ItemListOptions, OpenTradeClient, Operation, Query, RecommendationType};

/// Value of the `maxIter` parameter sent with recommendation requests.
const RECOMMENDATION_MAX_ITER: u32 = 2;

impl OpenTradeClient {
    async fn list_items(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
        options: &ItemListOptions,
    ) -> Result<Value, Error> {
        require_limit(limit)?;

        let order_by = options.order_by_param();
        let params = query([
            ("limit", &limit),
            ("offset", &offset),
            ("fields", &options.fields_param()),
            ("orderBy", &order_by),
        ]);
        self.call(Operation::ItemList, path, params, None).await
    }

    /// Lists items.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `limit` is zero.
    pub async fn get_items(
        &self,
        offset: u32,
        limit: u32,
        options: &ItemListOptions,
    ) -> Result<Value, Error> {
        self.list_items("/items", limit, offset, options).await
    }

    /// Lists the items with the given ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `ids` is empty or `limit` is zero.
    pub async fn get_items_by_ids(
        &self,
        ids: &[&str],
        offset: u32,
        limit: u32,
        options: &ItemListOptions,
    ) -> Result<Value, Error> {
        if ids.is_empty() {
            return Err(Error::invalid_argument("ids cannot be empty"));
        }
        let ids: Vec<String> = ids.iter().map(|id| segment(id)).collect();
        let path = format!("/items/{}", ids.join(","));
        self.list_items(&path, limit, offset, options).await
    }

    /// Returns one item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `item_id` is not
    /// [`ITEM_ID_LENGTH`](crate::rest::ITEM_ID_LENGTH) characters long; no
    /// request is sent in that case.
    pub async fn get_item(&self, item_id: &str, fields: &str) -> Result<Value, Error> {
        require_item_id(item_id)?;

        let path = format!("/item/{}", segment(item_id));
        self.call(Operation::Item, &path, query([("fields", &fields)]), None)
            .await
    }

    /// Lists the items of a trader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty or `limit`
    /// is zero.
    pub async fn get_items_by_user_id(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
        options: &ItemListOptions,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        let path = format!("/items/user/{}", segment(user_id));
        self.list_items(&path, limit, offset, options).await
    }

    /// Lists the items of a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `category_id` is empty or
    /// `limit` is zero.
    pub async fn get_items_by_category(
        &self,
        category_id: &str,
        offset: u32,
        limit: u32,
        options: &ItemListOptions,
    ) -> Result<Value, Error> {
        require_non_empty("category_id", category_id)?;
        let path = format!("/category/{}/items", segment(category_id));
        self.list_items(&path, limit, offset, options).await
    }

    /// Searches items with a JSON query.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the search is refused.
    pub async fn search(&self, criteria: Value) -> Result<Value, Error> {
        self.call(
            Operation::SearchItems,
            "/items/search",
            Query::new(),
            Some(RequestBody::Json(criteria)),
        )
        .await
    }

    /// Deletes an item owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either id is empty.
    pub async fn delete_item(&self, user_id: &str, item_id: &str) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("item_id", item_id)?;

        let path = format!("/item/user/{}/{}", segment(user_id), segment(item_id));
        self.call(Operation::DeleteItem, &path, Query::new(), None)
            .await
    }

    /// Creates an item from a multipart form (fields and pictures).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty or a picture
    /// has an invalid content type, and [`Error::Api`] unless the service
    /// answers `code` 2001.
    pub async fn add_item(
        &self,
        user_id: &str,
        form: Vec<MultipartPart>,
        action: &str,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_multipart(&form)?;

        let path = format!("/items/user/{}", segment(user_id));
        self.call(
            Operation::AddItem,
            &path,
            query([("action", &action)]),
            Some(RequestBody::Multipart(form)),
        )
        .await
    }

    /// Updates an item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] unless the envelope status is `"success"`.
    pub async fn update_item(
        &self,
        user_id: &str,
        item_id: &str,
        item: Value,
        action: &str,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("item_id", item_id)?;

        let path = format!("/items/user/{}/{}", segment(user_id), segment(item_id));
        self.call(
            Operation::UpdateItem,
            &path,
            query([("action", &action)]),
            Some(RequestBody::Json(item)),
        )
        .await
    }

    /// Likes or unlikes an item on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] unless the service answers `code` 2000 or 2001.
    pub async fn like(&self, item_id: &str, user_id: &str, value: bool) -> Result<Value, Error> {
        require_non_empty("item_id", item_id)?;
        require_non_empty("user_id", user_id)?;

        let path = format!("/items/{}/like", segment(item_id));
        let body = RequestBody::form([("user_id", user_id), ("like", form_bool(value))]);
        self.call(Operation::Like, &path, Query::new(), Some(body))
            .await
    }

    /// Returns the likes of an item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] unless the service answers `code` 2000.
    pub async fn likes(&self, item_id: &str) -> Result<Value, Error> {
        require_non_empty("item_id", item_id)?;

        let path = format!("/items/{}/like", segment(item_id));
        self.call(Operation::Likes, &path, Query::new(), None).await
    }

    /// Records a popularity event (`what`, e.g. a view) for an item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for any status other than 204.
    pub async fn popularity(&self, item_id: &str, what: &str) -> Result<(), Error> {
        require_non_empty("item_id", item_id)?;

        let path = format!("/items/{}/popularity", segment(item_id));
        let body = RequestBody::form([("what", what)]);
        self.call(Operation::Popularity, &path, Query::new(), Some(body))
            .await?;
        Ok(())
    }

    /// Returns recommended items for a user; an empty list on HTTP 204.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `user_id` is empty or `limit`
    /// is zero.
    pub async fn recommendations(
        &self,
        kind: RecommendationType,
        user_id: &str,
        limit: u32,
        offset: u32,
        fields: &str,
    ) -> Result<Value, Error> {
        require_non_empty("user_id", user_id)?;
        require_limit(limit)?;

        let path = format!("/recommendation/{}/{kind}/", segment(user_id));
        let params = query([
            ("limit", &limit),
            ("offset", &offset),
            ("maxIter", &RECOMMENDATION_MAX_ITER),
            ("fields", &fields),
        ]);
        self.call(Operation::Recommendations, &path, params, None)
            .await
    }

    /// Returns items matching the preferences of a user.
    ///
    /// Shorthand for [`recommendations`](Self::recommendations) with
    /// [`RecommendationType::Content`].
    ///
    /// # Errors
    ///
    /// See [`recommendations`](Self::recommendations).
    pub async fn get_preferenced_items(
        &self,
        user_id: &str,
        offset: u32,
        limit: u32,
        fields: &str,
    ) -> Result<Value, Error> {
        self.recommendations(RecommendationType::Content, user_id, limit, offset, fields)
            .await
    }
}
