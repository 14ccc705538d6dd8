//! The OpenTrade REST client and its domain operations.
//!
//! - [`OpenTradeClient`]: the client, with `get`/`post`/`put`/`delete`
//!   primitives and the token lifecycle
//! - [`Operation`]: the endpoint table driving envelope decoding
//! - Domain types: [`Category`], [`PaymentMethod`], [`ContactForm`],
//!   [`FollowType`], [`RecommendationType`], [`TemplateType`],
//!   [`ItemSort`], [`ItemListOptions`]
//!
//! Operations are grouped by resource in [`resources`]:
//!
//! | Resource | Operations |
//! |---|---|
//! | users | login, follow, followers, sign-up, profile, stats, shops, contact |
//! | items | listings, search, CRUD, likes, popularity, recommendations |
//! | orders | order history, placing and searching orders |
//! | baskets | basket listing and quantities |
//! | catalog | cached categories and payment methods |
//! | comments | item comments |
//! | social | social network connection |
//!
//! # Example
//!
//! ```rust,no_run
//! use opentrade_api::rest::{FollowType, ItemListOptions};
//! # async fn run(client: opentrade_api::OpenTradeClient) -> Result<(), opentrade_api::Error> {
//! let items = client.get_items(0, 20, &ItemListOptions::default()).await?;
//! let followers = client
//!     .get_followers_or_subscriptions("5c8a1d5b0190b214360dc031", FollowType::Followers, 10, 0)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod models;
mod operation;
pub mod resources;
mod validation;

pub use client::{OpenTradeClient, Query};
pub use models::{
    Category, ContactForm, FollowType, ItemListOptions, ItemSort, PaymentMethod,
    RecommendationType, TemplateType,
};
pub use operation::{Operation, MERCHANT_INACTIVE_MESSAGE};
pub use validation::ITEM_ID_LENGTH;
