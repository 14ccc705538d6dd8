//! Domain operations of [`OpenTradeClient`](crate::OpenTradeClient), one
//! module per resource.
//!
//! Every operation follows the same sequence:
//!
//! 1. validate arguments, returning [`Error::InvalidArgument`](crate::Error::InvalidArgument)
//!    before anything is sent
//! 2. obtain an access token from the cache
//! 3. send one request
//! 4. decode the envelope with the endpoint's [`Operation::rule`](crate::rest::Operation::rule)
//!
//! Payloads the client does not inspect are returned as
//! [`serde_json::Value`].

pub mod baskets;
pub mod catalog;
pub mod comments;
pub mod items;
pub mod orders;
pub mod social;
pub mod users;
