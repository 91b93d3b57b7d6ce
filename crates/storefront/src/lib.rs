//! Halltek storefront client library.
//!
//! Client-side state for the Halltek storefront: a cart that survives page
//! reloads, the cart drawer and its controls, and navigation that reflects
//! whether the visitor is logged in.
//!
//! Hosts construct a [`page::StorefrontPage`] from a
//! [`config::StorefrontConfig`], a [`storage::KeyValueStore`], and an
//! [`api::ApiClient`], then forward clicks to it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod page;
pub mod render;
pub mod session;
pub mod storage;
pub mod telemetry;
