//! Halltek Core - Shared types library.
//!
//! This crate provides the types shared by the Halltek storefront components:
//! - `storefront` - Cart store, cart panel, session gate, and catalog client
//! - `integration-tests` - End-to-end tests against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, cart line items, and session status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
