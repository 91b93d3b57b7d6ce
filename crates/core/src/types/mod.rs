//! Core types for Halltek.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod session;

pub use cart::{CartLineItem, CartTotals};
pub use id::ProductId;
pub use price::{CurrencyCode, Price, PriceError};
pub use session::SessionStatus;
