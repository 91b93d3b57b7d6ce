//! Opaque product identifiers.
//!
//! Product IDs come from the backend catalog and may be numeric strings,
//! document IDs, slugs, or even product names. They are compared as opaque
//! strings and never parsed.

use serde::{Deserialize, Serialize};

/// Opaque product identifier, unique within a cart.
///
/// # Example
///
/// ```rust
/// # use halltek_core::ProductId;
/// let id = ProductId::new("65a1f0c2");
/// assert_eq!(id.as_str(), "65a1f0c2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_string() {
        let id = ProductId::new("sku-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sku-1\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::from("abc").to_string(), "abc");
    }
}
