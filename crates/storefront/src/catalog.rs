//! Product catalog normalization and grid view-model.
//!
//! The backend's product documents are loosely shaped: IDs may live under
//! `id`, `_id` (sometimes as `{"$oid": ...}`), or `slug`, prices may be
//! numbers or strings, and optional fields may be missing or null. Everything
//! is normalized here so the rest of the storefront sees one [`Product`] shape.

use halltek_core::price::coerce_amount;
use halltek_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::warn;

use crate::api::ApiError;
use crate::cart::CartProduct;

/// Name used when a product document has none.
pub const UNTITLED_PRODUCT: &str = "Untitled Product";

/// Grid message when the listing is empty.
pub const NO_PRODUCTS_MESSAGE: &str = "No products available yet.";

/// Grid message when the listing could not be fetched.
pub const PRODUCTS_UNAVAILABLE_MESSAGE: &str =
    "Unable to load products right now. Please try again later.";

/// Where product listings come from.
///
/// Implemented by [`crate::api::ApiClient`]; tests substitute fakes.
#[allow(async_fn_in_trait)]
pub trait ProductSource {
    /// Fetch the normalized product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched or parsed.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
}

/// A normalized catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl Product {
    /// Normalize one product document.
    ///
    /// Returns `None` when no identifier can be derived (no `id`, `_id`,
    /// `slug`, or `name`).
    #[must_use]
    pub fn from_document(doc: &Value) -> Option<Self> {
        let id = ["id", "_id", "slug", "name"]
            .iter()
            .find_map(|field| doc.get(field).and_then(id_candidate))?;

        Some(Self {
            id: ProductId::new(id),
            name: non_empty_str(doc.get("name")).unwrap_or_else(|| UNTITLED_PRODUCT.to_string()),
            description: non_empty_str(doc.get("description")).unwrap_or_default(),
            price: coerce_amount(doc.get("price")),
            image: non_empty_str(doc.get("image")),
        })
    }
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// Normalize a listing response: either a bare array or `{ "products": [...] }`.
///
/// Any other shape is treated as an empty listing. Documents without an
/// identifier are skipped.
#[must_use]
pub fn normalize_listing(body: &Value) -> Vec<Product> {
    let docs = match body {
        Value::Array(docs) => docs.as_slice(),
        Value::Object(map) => map
            .get("products")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    };

    docs.iter()
        .filter_map(|doc| {
            let product = Product::from_document(doc);
            if product.is_none() {
                warn!("Skipping product document without an identifier");
            }
            product
        })
        .collect()
}

/// Interpret a JSON value as an identifier, the way a truthy check would.
fn id_candidate(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Object(map) => map.get("$oid").and_then(id_candidate),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Products loaded for the current page, used to resolve add-to-cart clicks.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Find a product by the id carried on its card's `data-product-id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<String>,
}

impl ProductCardView {
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Image URL, or an empty string when the product has none.
    #[must_use]
    pub fn image_src(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }
}

/// Product grid display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductGridView {
    pub cards: Vec<ProductCardView>,
    /// Replaces the grid when there are no cards.
    pub message: Option<&'static str>,
}

impl ProductGridView {
    /// Build the grid for a loaded listing.
    #[must_use]
    pub fn build(products: &[Product], currency: CurrencyCode) -> Self {
        let cards: Vec<ProductCardView> = products
            .iter()
            .map(|p| ProductCardView {
                id: p.id.to_string(),
                name: p.name.clone(),
                description: p.description.clone(),
                price: Price::new(p.price, currency).display(),
                image: p.image.clone(),
            })
            .collect();
        let message = cards.is_empty().then_some(NO_PRODUCTS_MESSAGE);
        Self { cards, message }
    }

    /// Grid shown when the listing request failed.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            cards: Vec::new(),
            message: Some(PRODUCTS_UNAVAILABLE_MESSAGE),
        }
    }
}
