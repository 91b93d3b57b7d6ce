//! Cart line items and derived totals.
//!
//! The serialized shape of [`CartLineItem`] is the durable storage format:
//! an object `{ id, name, price, image, quantity }` with `price` as a plain
//! JSON number and `image` as an empty string when absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::id::ProductId;
use crate::types::price::amount_as_number;

/// One product in the cart with its quantity.
///
/// `name`, `price`, and `image` are snapshots taken when the product was
/// first added; they are not refreshed if the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "amount_as_number")]
    pub price: Decimal,
    #[serde(
        default,
        serialize_with = "serialize_image",
        deserialize_with = "deserialize_image"
    )]
    pub image: Option<String>,
    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a line item with quantity 1.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Decimal, image: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image,
            quantity: 1,
        }
    }

    /// `price * quantity` for this line, or `None` if it does not fit in a
    /// [`Decimal`].
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[allow(clippy::ref_option)]
fn serialize_image<S: Serializer>(image: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(image.as_deref().unwrap_or_default())
}

fn deserialize_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let image = Option::<String>::deserialize(deserializer)?;
    Ok(image.filter(|s| !s.is_empty()))
}

/// Aggregates derived from the current cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of all quantities.
    pub item_count: u64,
    /// Sum of `price * quantity` over all items.
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals over a sequence of line items.
    ///
    /// Returns `None` when a line total or the grand total overflows.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Option<Self> {
        items.iter().try_fold(Self::default(), |acc, item| {
            Some(Self {
                item_count: acc.item_count.checked_add(u64::from(item.quantity))?,
                total: acc.total.checked_add(item.line_total()?)?,
            })
        })
    }
}
