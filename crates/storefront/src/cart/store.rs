//! Authoritative in-memory cart synchronized with durable storage.

use halltek_core::price::clamp_non_negative;
use halltek_core::{CartLineItem, CartTotals, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::error::{StorefrontError, add_breadcrumb};
use crate::storage::KeyValueStore;

/// Product data captured when it is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// Owns the cart line items and keeps durable storage in step with them.
///
/// Every mutation is followed by exactly one storage write. Storage failures
/// are reported and swallowed: a cart that cannot be loaded starts empty, and
/// a cart that cannot be saved stays correct in memory for the current page.
///
/// [`revision`](Self::revision) increases on every load or mutation and is
/// the signal views use to know they must re-render.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    items: Vec<CartLineItem>,
    revision: u64,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty store. Call [`load`](Self::load) to read saved state.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            items: Vec::new(),
            revision: 0,
        }
    }

    /// Replace the in-memory cart with the stored one.
    ///
    /// A missing, unreadable, or malformed record yields an empty cart.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&mut self) {
        self.items = match self.read_stored() {
            Ok(items) => items,
            Err(e) => {
                e.report("Cart load");
                Vec::new()
            }
        };
        debug!(items = self.items.len(), "Cart loaded");
        self.bump();
    }

    fn read_stored(&self) -> Result<Vec<CartLineItem>, StorefrontError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(Vec::new());
        };
        let items: Vec<CartLineItem> = serde_json::from_str(&raw)?;
        let items: Vec<CartLineItem> = items.into_iter().filter(|item| item.quantity > 0).collect();
        if CartTotals::from_items(&items).is_none() {
            return Err(StorefrontError::TotalsOverflow);
        }
        Ok(items)
    }

    /// Add one unit of `product`.
    ///
    /// An existing line with the same id is incremented; otherwise a new
    /// line is appended with quantity 1. Negative prices are stored as zero.
    /// An add that would push the cart total past what a decimal holds is
    /// refused.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add(&mut self, product: CartProduct) {
        let unit_price = self
            .items
            .iter()
            .find(|item| item.id == product.id)
            .map_or_else(|| clamp_non_negative(product.price), |item| item.price);
        if !self.can_grow_by(unit_price, 1) {
            warn!("Refusing add: cart total would overflow");
            return;
        }

        if let Some(existing) = self.items.iter_mut().find(|item| item.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartLineItem::new(
                product.id.clone(),
                product.name,
                clamp_non_negative(product.price),
                product.image.filter(|s| !s.is_empty()),
            ));
        }
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));
        self.commit();
    }

    /// Change the quantity of the line at `index` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line. An index out of
    /// range is ignored, as is an increase that would overflow the total.
    #[instrument(skip(self))]
    pub fn adjust(&mut self, index: usize, delta: i64) {
        let Some(item) = self.items.get(index) else {
            debug!("Ignoring adjust for stale index");
            return;
        };
        let (unit_price, current) = (item.price, item.quantity);

        let quantity = i64::from(current).saturating_add(delta);
        if quantity <= 0 {
            self.items.remove(index);
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            let added = u64::from(quantity.saturating_sub(current));
            if added > 0 && !self.can_grow_by(unit_price, added) {
                warn!("Refusing increase: cart total would overflow");
                return;
            }
            if let Some(item) = self.items.get_mut(index) {
                item.quantity = quantity;
            }
        }
        self.commit();
    }

    /// Remove the line at `index`. An index out of range is ignored.
    #[instrument(skip(self))]
    pub fn remove(&mut self, index: usize) {
        if index >= self.items.len() {
            debug!("Ignoring remove for stale index");
            return;
        }
        self.items.remove(index);
        self.commit();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Write the current cart to storage, overwriting the previous record.
    ///
    /// Failures are reported and leave the in-memory cart untouched.
    pub fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            e.report("Cart save");
        }
    }

    fn try_persist(&mut self) -> Result<(), StorefrontError> {
        let body = serde_json::to_string(&self.items)?;
        self.storage.set(&self.key, &body)?;
        Ok(())
    }

    /// Current item count and total, computed from the current items.
    ///
    /// Loading and every mutation keep the total representable, so this
    /// never falls back to the default.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_items(&self.items).unwrap_or_default()
    }

    /// Whether `units` more at `unit_price` keeps the cart total in range.
    fn can_grow_by(&self, unit_price: Decimal, units: u64) -> bool {
        CartTotals::from_items(&self.items)
            .and_then(|totals| {
                let extra = unit_price.checked_mul(Decimal::from(units))?;
                totals.total.checked_add(extra)
            })
            .is_some()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Increases on every load or mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Storage backend, mainly for inspection in tests.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage backend, dropping in-memory state.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self) {
        self.persist();
        self.bump();
    }

    const fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
