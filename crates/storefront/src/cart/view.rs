//! Cart view-model.
//!
//! A pure projection of cart state into display-ready strings. Nothing here
//! touches storage or markup; see [`crate::render`] for the markup adapter.

use std::fmt;
use std::str::FromStr;

use halltek_core::{CartLineItem, CartTotals, CurrencyCode, Price};

/// Message shown in place of the rows when the cart is empty.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// A control on a cart row, identified in markup by its `data-action` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartAction {
    Decrease,
    Increase,
    Remove,
}

impl CartAction {
    /// All row controls in display order.
    pub const ALL: [Self; 3] = [Self::Decrease, Self::Increase, Self::Remove];

    /// Value of the `data-action` attribute.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Decrease => "decrease",
            Self::Increase => "increase",
            Self::Remove => "remove",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Decrease => "-",
            Self::Increase => "+",
            Self::Remove => "×",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown `data-action` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cart action: {0}")]
pub struct UnknownCartAction(pub String);

impl FromStr for CartAction {
    type Err = UnknownCartAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decrease" => Ok(Self::Decrease),
            "increase" => Ok(Self::Increase),
            "remove" => Ok(Self::Remove),
            other => Err(UnknownCartAction(other.to_string())),
        }
    }
}

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowView {
    /// Position in the cart; carried as `data-index` on every control.
    pub index: usize,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    pub image: Option<String>,
    pub actions: [CartAction; 3],
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub rows: Vec<CartRowView>,
    pub item_count: u64,
    pub total: String,
    /// Set only when `rows` is empty.
    pub empty_message: Option<&'static str>,
}

impl CartView {
    /// Project the cart and its totals into display data.
    ///
    /// `items` come from a [`crate::cart::CartStore`], which keeps every
    /// line total representable.
    #[must_use]
    pub fn build(items: &[CartLineItem], totals: &CartTotals, currency: CurrencyCode) -> Self {
        let fmt_price = |amount| Price::new(amount, currency).display();

        let rows: Vec<CartRowView> = items
            .iter()
            .enumerate()
            .map(|(index, item)| CartRowView {
                index,
                name: item.name.clone(),
                unit_price: fmt_price(item.price),
                quantity: item.quantity,
                line_total: fmt_price(item.line_total().unwrap_or_default()),
                image: item.image.clone(),
                actions: CartAction::ALL,
            })
            .collect();

        let empty_message = rows.is_empty().then_some(EMPTY_CART_MESSAGE);

        Self {
            rows,
            item_count: totals.item_count,
            total: fmt_price(totals.total),
            empty_message,
        }
    }

    /// Create an empty cart.
    #[must_use]
    pub fn empty(currency: CurrencyCode) -> Self {
        Self::build(&[], &CartTotals::default(), currency)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Whether the cart panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    Open,
    #[default]
    Closed,
}

impl PanelState {
    /// The other state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}
