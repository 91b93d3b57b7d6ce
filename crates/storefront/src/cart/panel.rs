//! The cart drawer.
//!
//! Owns the [`CartStore`] and everything the drawer needs on top of it:
//! open/closed state, one dispatch entry point for row controls, the
//! checkout stub, and markup that is re-rendered only when the cart changes.

use halltek_core::{CartTotals, CurrencyCode};
use tracing::{debug, instrument};

use super::store::{CartProduct, CartStore};
use super::view::{CartAction, CartView, PanelState};
use crate::catalog::Catalog;
use crate::error::{StorefrontError, add_breadcrumb};
use crate::render::Renderer;
use crate::storage::KeyValueStore;

/// Result of pressing checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutNotice {
    /// Nothing to check out.
    EmptyCart,
    /// Checkout is not wired to a payment flow yet.
    ComingSoon,
}

impl CheckoutNotice {
    /// Text shown to the visitor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyCart => "Add items to the cart before checking out.",
            Self::ComingSoon => "Checkout flow coming soon!",
        }
    }

    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::EmptyCart)
    }
}

/// Cart drawer bound to a store and a renderer.
#[derive(Debug)]
pub struct CartPanel<S, R> {
    store: CartStore<S>,
    renderer: R,
    currency: CurrencyCode,
    state: PanelState,
    rendered: Option<(u64, String)>,
}

impl<S: KeyValueStore, R: Renderer> CartPanel<S, R> {
    /// Wrap `store`. The panel starts closed; the store is not reloaded.
    pub const fn new(store: CartStore<S>, renderer: R, currency: CurrencyCode) -> Self {
        Self {
            store,
            renderer,
            currency,
            state: PanelState::Closed,
            rendered: None,
        }
    }

    /// Reload the cart from storage.
    pub fn load(&mut self) {
        self.store.load();
    }

    /// Add one unit of `product`.
    pub fn add(&mut self, product: CartProduct) {
        self.store.add(product);
    }

    /// Add the catalog product whose card carries `product_id`.
    ///
    /// Returns `false` when the id is not in the loaded catalog.
    #[instrument(skip(self, catalog))]
    pub fn add_by_id(&mut self, catalog: &Catalog, product_id: &str) -> bool {
        let Some(product) = catalog.find(product_id) else {
            debug!("Ignoring add for unknown product");
            return false;
        };
        self.store.add(CartProduct::from(product));
        true
    }

    /// Handle a click on a row control.
    ///
    /// `action` and `index` are the raw `data-action` and `data-index`
    /// attribute values. Unknown actions, unparseable indexes, and indexes
    /// past the end of the cart are ignored. Returns the action applied.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, action: &str, index: &str) -> Option<CartAction> {
        let Ok(action) = action.parse::<CartAction>() else {
            debug!("Ignoring unknown cart action");
            return None;
        };
        let Ok(index) = index.trim().parse::<usize>() else {
            debug!("Ignoring unparseable cart index");
            return None;
        };
        if index >= self.store.len() {
            debug!("Ignoring stale cart index");
            return None;
        }

        match action {
            CartAction::Increase => self.store.adjust(index, 1),
            CartAction::Decrease => self.store.adjust(index, -1),
            CartAction::Remove => self.store.remove(index),
        }
        Some(action)
    }

    /// Open a closed panel or close an open one.
    pub fn toggle(&mut self) -> PanelState {
        self.state = self.state.toggled();
        self.state
    }

    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    #[must_use]
    pub const fn state(&self) -> PanelState {
        self.state
    }

    /// Start checkout. Never touches the network.
    #[must_use]
    pub fn checkout(&self) -> CheckoutNotice {
        let notice = if self.store.is_empty() {
            CheckoutNotice::EmptyCart
        } else {
            CheckoutNotice::ComingSoon
        };
        add_breadcrumb("cart", "Checkout pressed", Some(&[("notice", notice.message())]));
        notice
    }

    /// Current view-model.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::build(self.store.items(), &self.store.totals(), self.currency)
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.store.totals()
    }

    /// Cart markup, re-rendered only when the store has changed since the
    /// last call. A render failure is reported and yields empty markup.
    pub fn render(&mut self) -> &str {
        let revision = self.store.revision();
        if self.rendered.as_ref().is_none_or(|(seen, _)| *seen != revision) {
            let markup = self.renderer.render_cart(&self.view()).unwrap_or_else(|e| {
                StorefrontError::from(e).report("Cart render");
                String::new()
            });
            self.rendered = Some((revision, markup));
        }
        self.rendered.as_ref().map_or("", |(_, markup)| markup.as_str())
    }

    /// Count badge markup.
    #[must_use]
    pub fn render_count(&self) -> String {
        self.renderer
            .render_cart_count(self.store.totals().item_count)
            .unwrap_or_else(|e| {
                StorefrontError::from(e).report("Cart count render");
                String::new()
            })
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    #[must_use]
    pub const fn store_mut(&mut self) -> &mut CartStore<S> {
        &mut self.store
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell;

    use halltek_core::ProductId;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::catalog::{ProductGridView, normalize_listing};
    use crate::render::{HtmlRenderer, RenderError};
    use crate::session::NavChrome;
    use crate::storage::MemoryStore;

    const KEY: &str = "halltek_cart";

    fn panel() -> CartPanel<MemoryStore, HtmlRenderer> {
        CartPanel::new(
            CartStore::new(MemoryStore::new(), KEY),
            HtmlRenderer,
            CurrencyCode::INR,
        )
    }

    fn product(id: &str, cents: i64) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: Decimal::new(cents, 2),
            image: None,
        }
    }

    #[test]
    fn test_starts_closed_and_toggles() {
        let mut panel = panel();
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(panel.toggle(), PanelState::Open);
        assert_eq!(panel.toggle(), PanelState::Closed);
        panel.toggle();
        panel.close();
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_dispatch_actions() {
        let mut panel = panel();
        panel.add(product("a", 1000));
        panel.add(product("b", 550));

        assert_eq!(panel.dispatch("increase", "0"), Some(CartAction::Increase));
        assert_eq!(panel.store().items()[0].quantity, 2);

        assert_eq!(panel.dispatch("decrease", "0"), Some(CartAction::Decrease));
        assert_eq!(panel.store().items()[0].quantity, 1);

        assert_eq!(panel.dispatch("remove", "0"), Some(CartAction::Remove));
        assert_eq!(panel.store().len(), 1);
        assert_eq!(panel.store().items()[0].id.as_str(), "b");

        assert_eq!(panel.dispatch("decrease", "0"), Some(CartAction::Decrease));
        assert!(panel.store().is_empty());
    }

    #[test]
    fn test_dispatch_ignores_bad_input() {
        let mut panel = panel();
        panel.add(product("a", 1000));
        let revision = panel.store().revision();

        assert_eq!(panel.dispatch("explode", "0"), None);
        assert_eq!(panel.dispatch("increase", "zero"), None);
        assert_eq!(panel.dispatch("increase", "-1"), None);
        assert_eq!(panel.dispatch("increase", "5"), None);
        assert_eq!(panel.dispatch("", ""), None);

        assert_eq!(panel.store().revision(), revision);
        assert_eq!(panel.store().items()[0].quantity, 1);
    }

    #[test]
    fn test_checkout_notices() {
        let mut panel = panel();
        let notice = panel.checkout();
        assert_eq!(notice, CheckoutNotice::EmptyCart);
        assert!(notice.is_warning());
        assert_eq!(notice.message(), "Add items to the cart before checking out.");

        panel.add(product("a", 1000));
        let notice = panel.checkout();
        assert_eq!(notice, CheckoutNotice::ComingSoon);
        assert_eq!(notice.message(), "Checkout flow coming soon!");
        assert_eq!(panel.store().len(), 1);
    }

    #[test]
    fn test_add_by_id() {
        let catalog = Catalog::new(normalize_listing(&json!([
            {"id": "lamp", "name": "Lamp", "price": "12.50"}
        ])));
        let mut panel = panel();

        assert!(panel.add_by_id(&catalog, "lamp"));
        assert!(panel.add_by_id(&catalog, "lamp"));
        assert!(!panel.add_by_id(&catalog, "ghost"));

        assert_eq!(panel.store().len(), 1);
        assert_eq!(panel.totals().total, Decimal::new(2500, 2));
    }

    #[test]
    fn test_render_reflects_mutations() {
        let mut panel = panel();
        assert!(panel.render().contains("Your cart is empty."));

        panel.add(product("a", 1000));
        let html = panel.render().to_string();
        assert!(html.contains("₹10.00"));
        assert!(html.contains(r#"data-action="remove" data-index="0""#));
        assert!(panel.render_count().contains(">1<"));
    }

    /// Renderer that counts cart renders.
    #[derive(Default)]
    struct CountingRenderer {
        renders: Cell<u32>,
    }

    impl Renderer for CountingRenderer {
        fn render_cart(&self, cart: &CartView) -> Result<String, RenderError> {
            self.renders.set(self.renders.get() + 1);
            Ok(format!("{} items", cart.item_count))
        }

        fn render_cart_count(&self, count: u64) -> Result<String, RenderError> {
            Ok(count.to_string())
        }

        fn render_products(&self, _: &ProductGridView) -> Result<String, RenderError> {
            Ok(String::new())
        }

        fn render_nav(&self, _: &NavChrome) -> Result<String, RenderError> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_render_skips_unchanged_cart() {
        let mut panel = CartPanel::new(
            CartStore::new(MemoryStore::new(), KEY),
            CountingRenderer::default(),
            CurrencyCode::INR,
        );

        assert_eq!(panel.render(), "0 items");
        assert_eq!(panel.render(), "0 items");
        assert_eq!(panel.renderer().renders.get(), 1);

        panel.add(product("a", 100));
        panel.toggle();
        assert_eq!(panel.render(), "1 items");
        assert_eq!(panel.renderer().renders.get(), 2);

        panel.dispatch("explode", "0");
        panel.render();
        assert_eq!(panel.renderer().renders.get(), 2);
    }

    #[test]
    fn test_load_restores_saved_cart() {
        let saved = r#"[{"id":"a","name":"A","price":3,"image":"","quantity":2}]"#;
        let mut panel = CartPanel::new(
            CartStore::new(MemoryStore::new().with_entry(KEY, saved), KEY),
            HtmlRenderer,
            CurrencyCode::INR,
        );
        panel.load();
        assert_eq!(panel.totals().item_count, 2);
        assert_eq!(panel.view().total, "₹6.00");
    }
}
