//! Page lifecycle.
//!
//! [`StorefrontPage`] composes the cart panel, the session gate, and the
//! product catalog into the one object a host drives: construct it, call
//! [`load`](StorefrontPage::load), then forward clicks to it.

use tracing::{info, instrument};

use crate::cart::{CartAction, CartPanel, CartStore, CheckoutNotice, PanelState};
use crate::catalog::{Catalog, ProductGridView, ProductSource};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::render::{HtmlRenderer, Renderer};
use crate::session::{NavChrome, Navigation, SessionApi, SessionGate, SessionState};
use crate::storage::KeyValueStore;

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Cart drawer markup.
    pub cart: String,
    /// Header cart count badge markup.
    pub cart_count: String,
    pub panel: PanelState,
    pub nav: NavChrome,
    /// Login/logout affordance markup.
    pub nav_markup: String,
    /// Product grid markup.
    pub products: String,
}

/// One storefront page.
///
/// The backend client is cloned into the session gate so the session query
/// and the product listing can run concurrently.
#[derive(Debug)]
pub struct StorefrontPage<S, A, R = HtmlRenderer> {
    config: StorefrontConfig,
    api: A,
    panel: CartPanel<S, R>,
    gate: SessionGate<A>,
    catalog: Catalog,
    products_markup: String,
}

impl<S, A> StorefrontPage<S, A, HtmlRenderer>
where
    S: KeyValueStore,
    A: SessionApi + ProductSource + Clone,
{
    /// Build the page with HTML rendering. The saved cart is loaded; the
    /// session is anonymous until [`load`](Self::load) runs.
    pub fn new(config: StorefrontConfig, storage: S, api: A) -> Self {
        Self::with_renderer(config, storage, api, HtmlRenderer)
    }
}

impl<S, A, R> StorefrontPage<S, A, R>
where
    S: KeyValueStore,
    A: SessionApi + ProductSource + Clone,
    R: Renderer,
{
    /// Build the page with a custom renderer.
    pub fn with_renderer(config: StorefrontConfig, storage: S, api: A, renderer: R) -> Self {
        let mut panel = CartPanel::new(
            CartStore::new(storage, config.cart_storage_key.clone()),
            renderer,
            config.currency,
        );
        panel.load();
        let gate = SessionGate::new(api.clone(), config.login_path.clone());

        Self {
            config,
            api,
            panel,
            gate,
            catalog: Catalog::default(),
            products_markup: String::new(),
        }
    }

    /// Query the session and fetch products, then snapshot the page.
    ///
    /// Neither failure blocks the other: a failed session query leaves the
    /// visitor anonymous and a failed listing shows the unavailable notice.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> PageView {
        let (_, listing) = tokio::join!(self.gate.refresh(), self.api.list_products());

        let grid = match listing {
            Ok(products) => {
                let grid = ProductGridView::build(&products, self.config.currency);
                self.catalog = Catalog::new(products);
                grid
            }
            Err(e) => {
                StorefrontError::from(e).report("Product listing");
                self.catalog = Catalog::default();
                ProductGridView::unavailable()
            }
        };

        self.products_markup = self.panel.renderer().render_products(&grid).unwrap_or_else(|e| {
            StorefrontError::from(e).report("Product grid render");
            String::new()
        });
        info!(
            products = self.catalog.products().len(),
            authenticated = self.gate.is_authenticated(),
            "Page loaded"
        );

        self.view()
    }

    /// Current page snapshot.
    pub fn view(&mut self) -> PageView {
        let nav = self.gate.chrome();
        let nav_markup = self.panel.renderer().render_nav(&nav).unwrap_or_else(|e| {
            StorefrontError::from(e).report("Navigation render");
            String::new()
        });

        PageView {
            cart: self.panel.render().to_string(),
            cart_count: self.panel.render_count(),
            panel: self.panel.state(),
            nav,
            nav_markup,
            products: self.products_markup.clone(),
        }
    }

    /// Click on the rewards link.
    #[must_use]
    pub fn on_rewards_click(&self) -> Navigation {
        self.gate.on_gated_click(&self.config.rewards_path)
    }

    /// Log out, re-query the session, and close the cart drawer.
    pub async fn logout(&mut self) -> &SessionState {
        self.gate.logout().await;
        self.panel.close();
        self.gate.state()
    }

    /// Click on a product card's add button.
    pub fn add_to_cart(&mut self, product_id: &str) -> bool {
        self.panel.add_by_id(&self.catalog, product_id)
    }

    /// Click on a cart row control.
    pub fn dispatch(&mut self, action: &str, index: &str) -> Option<CartAction> {
        self.panel.dispatch(action, index)
    }

    /// Click on the cart icon.
    pub fn toggle_cart(&mut self) -> PanelState {
        self.panel.toggle()
    }

    /// Click on the checkout button.
    #[must_use]
    pub fn checkout(&self) -> CheckoutNotice {
        self.panel.checkout()
    }

    #[must_use]
    pub const fn panel(&self) -> &CartPanel<S, R> {
        &self.panel
    }

    #[must_use]
    pub const fn gate(&self) -> &SessionGate<A> {
        &self.gate
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }
}
