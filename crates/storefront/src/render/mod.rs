//! Markup rendering for storefront view-models.
//!
//! View-models ([`CartView`], [`ProductGridView`], [`NavChrome`]) are pure
//! data. A [`Renderer`] turns them into markup; [`HtmlRenderer`] does so with
//! Askama templates under `templates/partials/`.
//!
//! Cart row controls carry `data-action` and `data-index` attributes and
//! product cards carry `data-product-id`, so a host needs one delegated
//! listener per container rather than one per row.

use askama::Template;
use thiserror::Error;

use crate::cart::CartView;
use crate::catalog::ProductGridView;
use crate::session::NavChrome;

/// Template rendering failed.
#[derive(Debug, Error)]
#[error("Template error: {0}")]
pub struct RenderError(#[from] askama::Error);

/// Turns view-models into markup.
pub trait Renderer {
    /// Render the cart rows, count, and total.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render_cart(&self, cart: &CartView) -> Result<String, RenderError>;

    /// Render the cart count badge.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render_cart_count(&self, count: u64) -> Result<String, RenderError>;

    /// Render the product grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render_products(&self, grid: &ProductGridView) -> Result<String, RenderError>;

    /// Render the login/logout navigation affordance.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    fn render_nav(&self, chrome: &NavChrome) -> Result<String, RenderError>;
}

/// Cart items fragment template.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
struct CartItemsTemplate<'a> {
    cart: &'a CartView,
}

/// Cart count badge fragment template.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
struct CartCountTemplate {
    count: u64,
}

/// Product grid fragment template.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
struct ProductGridTemplate<'a> {
    grid: &'a ProductGridView,
}

/// Navigation auth fragment template.
#[derive(Template)]
#[template(path = "partials/nav_auth.html")]
struct NavAuthTemplate<'a> {
    login_href: Option<&'a str>,
    logout_label: Option<&'a str>,
}

/// HTML renderer backed by Askama templates. Output is HTML-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render_cart(&self, cart: &CartView) -> Result<String, RenderError> {
        Ok(CartItemsTemplate { cart }.render()?)
    }

    fn render_cart_count(&self, count: u64) -> Result<String, RenderError> {
        Ok(CartCountTemplate { count }.render()?)
    }

    fn render_products(&self, grid: &ProductGridView) -> Result<String, RenderError> {
        Ok(ProductGridTemplate { grid }.render()?)
    }

    fn render_nav(&self, chrome: &NavChrome) -> Result<String, RenderError> {
        let template = match chrome {
            NavChrome::Login { href } => NavAuthTemplate {
                login_href: Some(href.as_str()),
                logout_label: None,
            },
            NavChrome::Logout { label } => NavAuthTemplate {
                login_href: None,
                logout_label: Some(label.as_str()),
            },
        };
        Ok(template.render()?)
    }
}
