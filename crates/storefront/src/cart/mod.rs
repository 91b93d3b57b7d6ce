//! Cart state and presentation.
//!
//! - [`CartStore`] - line items and their durable copy
//! - [`CartView`] - pure view-model for rendering
//! - [`CartPanel`] - the cart drawer: visibility, dispatch, checkout

mod panel;
mod store;
mod view;

pub use panel::{CartPanel, CheckoutNotice};
pub use store::{CartProduct, CartStore};
pub use view::{
    CartAction, CartRowView, CartView, EMPTY_CART_MESSAGE, PanelState, UnknownCartAction,
};
