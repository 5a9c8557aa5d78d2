//! Products as seen from the cart, and cart line items.

use serde::{Deserialize, Serialize};

use super::identity::ProductId;

/// Product summary carried inside a cart line.
///
/// `price` is in minor currency units. `stock` is advisory here: quantity
/// clamping against stock is the UI layer's job, not the state machine's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub title: String,
    pub price: u64,
    pub stock: u32,
}

/// One cart line: a product and how many of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: ProductRef,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product: ProductRef, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn line_total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}
