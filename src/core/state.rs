//! In-memory cart contents.

use serde::{Deserialize, Serialize};

use super::identity::ProductId;
use super::item::LineItem;

/// Ordered cart contents, unique by product id.
///
/// Insertion order carries no meaning but is preserved for stable rendering.
/// The coordinator owns the canonical value; consumers only ever see
/// immutable views of it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a server payload, taken verbatim.
    ///
    /// Uniqueness of product ids in canonical payloads is the server's
    /// contract; this constructor does not deduplicate.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }

    pub fn quantity_of(&self, id: &ProductId) -> Option<u32> {
        self.get(id).map(|item| item.quantity)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals, derived on demand and never stored.
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.line_total()))
    }

    pub(crate) fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.product.id == id)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }
}
