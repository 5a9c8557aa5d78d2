//! Deterministic transition application over CartState.

use serde::{Deserialize, Serialize};

use super::identity::ProductId;
use super::item::{LineItem, ProductRef};
use super::state::CartState;

/// Direction of a single-step quantity change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// A cart transition. Payload fields are fixed per tag and consumed by
/// exhaustive matching in [`apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Replace state wholesale with the canonical server list.
    Load { items: Vec<LineItem> },
    /// Add `quantity` of a product; increments the existing line if present.
    Add { product: ProductRef, quantity: u32 },
    /// Delete the line with the matching id. Absent id is a no-op.
    Remove { id: ProductId },
    /// Step the matching line's quantity by exactly 1. Absent id is a no-op.
    Update { id: ProductId, direction: Direction },
    /// Roll back to a prior snapshot, discarding any pending optimistic change.
    Revert { prior: CartState },
    /// Empty the cart (the optimistic half of checkout).
    Clear,
}

/// Pure transition function: next state from current state and transition.
///
/// No I/O, no clock reads. The same `(state, transition)` pair always yields
/// the same result. Quantities trust the payload; clamping against stock is
/// the caller's responsibility. Missing-id edits must never panic.
pub fn apply(state: CartState, transition: Transition) -> CartState {
    match transition {
        Transition::Load { items } => CartState::from_items(items),

        Transition::Add { product, quantity } => {
            let mut state = state;
            match state.position(&product.id) {
                Some(index) => {
                    let line = &mut state.items_mut()[index];
                    line.quantity = line.quantity.saturating_add(quantity);
                }
                None => state.items_mut().push(LineItem::new(product, quantity)),
            }
            state
        }

        Transition::Remove { id } => {
            let mut state = state;
            if let Some(index) = state.position(&id) {
                state.items_mut().remove(index);
            }
            state
        }

        Transition::Update { id, direction } => {
            let mut state = state;
            if let Some(index) = state.position(&id) {
                let line = &mut state.items_mut()[index];
                line.quantity = match direction {
                    Direction::Increase => line.quantity.saturating_add(1),
                    Direction::Decrease => line.quantity.saturating_sub(1),
                };
            }
            state
        }

        Transition::Revert { prior } => prior,

        Transition::Clear => CartState::new(),
    }
}
