//! Core domain types for the cart engine
//!
//! Module hierarchy follows type dependency order:
//! - time: wall-clock primitive
//! - identity: ProductId, UserId, RequestId
//! - item: ProductRef, LineItem
//! - state: CartState
//! - transition: Transition + apply

pub mod error;
pub mod identity;
pub mod item;
pub mod state;
pub mod time;
pub mod transition;

pub use error::{CoreError, InvalidId};
pub use identity::{ProductId, RequestId, UserId};
pub use item::{LineItem, ProductRef};
pub use state::CartState;
pub use time::WallClock;
pub use transition::{Direction, Transition, apply};
