//! FIFO Cost-Basis Lot Tracker
//!
//! Keeps per-holding purchase lots in acquisition order and consumes them
//! oldest-first when a sale is matched. Matching is all-or-nothing: a sale
//! that cannot be fully covered leaves every lot untouched.

pub mod error;
pub mod lot;
pub mod position;
pub mod tracker;

pub use error::LotError;
pub use lot::{Lot, LotMatch};
pub use position::{Position, PositionSnapshot};
pub use tracker::{LotTracker, PositionKey};
