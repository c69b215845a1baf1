//! Stock Domain
//!
//! This crate owns vaccine stock at vaccination posts: the current
//! quantity of each deployed batch, and an append-only ledger of every
//! quantity change.
//!
//! # Invariants
//!
//! - A stock item's quantity is a non-negative integer after every
//!   successful operation; paths that would drive it negative fail
//!   instead of clamping.
//! - Movements are immutable once appended and chain arithmetically:
//!   each movement's `quantity_after` equals the next movement's
//!   `quantity_before` on the same item.
//! - Deleting an item (withdrawal, expiry) never erases its history.
//!
//! Mutations go through [`StockLedger`], which serializes them so no two
//! movements are appended with inconsistent before/after chaining.

pub mod error;
pub mod item;
pub mod ledger;
pub mod movement;
pub mod ports;
pub mod reporting;

pub use error::StockError;
pub use item::{NewStockItem, StockItem, StockUpdate};
pub use ledger::StockLedger;
pub use movement::{MovementKind, StockMovement};
pub use ports::StockStore;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockStockStore;
pub use reporting::SummaryStats;
