//! Core Kernel - Foundational types for the vaccination system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers for posts, vaccines, stock and records
//! - The injectable clock collaborator for deterministic timestamps
//! - Port abstractions shared by every domain store

pub mod clock;
pub mod identifiers;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use identifiers::{
    ActorId, MovementId, PostId, StockItemId, VaccinationRecordId, VaccineId,
};
pub use store::{DomainStore, StoreError};
