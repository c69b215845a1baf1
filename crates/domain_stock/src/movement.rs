//! Stock movements
//!
//! One movement records one atomic quantity change, tagged with a kind.
//! Movements are append-only and immutable once written; the movement log
//! outlives the stock items it describes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ActorId, MovementId, PostId, VaccineId};

/// Kind of quantity change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock added (initial entry or upward correction)
    Entry,
    /// Stock removed (withdrawal, downward correction, dose applied)
    Exit,
    /// Seed or manual correction carrying a signed delta
    Adjustment,
    /// Batch removed because it passed its expiration date
    Expired,
    /// Stock moved between posts
    Transfer,
}

/// One immutable entry in the stock ledger
///
/// Sign convention: `quantity_change` is a positive magnitude for
/// entry/exit/expired and for both legs of a transfer; adjustments carry
/// the signed delta directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Unique identifier (time-ordered)
    pub id: MovementId,
    /// Post the movement happened at
    pub post_id: PostId,
    /// Vaccine the movement concerns
    pub vaccine_id: VaccineId,
    /// Who performed the operation, when known
    pub actor: Option<ActorId>,
    /// Kind of movement
    pub kind: MovementKind,
    /// Magnitude of the change (signed for adjustments)
    pub quantity_change: i64,
    /// Quantity before the movement
    pub quantity_before: i64,
    /// Quantity after the movement
    pub quantity_after: i64,
    /// Batch label snapshot
    pub batch: Option<String>,
    /// Expiration date snapshot
    pub expiration_date: Option<NaiveDate>,
    /// Why the movement happened
    pub reason: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the movement was recorded
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Checks the before/after arithmetic invariant for this movement
    ///
    /// Entries add, exits and expirations subtract, adjustments apply the
    /// signed delta. A transfer leg is valid in either direction since
    /// the out and in legs share one kind.
    pub fn is_arithmetically_consistent(&self) -> bool {
        let StockMovement {
            quantity_before: before,
            quantity_after: after,
            quantity_change: change,
            ..
        } = *self;
        match self.kind {
            MovementKind::Entry => after == before + change,
            MovementKind::Exit | MovementKind::Expired => after == before - change,
            MovementKind::Adjustment => after == before + change,
            MovementKind::Transfer => after == before + change || after == before - change,
        }
    }
}
