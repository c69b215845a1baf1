//! Read-side aggregation over the movement log
//!
//! Pure functions: deterministic given the same log slice, no mutation
//! capability. The ledger's query methods feed these from the store.

use serde::{Deserialize, Serialize};

use crate::movement::{MovementKind, StockMovement};

/// Movement counts grouped by kind
///
/// Kinds absent from the log count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_entries: u64,
    pub total_exits: u64,
    pub total_adjustments: u64,
    pub total_expired: u64,
    pub total_transfers: u64,
}

/// Counts movements per kind
pub fn summary_stats(movements: &[StockMovement]) -> SummaryStats {
    let mut stats = SummaryStats::default();
    for movement in movements {
        match movement.kind {
            MovementKind::Entry => stats.total_entries += 1,
            MovementKind::Exit => stats.total_exits += 1,
            MovementKind::Adjustment => stats.total_adjustments += 1,
            MovementKind::Expired => stats.total_expired += 1,
            MovementKind::Transfer => stats.total_transfers += 1,
        }
    }
    stats
}

/// Net quantity moved in and out across the slice
///
/// Entries and inbound adjustments add; exits, expirations and outbound
/// adjustments subtract. Transfers are net-zero across both legs and are
/// skipped.
pub fn net_quantity_change(movements: &[StockMovement]) -> i64 {
    movements
        .iter()
        .map(|m| match m.kind {
            MovementKind::Entry => m.quantity_change,
            MovementKind::Exit | MovementKind::Expired => -m.quantity_change,
            MovementKind::Adjustment => m.quantity_change,
            MovementKind::Transfer => 0,
        })
        .sum()
}
