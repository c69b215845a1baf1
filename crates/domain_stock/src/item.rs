//! Stock items
//!
//! A stock item is one deployed batch of one vaccine at one post. It is
//! created on the first stock entry, mutated by every subsequent
//! movement, and deleted when the batch is fully withdrawn or expired.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{PostId, StockItemId, VaccineId};

/// A deployed batch of a vaccine at a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    /// Unique identifier
    pub id: StockItemId,
    /// The vaccination post holding this batch
    pub post_id: PostId,
    /// The vaccine
    pub vaccine_id: VaccineId,
    /// Current quantity of doses; never negative
    pub quantity: i64,
    /// Lot label as printed on the batch
    pub batch: String,
    /// Calendar date the batch expires
    pub expiration_date: NaiveDate,
    /// When the item was created
    pub created_at: DateTime<Utc>,
    /// When the item was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Request to create a stock item (first entry of a batch)
#[derive(Debug, Clone)]
pub struct NewStockItem {
    pub post_id: PostId,
    pub vaccine_id: VaccineId,
    /// Initial quantity; must be positive
    pub quantity: i64,
    pub batch: String,
    pub expiration_date: NaiveDate,
}

/// Partial update to a stock item
///
/// Omitted fields are left unchanged. A quantity change produces a ledger
/// movement; batch or expiration corrections alone do not.
#[derive(Debug, Clone, Default)]
pub struct StockUpdate {
    pub quantity: Option<i64>,
    pub batch: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

impl StockUpdate {
    /// An update that only changes the quantity
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Default::default()
        }
    }
}
