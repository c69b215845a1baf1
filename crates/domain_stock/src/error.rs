//! Stock domain errors

use thiserror::Error;

use core_kernel::{PostId, StoreError, VaccineId};

/// Errors that can occur in the stock domain
#[derive(Debug, Error)]
pub enum StockError {
    /// The referenced stock item does not exist
    #[error("Stock item not found: {0}")]
    NotFound(String),

    /// The operation would violate a quantity invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// No eligible batch for dose application at this post
    #[error("Insufficient stock for vaccine {vaccine_id} at post {post_id}")]
    InsufficientStock {
        post_id: PostId,
        vaccine_id: VaccineId,
    },

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StockError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        StockError::NotFound(id.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        StockError::Validation(message.into())
    }
}
