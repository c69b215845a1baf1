//! Vaccination domain errors

use thiserror::Error;

use core_kernel::StoreError;
use domain_identity::IdentityError;
use domain_stock::StockError;

/// Errors that can occur while recording or querying vaccinations
#[derive(Debug, Error)]
pub enum VaccinationError {
    /// Identity resolution failed (invalid, unknown or duplicate CPF)
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The composed stock operation failed
    #[error(transparent)]
    Stock(#[from] StockError),

    /// The referenced record does not exist
    #[error("Vaccination record not found: {0}")]
    NotFound(String),

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
