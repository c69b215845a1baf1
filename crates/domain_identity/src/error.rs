//! Identity domain errors

use thiserror::Error;

use core_kernel::StoreError;

/// Errors that can occur while resolving or registering identities
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The CPF does not normalize to 11 digits
    #[error("Invalid CPF: {0:?}")]
    InvalidIdentity(String),

    /// A well-formed CPF matched neither an account nor a dependent
    #[error("No account or dependent found for CPF {0}")]
    IdentityNotFound(String),

    /// The canonical CPF already belongs to another identity
    #[error("CPF {0} is already registered")]
    DuplicateIdentity(String),

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
