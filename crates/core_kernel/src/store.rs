//! Store port abstractions
//!
//! Every domain defines its own store trait (the port) that adapters
//! implement: an internal database, an external system of record, or an
//! in-memory mock for testing. This module provides the error type and
//! marker trait shared by all of them.
//!
//! ```rust,ignore
//! // In domain_stock/src/ports.rs
//! #[async_trait]
//! pub trait StockStore: DomainStore {
//!     async fn get_item(&self, id: StockItemId) -> Result<Option<StockItem>, StoreError>;
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for store operations
///
/// A unified error type that all store implementations must use, ensuring
/// consistent error handling across internal and external adapters. Domain
/// errors wrap this where a store failure surfaces through a service call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        StoreError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns true if this error indicates a transient failure that may
    /// succeed on retry (retries belong to the transport layer, not here)
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }
}

/// Marker trait for all domain stores
///
/// All store traits extend this marker to ensure they are thread-safe and
/// usable in async contexts.
pub trait DomainStore: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let error = StoreError::not_found("StockItem", "abc-123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("StockItem"));
        assert!(error.to_string().contains("abc-123"));
    }

    #[test]
    fn test_connection_is_transient() {
        let error = StoreError::connection("pool exhausted");
        assert!(error.is_transient());
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_conflict_message() {
        let error = StoreError::conflict("duplicate key");
        assert_eq!(error.to_string(), "Conflict: duplicate key");
    }
}
