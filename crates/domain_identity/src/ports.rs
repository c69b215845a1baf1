//! Identity domain ports
//!
//! The [`IdentityStore`] trait defines what the identity domain needs
//! from its data source. Lookups are by the *stored* CPF string: the
//! resolver decides which representations (canonical, legacy punctuated)
//! to try, so adapters stay dumb exact-match queries and the
//! format-tolerance logic lives in one place.

use async_trait::async_trait;

use core_kernel::{DomainStore, StoreError};

use crate::identity::{Dependent, PrimaryAccount};

/// Data-source port for primary accounts and dependents
#[async_trait]
pub trait IdentityStore: DomainStore {
    /// Finds a primary account whose stored CPF equals `cpf` exactly
    async fn find_primary_exact(&self, cpf: &str) -> Result<Option<PrimaryAccount>, StoreError>;

    /// Finds a dependent whose stored CPF equals `cpf` exactly
    async fn find_dependent_exact(&self, cpf: &str) -> Result<Option<Dependent>, StoreError>;

    /// Returns all dependents
    ///
    /// Guardian filtering happens in the resolver because stored guardian
    /// CPFs may be in either representation.
    async fn list_dependents(&self) -> Result<Vec<Dependent>, StoreError>;

    /// Persists a new primary account
    async fn insert_primary(&self, account: PrimaryAccount) -> Result<(), StoreError>;

    /// Persists a new dependent
    async fn insert_dependent(&self, dependent: Dependent) -> Result<(), StoreError>;
}

/// In-memory mock implementation of [`IdentityStore`] for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Stores identities in memory, keyed by the CPF string exactly as
    /// stored, so tests can seed legacy punctuated rows.
    #[derive(Debug, Default)]
    pub struct MockIdentityStore {
        primaries: Arc<RwLock<HashMap<String, PrimaryAccount>>>,
        dependents: Arc<RwLock<HashMap<String, Dependent>>>,
    }

    impl MockIdentityStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a primary account row, preserving its stored CPF form
        pub async fn seed_primary(&self, account: PrimaryAccount) {
            self.primaries
                .write()
                .await
                .insert(account.cpf.clone(), account);
        }

        /// Seeds a dependent row, preserving its stored CPF form
        pub async fn seed_dependent(&self, dependent: Dependent) {
            self.dependents
                .write()
                .await
                .insert(dependent.cpf.clone(), dependent);
        }
    }

    impl DomainStore for MockIdentityStore {}

    #[async_trait]
    impl IdentityStore for MockIdentityStore {
        async fn find_primary_exact(
            &self,
            cpf: &str,
        ) -> Result<Option<PrimaryAccount>, StoreError> {
            Ok(self.primaries.read().await.get(cpf).cloned())
        }

        async fn find_dependent_exact(&self, cpf: &str) -> Result<Option<Dependent>, StoreError> {
            Ok(self.dependents.read().await.get(cpf).cloned())
        }

        async fn list_dependents(&self) -> Result<Vec<Dependent>, StoreError> {
            let mut all: Vec<_> = self.dependents.read().await.values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all)
        }

        async fn insert_primary(&self, account: PrimaryAccount) -> Result<(), StoreError> {
            let mut primaries = self.primaries.write().await;
            if primaries.contains_key(&account.cpf) {
                return Err(StoreError::conflict(format!(
                    "primary account {} already exists",
                    account.cpf
                )));
            }
            primaries.insert(account.cpf.clone(), account);
            Ok(())
        }

        async fn insert_dependent(&self, dependent: Dependent) -> Result<(), StoreError> {
            let mut dependents = self.dependents.write().await;
            if dependents.contains_key(&dependent.cpf) {
                return Err(StoreError::conflict(format!(
                    "dependent {} already exists",
                    dependent.cpf
                )));
            }
            dependents.insert(dependent.cpf.clone(), dependent);
            Ok(())
        }
    }
}
