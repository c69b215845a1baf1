//! Vaccination domain ports
//!
//! [`VaccinationStore`] persists administered-dose records. Records are
//! append-only; there is no update or delete operation on this port.
//! CPF parameters are canonical: the recorder normalizes before querying,
//! and new records are always written canonically, so unlike the identity
//! store no legacy-form fallback is needed here.

use async_trait::async_trait;

use core_kernel::{DomainStore, StoreError, VaccinationRecordId};

use crate::record::VaccinationRecord;

/// Persistence port for vaccination records
#[async_trait]
pub trait VaccinationStore: DomainStore {
    /// Appends a record
    async fn insert(&self, record: VaccinationRecord) -> Result<(), StoreError>;

    /// Fetches a record by id
    async fn find(
        &self,
        id: VaccinationRecordId,
    ) -> Result<Option<VaccinationRecord>, StoreError>;

    /// All records, most recent application first
    async fn list_all(&self) -> Result<Vec<VaccinationRecord>, StoreError>;

    /// Records for one canonical CPF with the given frozen classification
    async fn list_for_cpf(
        &self,
        cpf: &str,
        is_dependent: bool,
    ) -> Result<Vec<VaccinationRecord>, StoreError>;

    /// Records whose canonical CPF is in `cpfs`, most recent first
    async fn list_for_cpfs(&self, cpfs: &[String]) -> Result<Vec<VaccinationRecord>, StoreError>;

    /// Dependent-classified records whose canonical CPF is in `cpfs`
    async fn list_dependents_for_cpfs(
        &self,
        cpfs: &[String],
    ) -> Result<Vec<VaccinationRecord>, StoreError>;
}

/// In-memory mock implementation of [`VaccinationStore`] for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Append-order record log
    #[derive(Debug, Default)]
    pub struct MockVaccinationStore {
        records: Arc<RwLock<Vec<VaccinationRecord>>>,
    }

    impl MockVaccinationStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        fn by_application_desc(mut records: Vec<VaccinationRecord>) -> Vec<VaccinationRecord> {
            records.sort_by(|a, b| b.application_date.cmp(&a.application_date));
            records
        }
    }

    impl DomainStore for MockVaccinationStore {}

    #[async_trait]
    impl VaccinationStore for MockVaccinationStore {
        async fn insert(&self, record: VaccinationRecord) -> Result<(), StoreError> {
            self.records.write().await.push(record);
            Ok(())
        }

        async fn find(
            &self,
            id: VaccinationRecordId,
        ) -> Result<Option<VaccinationRecord>, StoreError> {
            Ok(self
                .records
                .read()
                .await
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn list_all(&self) -> Result<Vec<VaccinationRecord>, StoreError> {
            Ok(Self::by_application_desc(
                self.records.read().await.clone(),
            ))
        }

        async fn list_for_cpf(
            &self,
            cpf: &str,
            is_dependent: bool,
        ) -> Result<Vec<VaccinationRecord>, StoreError> {
            let records = self
                .records
                .read()
                .await
                .iter()
                .filter(|r| r.cpf == cpf && r.is_dependent == is_dependent)
                .cloned()
                .collect();
            Ok(Self::by_application_desc(records))
        }

        async fn list_for_cpfs(
            &self,
            cpfs: &[String],
        ) -> Result<Vec<VaccinationRecord>, StoreError> {
            let records = self
                .records
                .read()
                .await
                .iter()
                .filter(|r| cpfs.iter().any(|c| c == &r.cpf))
                .cloned()
                .collect();
            Ok(Self::by_application_desc(records))
        }

        async fn list_dependents_for_cpfs(
            &self,
            cpfs: &[String],
        ) -> Result<Vec<VaccinationRecord>, StoreError> {
            let records = self
                .records
                .read()
                .await
                .iter()
                .filter(|r| r.is_dependent && cpfs.iter().any(|c| c == &r.cpf))
                .cloned()
                .collect();
            Ok(Self::by_application_desc(records))
        }
    }
}
