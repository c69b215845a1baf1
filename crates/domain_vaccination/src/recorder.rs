//! The vaccination recorder
//!
//! Resolves the subject's identity, then persists the administered dose
//! with the canonical CPF and the frozen classification. Recording alone
//! does not touch stock; [`VaccinationRecorder::record_with_dose`] is the
//! seam that composes record creation with a ledger dose exit so callers
//! get both or neither visible effect from one call.

use std::sync::Arc;
use tracing::{debug, info};

use core_kernel::{ActorId, Clock, SystemClock, VaccinationRecordId};
use domain_identity::{cpf, Cpf, IdentityResolver, ResolvedIdentity};
use domain_stock::StockLedger;

use crate::error::VaccinationError;
use crate::ports::VaccinationStore;
use crate::record::{NewVaccination, VaccinationRecord};

/// Records administered doses against a [`VaccinationStore`]
pub struct VaccinationRecorder {
    resolver: Arc<IdentityResolver>,
    store: Arc<dyn VaccinationStore>,
    clock: Arc<dyn Clock>,
}

impl VaccinationRecorder {
    /// Creates a recorder using the system clock
    pub fn new(resolver: Arc<IdentityResolver>, store: Arc<dyn VaccinationStore>) -> Self {
        Self::with_clock(resolver, store, Arc::new(SystemClock))
    }

    /// Creates a recorder with an injected clock (deterministic tests)
    pub fn with_clock(
        resolver: Arc<IdentityResolver>,
        store: Arc<dyn VaccinationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            store,
            clock,
        }
    }

    /// Records an administered dose
    ///
    /// The subject is re-resolved on every call; the resulting
    /// classification is stamped onto the record and never recomputed.
    /// Stock is not decremented here; see [`record_with_dose`].
    ///
    /// # Errors
    ///
    /// Propagates [`IdentityError::InvalidIdentity`] and
    /// [`IdentityError::IdentityNotFound`] from resolution.
    ///
    /// [`record_with_dose`]: Self::record_with_dose
    /// [`IdentityError::InvalidIdentity`]: domain_identity::IdentityError::InvalidIdentity
    /// [`IdentityError::IdentityNotFound`]: domain_identity::IdentityError::IdentityNotFound
    pub async fn record(
        &self,
        new: NewVaccination,
        actor: Option<ActorId>,
    ) -> Result<VaccinationRecord, VaccinationError> {
        let resolved = self.resolver.resolve(&new.cpf).await?;
        self.persist(resolved, new, actor).await
    }

    /// Records an administered dose and consumes one from stock
    ///
    /// Identity is resolved first, then the ledger exit is applied, then
    /// the record is written; an unfulfillable dose therefore never
    /// leaves a dangling record. Adapter-level transactionality across
    /// the two stores is the adapters' concern.
    pub async fn record_with_dose(
        &self,
        new: NewVaccination,
        ledger: &StockLedger,
        actor: Option<ActorId>,
    ) -> Result<VaccinationRecord, VaccinationError> {
        let resolved = self.resolver.resolve(&new.cpf).await?;
        ledger.apply_dose(new.post_id, new.vaccine_id, actor).await?;
        self.persist(resolved, new, actor).await
    }

    /// The identity's own records, excluding its dependents'
    pub async fn list_for_identity(
        &self,
        raw: &str,
    ) -> Result<Vec<VaccinationRecord>, VaccinationError> {
        let canonical = Cpf::parse(raw)?;
        Ok(self.store.list_for_cpf(canonical.as_str(), false).await?)
    }

    /// The identity's own records plus those of every dependent under
    /// that guardian
    pub async fn list_for_identity_and_dependents(
        &self,
        raw: &str,
    ) -> Result<Vec<VaccinationRecord>, VaccinationError> {
        let canonical = Cpf::parse(raw)?;
        let mut cpfs = vec![canonical.as_str().to_string()];
        cpfs.extend(self.dependent_cpfs(raw).await?);
        Ok(self.store.list_for_cpfs(&cpfs).await?)
    }

    /// Only the records of dependents under this guardian
    pub async fn list_for_dependents(
        &self,
        raw: &str,
    ) -> Result<Vec<VaccinationRecord>, VaccinationError> {
        let cpfs = self.dependent_cpfs(raw).await?;
        if cpfs.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.list_dependents_for_cpfs(&cpfs).await?)
    }

    /// All records, most recent application first
    pub async fn list_all(&self) -> Result<Vec<VaccinationRecord>, VaccinationError> {
        Ok(self.store.list_all().await?)
    }

    /// Fetches one record
    pub async fn find(
        &self,
        id: VaccinationRecordId,
    ) -> Result<VaccinationRecord, VaccinationError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| VaccinationError::NotFound(id.to_string()))
    }

    /// Canonical CPFs of the guardian's dependents, legacy rows included
    async fn dependent_cpfs(&self, guardian_raw: &str) -> Result<Vec<String>, VaccinationError> {
        let dependents = self.resolver.dependents_of(guardian_raw).await?;
        Ok(dependents
            .iter()
            .map(|d| cpf::normalize(&d.cpf))
            .filter(|c| cpf::is_valid(c))
            .collect())
    }

    async fn persist(
        &self,
        resolved: ResolvedIdentity,
        new: NewVaccination,
        actor: Option<ActorId>,
    ) -> Result<VaccinationRecord, VaccinationError> {
        let now = self.clock.now();
        let record = VaccinationRecord {
            id: VaccinationRecordId::new_v7(),
            cpf: resolved.canonical_id.as_str().to_string(),
            is_dependent: resolved.is_dependent(),
            vaccine_id: new.vaccine_id,
            post_id: new.post_id,
            batch: new.batch,
            application_date: new.application_date.unwrap_or(now),
            created_at: now,
        };
        self.store.insert(record.clone()).await?;
        info!(
            record = %record.id,
            cpf = %record.cpf,
            is_dependent = record.is_dependent,
            actor = ?actor,
            "vaccination recorded"
        );
        debug!(subject = resolved.record.name(), "resolved subject");
        Ok(record)
    }
}
