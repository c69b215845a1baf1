//! Identity resolution
//!
//! [`IdentityResolver`] classifies a raw CPF as a primary account holder
//! or a dependent. Resolution is read-only and never cached: accounts can
//! be created at any time, so callers re-resolve per operation.
//!
//! Lookup tolerance: rows written before canonicalization was enforced
//! may store the punctuated form, so every lookup tries both the
//! canonical and the legacy representation before concluding "not found".
//! New rows are always persisted canonically.

use std::sync::Arc;
use tracing::{debug, info};

use core_kernel::{Clock, SystemClock};

use crate::cpf::{self, Cpf};
use crate::error::IdentityError;
use crate::identity::{
    Dependent, Identity, IdentityKind, NewDependent, NewPrimaryAccount, PrimaryAccount,
    ResolvedIdentity,
};
use crate::ports::IdentityStore;

/// Resolves and registers identities against an [`IdentityStore`]
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
    clock: Arc<dyn Clock>,
}

impl IdentityResolver {
    /// Creates a resolver using the system clock
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a resolver with an injected clock (deterministic tests)
    pub fn with_clock(store: Arc<dyn IdentityStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Classifies a raw CPF as a primary account holder or a dependent
    ///
    /// Primary lookup takes precedence: a CPF matching both sets (which
    /// the registration path prevents, but historical data may contain)
    /// resolves as `Primary`. On a dependent match the returned canonical
    /// ID is the *dependent's own* CPF, normalized, since the raw input is
    /// guaranteed equal only up to formatting.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::InvalidIdentity`] when the input does not
    ///   normalize to 11 digits
    /// - [`IdentityError::IdentityNotFound`] when neither set matches
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedIdentity, IdentityError> {
        let canonical = Cpf::parse(raw)?;

        if let Some(account) = self.find_primary(&canonical).await? {
            debug!(cpf = %canonical, "resolved as primary account");
            return Ok(ResolvedIdentity {
                kind: IdentityKind::Primary,
                canonical_id: canonical,
                record: Identity::Primary(account),
            });
        }

        if let Some(dependent) = self.find_dependent(&canonical).await? {
            // Stored form may be punctuated; re-canonicalize from the row
            let own_canonical = Cpf::parse(&dependent.cpf)?;
            debug!(cpf = %own_canonical, "resolved as dependent");
            return Ok(ResolvedIdentity {
                kind: IdentityKind::Dependent,
                canonical_id: own_canonical,
                record: Identity::Dependent(dependent),
            });
        }

        Err(IdentityError::IdentityNotFound(
            canonical.as_str().to_string(),
        ))
    }

    /// Registers a dependent under a guardian account
    ///
    /// Both CPFs are validated and persisted canonically. Fails with
    /// [`IdentityError::DuplicateIdentity`] when the dependent's canonical
    /// CPF already belongs to any identity, in either storage form.
    pub async fn register_dependent(
        &self,
        new: NewDependent,
        guardian_raw: &str,
    ) -> Result<Dependent, IdentityError> {
        let canonical = Cpf::parse(&new.cpf)?;
        let guardian = Cpf::parse(guardian_raw)?;

        self.ensure_unregistered(&canonical).await?;

        let dependent = Dependent {
            cpf: canonical.as_str().to_string(),
            guardian_cpf: guardian.as_str().to_string(),
            name: new.name,
            date_of_birth: new.date_of_birth,
            relationship: new.relationship,
            created_at: self.clock.now(),
        };
        self.store.insert_dependent(dependent.clone()).await?;
        info!(cpf = %canonical, guardian = %guardian, "registered dependent");
        Ok(dependent)
    }

    /// Registers a primary account
    ///
    /// Same duplicate enforcement as [`register_dependent`]; credentials
    /// are the auth collaborator's concern and never pass through here.
    ///
    /// [`register_dependent`]: Self::register_dependent
    pub async fn register_primary(
        &self,
        new: NewPrimaryAccount,
    ) -> Result<PrimaryAccount, IdentityError> {
        let canonical = Cpf::parse(&new.cpf)?;

        self.ensure_unregistered(&canonical).await?;

        let account = PrimaryAccount {
            cpf: canonical.as_str().to_string(),
            name: new.name,
            email: new.email,
            date_of_birth: new.date_of_birth,
            created_at: self.clock.now(),
        };
        self.store.insert_primary(account.clone()).await?;
        info!(cpf = %canonical, "registered primary account");
        Ok(account)
    }

    /// Returns every dependent registered under the guardian's CPF
    ///
    /// Stored guardian CPFs are normalized during comparison so legacy
    /// punctuated rows still match.
    pub async fn dependents_of(&self, guardian_raw: &str) -> Result<Vec<Dependent>, IdentityError> {
        let guardian = Cpf::parse(guardian_raw)?;
        let all = self.store.list_dependents().await?;
        Ok(all
            .into_iter()
            .filter(|d| cpf::normalize(&d.guardian_cpf) == guardian.as_str())
            .collect())
    }

    /// Guardian-scoped dependent lookup
    ///
    /// # Errors
    ///
    /// [`IdentityError::IdentityNotFound`] when the CPF matches no
    /// dependent of this guardian.
    pub async fn find_dependent_of(
        &self,
        raw: &str,
        guardian_raw: &str,
    ) -> Result<Dependent, IdentityError> {
        let canonical = Cpf::parse(raw)?;
        let guardian = Cpf::parse(guardian_raw)?;

        match self.find_dependent(&canonical).await? {
            Some(dependent) if cpf::normalize(&dependent.guardian_cpf) == guardian.as_str() => {
                Ok(dependent)
            }
            _ => Err(IdentityError::IdentityNotFound(
                canonical.as_str().to_string(),
            )),
        }
    }

    /// Primary lookup trying the canonical then the legacy stored form
    async fn find_primary(
        &self,
        canonical: &Cpf,
    ) -> Result<Option<PrimaryAccount>, IdentityError> {
        if let Some(account) = self.store.find_primary_exact(canonical.as_str()).await? {
            return Ok(Some(account));
        }
        Ok(self
            .store
            .find_primary_exact(&canonical.formatted())
            .await?)
    }

    /// Dependent lookup trying the legacy stored form then the canonical
    async fn find_dependent(&self, canonical: &Cpf) -> Result<Option<Dependent>, IdentityError> {
        if let Some(dependent) = self
            .store
            .find_dependent_exact(&canonical.formatted())
            .await?
        {
            return Ok(Some(dependent));
        }
        Ok(self.store.find_dependent_exact(canonical.as_str()).await?)
    }

    /// Fails with `DuplicateIdentity` when the canonical CPF already
    /// resolves to any identity
    async fn ensure_unregistered(&self, canonical: &Cpf) -> Result<(), IdentityError> {
        let taken = self.find_primary(canonical).await?.is_some()
            || self.find_dependent(canonical).await?.is_some();
        if taken {
            return Err(IdentityError::DuplicateIdentity(
                canonical.as_str().to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockIdentityStore;
    use chrono::{NaiveDate, Utc};

    fn account(cpf: &str, name: &str) -> PrimaryAccount {
        PrimaryAccount {
            cpf: cpf.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 20).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn dependent(cpf: &str, guardian_cpf: &str, name: &str) -> Dependent {
        Dependent {
            cpf: cpf.to_string(),
            guardian_cpf: guardian_cpf.to_string(),
            name: name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2016, 9, 3).unwrap(),
            relationship: "child".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn resolver_with(store: MockIdentityStore) -> IdentityResolver {
        IdentityResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_resolve_primary_from_punctuated_input() {
        let store = MockIdentityStore::new();
        store.seed_primary(account("12345678901", "Maria")).await;
        let resolver = resolver_with(store).await;

        let resolved = resolver.resolve("123.456.789-01").await.unwrap();
        assert_eq!(resolved.kind, IdentityKind::Primary);
        assert_eq!(resolved.canonical_id.as_str(), "12345678901");
    }

    #[tokio::test]
    async fn test_resolve_primary_stored_in_legacy_form() {
        let store = MockIdentityStore::new();
        store.seed_primary(account("123.456.789-01", "Maria")).await;
        let resolver = resolver_with(store).await;

        let resolved = resolver.resolve("12345678901").await.unwrap();
        assert_eq!(resolved.kind, IdentityKind::Primary);
    }

    #[tokio::test]
    async fn test_resolve_dependent_returns_own_canonical_cpf() {
        let store = MockIdentityStore::new();
        store
            .seed_dependent(dependent("987.654.321-00", "12345678901", "Pedro"))
            .await;
        let resolver = resolver_with(store).await;

        let resolved = resolver.resolve("98765432100").await.unwrap();
        assert_eq!(resolved.kind, IdentityKind::Dependent);
        assert!(resolved.is_dependent());
        // Canonical even though the row stores the punctuated form
        assert_eq!(resolved.canonical_id.as_str(), "98765432100");
    }

    #[tokio::test]
    async fn test_primary_takes_precedence_over_dependent() {
        let store = MockIdentityStore::new();
        store.seed_primary(account("12345678901", "Maria")).await;
        store
            .seed_dependent(dependent("12345678901", "99999999999", "Shadow"))
            .await;
        let resolver = resolver_with(store).await;

        let resolved = resolver.resolve("12345678901").await.unwrap();
        assert_eq!(resolved.kind, IdentityKind::Primary);
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_cpf() {
        let resolver = resolver_with(MockIdentityStore::new()).await;
        let err = resolver.resolve("123").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidIdentity(_)));
    }

    #[tokio::test]
    async fn test_resolve_unknown_cpf_is_not_found() {
        let resolver = resolver_with(MockIdentityStore::new()).await;
        let err = resolver.resolve("12345678901").await.unwrap_err();
        assert!(matches!(err, IdentityError::IdentityNotFound(_)));
    }

    #[tokio::test]
    async fn test_register_dependent_persists_canonical_forms() {
        let resolver = resolver_with(MockIdentityStore::new()).await;

        let created = resolver
            .register_dependent(
                NewDependent {
                    cpf: "987.654.321-00".to_string(),
                    name: "Pedro".to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(2016, 9, 3).unwrap(),
                    relationship: "child".to_string(),
                },
                "123.456.789-01",
            )
            .await
            .unwrap();

        assert_eq!(created.cpf, "98765432100");
        assert_eq!(created.guardian_cpf, "12345678901");
    }

    #[tokio::test]
    async fn test_register_dependent_rejects_duplicate_across_forms() {
        let store = MockIdentityStore::new();
        // Legacy punctuated row already occupies this CPF
        store
            .seed_dependent(dependent("987.654.321-00", "12345678901", "Pedro"))
            .await;
        let resolver = resolver_with(store).await;

        let err = resolver
            .register_dependent(
                NewDependent {
                    cpf: "98765432100".to_string(),
                    name: "Pedro Again".to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(2016, 9, 3).unwrap(),
                    relationship: "child".to_string(),
                },
                "12345678901",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn test_register_dependent_rejects_cpf_taken_by_account() {
        let store = MockIdentityStore::new();
        store.seed_primary(account("98765432100", "Maria")).await;
        let resolver = resolver_with(store).await;

        let err = resolver
            .register_dependent(
                NewDependent {
                    cpf: "98765432100".to_string(),
                    name: "Pedro".to_string(),
                    date_of_birth: NaiveDate::from_ymd_opt(2016, 9, 3).unwrap(),
                    relationship: "child".to_string(),
                },
                "12345678901",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::DuplicateIdentity(_)));
    }

    #[tokio::test]
    async fn test_dependents_of_matches_legacy_guardian_rows() {
        let store = MockIdentityStore::new();
        store
            .seed_dependent(dependent("98765432100", "123.456.789-01", "Pedro"))
            .await;
        store
            .seed_dependent(dependent("11122233344", "12345678901", "Clara"))
            .await;
        store
            .seed_dependent(dependent("55566677788", "99999999999", "Other"))
            .await;
        let resolver = resolver_with(store).await;

        let mut names: Vec<_> = resolver
            .dependents_of("123.456.789-01")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Clara", "Pedro"]);
    }

    #[tokio::test]
    async fn test_find_dependent_of_scopes_to_guardian() {
        let store = MockIdentityStore::new();
        store
            .seed_dependent(dependent("98765432100", "12345678901", "Pedro"))
            .await;
        let resolver = resolver_with(store).await;

        assert!(resolver
            .find_dependent_of("98765432100", "12345678901")
            .await
            .is_ok());
        let err = resolver
            .find_dependent_of("98765432100", "99999999999")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::IdentityNotFound(_)));
    }
}
