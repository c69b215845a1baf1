//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the
//! vaccination system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{ActorId, PostId, VaccineId};
use domain_identity::{Dependent, MockIdentityStore, PrimaryAccount};
use uuid::Uuid;

/// Fixture for CPF test data
///
/// The canonical/formatted pairs refer to the same person; seeding one
/// form and resolving through the other exercises the legacy-row
/// tolerance paths.
pub struct CpfFixtures;

impl CpfFixtures {
    /// Canonical CPF of the standard guardian account
    pub fn guardian() -> &'static str {
        "52998224725"
    }

    /// The guardian's CPF in the legacy punctuated form
    pub fn guardian_formatted() -> &'static str {
        "529.982.247-25"
    }

    /// Canonical CPF of the standard dependent (Pedro)
    pub fn dependent() -> &'static str {
        "12345678901"
    }

    /// Pedro's CPF in the legacy punctuated form
    pub fn dependent_formatted() -> &'static str {
        "123.456.789-01"
    }

    /// Canonical CPF of a second dependent under the same guardian
    pub fn second_dependent() -> &'static str {
        "98765432100"
    }

    /// A well-formed CPF that belongs to nobody
    pub fn unregistered() -> &'static str {
        "11122233344"
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard registration timestamp (Jan 10, 2024)
    pub fn registered_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    /// Standard application timestamp (Jun 15, 2024)
    pub fn application_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap()
    }

    /// Batch expiration in the near future
    pub fn expires_soon() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    /// Batch expiration further out
    pub fn expires_later() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    /// Date of birth for an adult guardian
    pub fn date_of_birth_adult() -> NaiveDate {
        NaiveDate::from_ymd_opt(1985, 2, 10).unwrap()
    }

    /// Date of birth for a child dependent
    pub fn date_of_birth_child() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic post ID for testing
    pub fn post_id() -> PostId {
        PostId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a second deterministic post ID (transfer destinations)
    pub fn other_post_id() -> PostId {
        PostId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic vaccine ID for testing
    pub fn vaccine_id() -> VaccineId {
        VaccineId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a second deterministic vaccine ID
    pub fn other_vaccine_id() -> VaccineId {
        VaccineId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }

    /// Creates a deterministic actor ID for testing
    pub fn actor_id() -> ActorId {
        ActorId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440005").unwrap())
    }
}

/// Fixture for pre-seeded identity stores
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// The standard guardian primary account
    pub fn guardian() -> PrimaryAccount {
        PrimaryAccount {
            cpf: CpfFixtures::guardian().to_string(),
            name: "Maria Souza".to_string(),
            email: "maria.souza@example.com".to_string(),
            date_of_birth: TemporalFixtures::date_of_birth_adult(),
            created_at: TemporalFixtures::registered_at(),
        }
    }

    /// Pedro, the standard dependent, stored with a legacy punctuated CPF
    pub fn pedro() -> Dependent {
        Dependent {
            cpf: CpfFixtures::dependent_formatted().to_string(),
            guardian_cpf: CpfFixtures::guardian().to_string(),
            name: "Pedro".to_string(),
            date_of_birth: TemporalFixtures::date_of_birth_child(),
            relationship: "child".to_string(),
            created_at: TemporalFixtures::registered_at(),
        }
    }

    /// A second dependent under the same guardian, stored canonically
    pub fn second_dependent() -> Dependent {
        Dependent {
            cpf: CpfFixtures::second_dependent().to_string(),
            guardian_cpf: CpfFixtures::guardian().to_string(),
            name: "Clara".to_string(),
            date_of_birth: TemporalFixtures::date_of_birth_child(),
            relationship: "child".to_string(),
            created_at: TemporalFixtures::registered_at(),
        }
    }

    /// An identity store seeded with the standard family: one guardian,
    /// Pedro (legacy-formatted row) and Clara (canonical row)
    pub async fn family_store() -> MockIdentityStore {
        let store = MockIdentityStore::new();
        store.seed_primary(Self::guardian()).await;
        store.seed_dependent(Self::pedro()).await;
        store.seed_dependent(Self::second_dependent()).await;
        store
    }
}
