//! Identity model
//!
//! An identity is either a primary account holder or a dependent
//! registered under a guardian's account. The classification is an
//! explicit tagged variant; callers never infer it from which table a row
//! happened to come from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cpf::Cpf;

/// A person with login credentials, the root of a guardian relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAccount {
    /// CPF as stored; historical rows may still carry punctuation
    pub cpf: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// A person without login credentials, associated with exactly one
/// guardian primary account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    /// CPF as stored; historical rows may still carry punctuation
    pub cpf: String,
    /// The guardian account's CPF as stored
    pub guardian_cpf: String,
    /// Display name
    pub name: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Relationship to the guardian (child, spouse, ...)
    pub relationship: String,
    /// When the dependent was registered
    pub created_at: DateTime<Utc>,
}

/// Request to register a new dependent under a guardian
#[derive(Debug, Clone)]
pub struct NewDependent {
    pub cpf: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub relationship: String,
}

/// Request to register a new primary account
///
/// Credentials are owned by the auth collaborator; the identity core only
/// records the attributes it needs for resolution.
#[derive(Debug, Clone)]
pub struct NewPrimaryAccount {
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// Classification of a resolved identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    Primary,
    Dependent,
}

/// A person who can receive a vaccination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    Primary(PrimaryAccount),
    Dependent(Dependent),
}

impl Identity {
    /// The classification tag for this identity
    pub fn kind(&self) -> IdentityKind {
        match self {
            Identity::Primary(_) => IdentityKind::Primary,
            Identity::Dependent(_) => IdentityKind::Dependent,
        }
    }

    /// Display name of the person
    pub fn name(&self) -> &str {
        match self {
            Identity::Primary(account) => &account.name,
            Identity::Dependent(dependent) => &dependent.name,
        }
    }
}

/// The outcome of a successful resolution
///
/// `canonical_id` is always the identity's own canonical CPF, not the raw
/// input: for a dependent matched through a legacy-formatted row the two
/// are equal only up to punctuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub kind: IdentityKind,
    pub canonical_id: Cpf,
    pub record: Identity,
}

impl ResolvedIdentity {
    /// True when the resolved identity is a dependent
    pub fn is_dependent(&self) -> bool {
        self.kind == IdentityKind::Dependent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_kind_tags() {
        let account = PrimaryAccount {
            cpf: "12345678901".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            created_at: Utc::now(),
        };
        assert_eq!(Identity::Primary(account).kind(), IdentityKind::Primary);
    }

    #[test]
    fn test_identity_serializes_with_tag() {
        let dependent = Dependent {
            cpf: "98765432100".to_string(),
            guardian_cpf: "12345678901".to_string(),
            name: "Pedro".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            relationship: "child".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(Identity::Dependent(dependent)).unwrap();
        assert_eq!(json["kind"], "dependent");
        assert_eq!(json["name"], "Pedro");
    }
}
