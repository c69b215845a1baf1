//! CPF normalization
//!
//! Pure functions for canonicalizing a CPF string plus the [`Cpf`] value
//! type wrapping a validated canonical form. The canonical form is
//! digits-only, 11 characters; the legacy punctuated form
//! (`XXX.XXX.XXX-XX`) is produced only for display and for matching rows
//! stored before normalization was enforced.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IdentityError;

/// Number of digits in a canonical CPF
pub const CPF_LEN: usize = 11;

/// Strips separator punctuation (dots, hyphens) and whitespace.
///
/// Returns the empty string for empty input. Never fails; validation is
/// a separate concern ([`is_valid`]).
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '.' && *c != '-' && !c.is_whitespace())
        .collect()
}

/// True when `s` is exactly 11 ASCII digits
pub fn is_valid(s: &str) -> bool {
    s.len() == CPF_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// Re-inserts the canonical `XXX.XXX.XXX-XX` punctuation.
///
/// Input that does not normalize to 11 digits is returned unchanged, the
/// same behavior the legacy formatter had for malformed rows.
pub fn format(s: &str) -> String {
    let normalized = normalize(s);
    if !is_valid(&normalized) {
        return s.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &normalized[0..3],
        &normalized[3..6],
        &normalized[6..9],
        &normalized[9..11]
    )
}

/// A validated, canonical (digits-only) CPF
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Normalizes and validates a raw CPF string
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidIdentity`] unless the input
    /// normalizes to exactly 11 digits.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let normalized = normalize(raw);
        if !is_valid(&normalized) {
            return Err(IdentityError::InvalidIdentity(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// The canonical digits-only form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The punctuated display form (`XXX.XXX.XXX-XX`)
    pub fn formatted(&self) -> String {
        format(&self.0)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
