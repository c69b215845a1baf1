//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{PostId, VaccineId};
use domain_identity::{Dependent, PrimaryAccount};
use domain_stock::NewStockItem;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, Name};
use fake::Fake;

use crate::fixtures::{CpfFixtures, IdFixtures, TemporalFixtures};

/// Builder for constructing stock item creation requests
pub struct NewStockItemBuilder {
    post_id: PostId,
    vaccine_id: VaccineId,
    quantity: i64,
    batch: String,
    expiration_date: NaiveDate,
}

impl Default for NewStockItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewStockItemBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            post_id: IdFixtures::post_id(),
            vaccine_id: IdFixtures::vaccine_id(),
            quantity: 50,
            batch: "LOT-2024-A".to_string(),
            expiration_date: TemporalFixtures::expires_later(),
        }
    }

    /// Sets the post
    pub fn with_post(mut self, post_id: PostId) -> Self {
        self.post_id = post_id;
        self
    }

    /// Sets the vaccine
    pub fn with_vaccine(mut self, vaccine_id: VaccineId) -> Self {
        self.vaccine_id = vaccine_id;
        self
    }

    /// Sets the initial quantity
    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the batch label
    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = batch.into();
        self
    }

    /// Sets the expiration date
    pub fn with_expiration(mut self, date: NaiveDate) -> Self {
        self.expiration_date = date;
        self
    }

    /// Builds the creation request
    pub fn build(self) -> NewStockItem {
        NewStockItem {
            post_id: self.post_id,
            vaccine_id: self.vaccine_id,
            quantity: self.quantity,
            batch: self.batch,
            expiration_date: self.expiration_date,
        }
    }
}

/// Builder for constructing primary account rows
pub struct PrimaryAccountBuilder {
    cpf: String,
    name: String,
    email: String,
    date_of_birth: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Default for PrimaryAccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimaryAccountBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            cpf: CpfFixtures::guardian().to_string(),
            name: Name().fake(),
            email: SafeEmail().fake(),
            date_of_birth: TemporalFixtures::date_of_birth_adult(),
            created_at: TemporalFixtures::registered_at(),
        }
    }

    /// Sets the stored CPF (canonical or legacy punctuated)
    pub fn with_cpf(mut self, cpf: impl Into<String>) -> Self {
        self.cpf = cpf.into();
        self
    }

    /// Sets the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the date of birth
    pub fn with_date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = dob;
        self
    }

    /// Sets the registration timestamp
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Builds the account row
    pub fn build(self) -> PrimaryAccount {
        PrimaryAccount {
            cpf: self.cpf,
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            created_at: self.created_at,
        }
    }
}

/// Builder for constructing dependent rows
pub struct DependentBuilder {
    cpf: String,
    guardian_cpf: String,
    name: String,
    date_of_birth: NaiveDate,
    relationship: String,
    created_at: DateTime<Utc>,
}

impl Default for DependentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DependentBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            cpf: CpfFixtures::dependent().to_string(),
            guardian_cpf: CpfFixtures::guardian().to_string(),
            name: FirstName().fake(),
            date_of_birth: TemporalFixtures::date_of_birth_child(),
            relationship: "child".to_string(),
            created_at: TemporalFixtures::registered_at(),
        }
    }

    /// Sets the stored CPF (canonical or legacy punctuated)
    pub fn with_cpf(mut self, cpf: impl Into<String>) -> Self {
        self.cpf = cpf.into();
        self
    }

    /// Sets the guardian's stored CPF
    pub fn with_guardian(mut self, cpf: impl Into<String>) -> Self {
        self.guardian_cpf = cpf.into();
        self
    }

    /// Sets the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the date of birth
    pub fn with_date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = dob;
        self
    }

    /// Sets the relationship to the guardian
    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = relationship.into();
        self
    }

    /// Sets the registration timestamp
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Builds the dependent row
    pub fn build(self) -> Dependent {
        Dependent {
            cpf: self.cpf,
            guardian_cpf: self.guardian_cpf,
            name: self.name,
            date_of_birth: self.date_of_birth,
            relationship: self.relationship,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_item_builder_defaults() {
        let new = NewStockItemBuilder::new().build();
        assert_eq!(new.quantity, 50);
        assert_eq!(new.batch, "LOT-2024-A");
    }

    #[test]
    fn test_stock_item_builder_customization() {
        let new = NewStockItemBuilder::new()
            .with_quantity(10)
            .with_batch("LOT-2024-B")
            .with_expiration(TemporalFixtures::expires_soon())
            .build();

        assert_eq!(new.quantity, 10);
        assert_eq!(new.batch, "LOT-2024-B");
        assert_eq!(new.expiration_date, TemporalFixtures::expires_soon());
    }

    #[test]
    fn test_identity_builders_generate_contact_details() {
        let account = PrimaryAccountBuilder::new().build();
        assert!(!account.name.is_empty());
        assert!(account.email.contains('@'));

        let dependent = DependentBuilder::new().build();
        assert!(!dependent.name.is_empty());
    }

    #[test]
    fn test_dependent_builder_legacy_form() {
        let dependent = DependentBuilder::new()
            .with_cpf(CpfFixtures::dependent_formatted())
            .build();

        assert_eq!(dependent.cpf, "123.456.789-01");
        assert_eq!(dependent.guardian_cpf, CpfFixtures::guardian());
    }
}
