//! Vaccination records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{PostId, VaccinationRecordId, VaccineId};

/// One administered dose
///
/// Never mutated and never deleted in normal operation. `cpf` is the
/// canonical form resolved at write time; `is_dependent` is the frozen
/// classification from that same resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    /// Unique identifier
    pub id: VaccinationRecordId,
    /// Canonical CPF of the person who received the dose
    pub cpf: String,
    /// Whether the subject was a dependent at application time
    pub is_dependent: bool,
    /// The vaccine administered
    pub vaccine_id: VaccineId,
    /// The post where the dose was applied
    pub post_id: PostId,
    /// Batch label of the applied dose
    pub batch: String,
    /// When the dose was applied
    pub application_date: DateTime<Utc>,
    /// When the record was written
    pub created_at: DateTime<Utc>,
}

/// Request to record an administered dose
#[derive(Debug, Clone)]
pub struct NewVaccination {
    /// Raw CPF of the subject; any storage form is accepted
    pub cpf: String,
    pub vaccine_id: VaccineId,
    pub post_id: PostId,
    pub batch: String,
    /// Defaults to "now" from the injected clock when omitted
    pub application_date: Option<DateTime<Utc>>,
}
