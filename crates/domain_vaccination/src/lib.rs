//! Vaccination Domain
//!
//! Records administered doses. Each record ties a resolved identity (by
//! canonical CPF plus a frozen primary/dependent classification) to one
//! vaccine, one post and one batch at an application timestamp.
//!
//! The classification is frozen at write time: a dependent can later be
//! deleted or reassigned without retroactively altering past records, so
//! the flag is never recomputed from a live join.

pub mod error;
pub mod ports;
pub mod record;
pub mod recorder;

pub use error::VaccinationError;
pub use ports::VaccinationStore;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockVaccinationStore;
pub use record::{NewVaccination, VaccinationRecord};
pub use recorder::VaccinationRecorder;
