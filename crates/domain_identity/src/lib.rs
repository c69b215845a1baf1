//! Identity Domain
//!
//! This crate resolves who is receiving a vaccination: a primary account
//! holder (a person with login credentials) or a dependent registered
//! under a guardian's account. Both are keyed by a Brazilian CPF.
//!
//! # CPF handling
//!
//! Historical rows may store CPFs either canonically (digits only) or in
//! the punctuated legacy form (`123.456.789-01`). The resolver tolerates
//! both on lookup but only ever persists the canonical form, and enforces
//! that a canonical CPF maps to at most one identity across the union of
//! primary accounts and dependents.
//!
//! ```rust,ignore
//! let resolver = IdentityResolver::new(store);
//! let resolved = resolver.resolve("123.456.789-01").await?;
//! match resolved.record {
//!     Identity::Primary(account) => println!("holder: {}", account.name),
//!     Identity::Dependent(dep) => println!("dependent of {}", dep.guardian_cpf),
//! }
//! ```

pub mod cpf;
pub mod error;
pub mod identity;
pub mod ports;
pub mod resolver;

pub use cpf::Cpf;
pub use error::IdentityError;
pub use identity::{
    Dependent, Identity, IdentityKind, NewDependent, NewPrimaryAccount, PrimaryAccount,
    ResolvedIdentity,
};
pub use ports::IdentityStore;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockIdentityStore;
pub use resolver::IdentityResolver;
