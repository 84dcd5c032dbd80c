//! Core domain entities of the patent registry.
//!
//! Entities are plain data. Records that can be created or partially updated
//! come with companion input types:
//! - `NewPatent` / `PatentPatch`
//! - `NewPerson` / `PersonPatch`
//! - `NewOwnership`, `NewFilter`

pub mod filter;
pub mod ownership;
pub mod patent;
pub mod person;
pub mod stats;

pub use filter::{FilterSummary, NewFilter, TaxNumberFilter};
pub use ownership::{NewOwnership, Ownership, OwnershipQuery};
pub use patent::{
    NewPatent, Patent, PatentHolder, PatentKey, PatentKind, PatentPatch, PatentQuery,
    PatentWithHolders,
};
pub use person::{NewPerson, Person, PersonKind, PersonPatch, PersonWithPatents};
pub use stats::{
    CategoryCount, MoscowPersonsStats, PatentBreakdown, PatentCounts, PatentsStats,
    PersonCounts, PersonsBreakdown, PersonsStats,
};
