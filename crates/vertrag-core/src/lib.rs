//! Vertrag Core - domain types for the contract generation pipeline
//!
//! Defines the fundamental types shared by every pipeline stage:
//! - Contract types and their static profiles (roles, must-clauses, forbidden topics)
//! - User-supplied generation input
//! - The Phase-1 snapshot consumed by the deterministic stages
//! - Validation and self-check reports with weighted scoring
//! - The provenance record persisted at the end of a run

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod input;
pub mod profile;
pub mod record;
pub mod report;
pub mod snapshot;

// Re-exports for convenience
pub use error::ProfileError;
pub use input::{GenerationInput, Party, ProfileOverrides};
pub use profile::{
    canonical_role_terms, profile_for, ContractType, ContractTypeProfile, MustClause, Roles,
};
pub use record::{GenerationRecord, Phase1Provenance, Phase2Provenance, RequestId};
pub use report::{
    CheckKind, CheckOutcome, CheckRecord, GenerationOutcome, PipelineArtifacts, ScoreSummary,
    SelfCheckReport, Severity, TokenUsage, ValidationReport, SELF_CHECK_FAIL_OPEN_SCORE,
};
pub use snapshot::{Snapshot, SnapshotRoles};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Vertrag Core
    pub use crate::{
        profile_for, ContractType, ContractTypeProfile, GenerationInput, GenerationOutcome,
        GenerationRecord, MustClause, Party, RequestId, Roles, SelfCheckReport, Snapshot,
        ValidationReport,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
