//! Vertrag Pipeline - two-phase contract generation with self-correction
//!
//! Composes the phases into one orchestrated flow:
//! - Phase 1: meta-prompt generation with snapshot parsing and
//!   forbidden-topic allow-filtering
//! - Phase 2: low-temperature contract generation plus deterministic
//!   placeholder back-substitution
//! - Repair passes (universal, loan, custom-type), fail-soft
//! - Self-check critic, fail-open
//! - Retry/escalation policy, blended scoring, review-required decision
//! - Write-once provenance sink

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod call;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod phase1;
pub mod phase2;
pub mod prompts;
pub mod repair;
pub mod selfcheck;
pub mod sink;

// Re-exports for convenience
pub use config::{sla, PipelineConfig};
pub use error::{FailurePolicy, Phase, PipelineError};
pub use orchestrator::ContractPipeline;
pub use phase1::Phase1Output;
pub use phase2::Phase2Output;
pub use sink::{NullSink, ProvenanceSink};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
