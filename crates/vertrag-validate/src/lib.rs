//! Vertrag Validate - deterministic checks over generated contract text
//!
//! Pure functions, no network I/O:
//! - Weighted rule validation against the Phase-1 snapshot and the
//!   contract-type profile (roles, must-clauses, sequencing, forbidden
//!   topics, date format, currency format)
//! - Fuzzy normalization used for must-clause title matching
//! - Table-driven placeholder back-substitution of party data

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod fuzzy;
pub mod placeholder;
pub mod validator;

// Re-exports for convenience
pub use placeholder::{substitute_placeholders, PartySlot};
pub use validator::validate;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
