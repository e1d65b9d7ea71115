//! Vertrag LLM - provider interface for the generation pipeline
//!
//! Everything the pipeline knows about the LLM provider lives here:
//! - Chat wire types and the [`LlmClient`] trait seam
//! - An OpenAI-compatible HTTP client
//! - An injectable fixed-interval call gate with exponential backoff
//!
//! The pipeline crates depend only on the trait; the concrete client and
//! the gate are composed by the caller.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod error;
pub mod gate;
pub mod openai;

pub use client::{ChatMessage, ChatRequest, ChatResponse, LlmClient, ModelSettings};
pub use error::LlmError;
pub use gate::{CallGate, GatedClient};
pub use openai::OpenAiClient;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
