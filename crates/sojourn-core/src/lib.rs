//! # sojourn-core
//!
//! Core types, errors, and utilities shared across the Sojourn client.
//!
//! This crate provides:
//! - [`SojournError`] - Error types for all client operations
//! - [`logging`] - Tracing setup and log management utilities
//! - [`types`] - Wire and domain types for the planner API
//! - [`agent`] - Agent pipeline stages and the progress state machine
//!
//! ## Example
//!
//! ```no_run
//! use sojourn_core::{logging, agent::PipelineProgress};
//!
//! fn main() -> sojourn_core::Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!
//!     let mut progress = PipelineProgress::new();
//!     progress.reset();
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod error;
pub mod logging;
pub mod types;

// Re-export main types for convenience
pub use agent::{AgentStage, NodeState, PipelineProgress};
pub use error::{Result, SojournError};
pub use logging::{LogGuard, init_logging};
pub use types::{
    PlanResult, Program, ProgramMatch, QnaPair, ResumeProfile, StreamEvent, StudentProfile,
    TimelineTask,
};
