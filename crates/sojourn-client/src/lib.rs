//! # sojourn-client
//!
//! HTTP client for the Sojourn planner API.
//!
//! Two endpoints exist: `/api/generate-plan-stream`, which answers a profile
//! POST with an SSE-style stream of progress and result events, and
//! `/api/parse-resume`, which extracts a partial profile from free text.
//! The stream is decoded incrementally by [`SseFramer`] so a record split
//! across network reads still parses once complete.

pub mod config;
pub mod error;
pub mod resume;
pub mod sse;
pub mod stream;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use resume::ResumeClient;
pub use sse::SseFramer;
pub use stream::{CancelToken, ChannelEventSink, EventSink, PlanClient};
