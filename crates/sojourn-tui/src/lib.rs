//! # sojourn-tui
//!
//! Terminal UI for the Sojourn planner. A single-window app that walks the
//! applicant through the profile form, shows the agent pipeline while the
//! plan streams in, and renders the shortlist with timelines and Q&A.

pub mod app;
pub mod event;
pub mod form;
pub mod progress;
pub mod qna;
pub mod results;
pub mod view;

pub use app::{App, AppResult};
