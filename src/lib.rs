//! Commission intake service library.
//!
//! Collects "what classical music should exist" ideas from a web form,
//! rate-limits and validates them, and appends each accepted one as a row
//! in a spreadsheet.

pub mod clock;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod sink;
pub mod submission;

pub use config::IntakeConfig;
pub use http::IntakeServer;
pub use lifecycle::Shutdown;
