//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned and echoed)
//!     → security::rate_limit (POST /api/submit only)
//!     → handlers.rs (validate, append to sink)
//!     → response.rs (JSON success / error body)
//! ```

pub mod form;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody, SubmitResponse};
pub use server::{AppState, IntakeServer};
