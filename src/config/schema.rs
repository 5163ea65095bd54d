//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the intake
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the intake service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct IntakeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Per-client submission limits.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Where accepted submissions are written.
    pub sink: SinkConfig,

    /// Submission form page.
    pub form: FormConfig,

    /// Security hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Sliding-window rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Admissions allowed per client inside one window.
    pub max_submissions: usize,

    /// Window length in seconds.
    pub window_secs: u64,

    /// How often idle clients are swept from memory (0 disables the sweep).
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_submissions: 5,
            window_secs: 60 * 60,
            sweep_interval_secs: 600,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Timeout for each call to the sink's HTTP API in seconds.
    pub sink_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            sink_secs: 10,
        }
    }
}

/// Which sink implementation receives accepted rows.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Google Sheets `values:append`.
    #[default]
    Sheets,
    /// Write rows to the log only (local development).
    Log,
}

/// Sink configuration.
///
/// Service account credentials are never read from this file; they come from
/// `GOOGLE_SERVICE_ACCOUNT_EMAIL` and `GOOGLE_PRIVATE_KEY`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    pub kind: SinkKind,

    /// Target spreadsheet. `GOOGLE_SHEET_ID` overrides it.
    pub spreadsheet_id: Option<String>,

    /// A1 range rows are appended to.
    pub range: String,

    /// `RAW` or `USER_ENTERED`.
    pub value_input_option: String,

    /// OAuth token endpoint.
    pub token_uri: String,

    /// Sheets API base URL.
    pub api_base_url: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Sheets,
            spreadsheet_id: None,
            range: "Sheet1!A:D".to_string(),
            value_input_option: "USER_ENTERED".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            api_base_url: "https://sheets.googleapis.com".to_string(),
        }
    }
}

/// Submission form page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Serve the form at `/`.
    pub enabled: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 16 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
