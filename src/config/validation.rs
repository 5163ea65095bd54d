//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! Every violation is reported, not just the first.

use std::net::SocketAddr;

use crate::config::schema::IntakeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ConfigViolation {
    pub field: &'static str,
    pub message: String,
}

impl ConfigViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &IntakeConfig) -> Result<(), Vec<ConfigViolation>> {
    let mut violations = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        violations.push(ConfigViolation::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_submissions == 0 {
            violations.push(ConfigViolation::new(
                "rate_limit.max_submissions",
                "must be greater than 0",
            ));
        }
        if config.rate_limit.window_secs == 0 {
            violations.push(ConfigViolation::new(
                "rate_limit.window_secs",
                "must be greater than 0",
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        violations.push(ConfigViolation::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.timeouts.sink_secs == 0 {
        violations.push(ConfigViolation::new("timeouts.sink_secs", "must be greater than 0"));
    }

    if config.sink.range.trim().is_empty() {
        violations.push(ConfigViolation::new("sink.range", "must not be empty"));
    }
    if !matches!(config.sink.value_input_option.as_str(), "RAW" | "USER_ENTERED") {
        violations.push(ConfigViolation::new(
            "sink.value_input_option",
            format!(
                "'{}' is not one of RAW, USER_ENTERED",
                config.sink.value_input_option
            ),
        ));
    }
    for (field, value) in [
        ("sink.token_uri", &config.sink.token_uri),
        ("sink.api_base_url", &config.sink.api_base_url),
    ] {
        if url::Url::parse(value).is_err() {
            violations.push(ConfigViolation::new(field, format!("'{}' is not a URL", value)));
        }
    }

    if config.security.max_body_size == 0 {
        violations.push(ConfigViolation::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        violations.push(ConfigViolation::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&IntakeConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let mut config = IntakeConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.rate_limit.max_submissions = 0;
        config.sink.value_input_option = "FORMULA".into();

        let violations = validate_config(&config).unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "rate_limit.max_submissions",
                "sink.value_input_option"
            ]
        );
    }

    #[test]
    fn zero_limit_is_fine_when_disabled() {
        let mut config = IntakeConfig::default();
        config.rate_limit.enabled = false;
        config.rate_limit.max_submissions = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn metrics_address_only_checked_when_enabled() {
        let mut config = IntakeConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let violations = validate_config(&config).unwrap_err();
        assert_eq!(violations[0].field, "observability.metrics_address");
    }
}
