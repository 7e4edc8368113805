//! Resolved logger configuration
//!
//! Values arrive already merged (explicit input over environment over
//! built-in default) by whoever owns configuration loading. This module only
//! holds and validates them.

use super::buffered_sink::{DEFAULT_BUFFER_SIZE, DEFAULT_FLUSH_INTERVAL};
use super::error::{LoggerError, Result};
use super::level::Level;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for `buffer_size`; larger values are treated as a typo
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Settings a root [`Logger`](super::Logger) is built from
///
/// # Example
///
/// ```
/// use rust_telemetry_logger::core::Config;
///
/// let config: Config = serde_json::from_str(
///     r#"{"service_name": "checkout", "level": "WARN", "flush_interval_ms": 250}"#,
/// ).unwrap();
///
/// assert_eq!(config.service_name, "checkout");
/// assert_eq!(config.effective_flush_interval().as_millis(), 250);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name stamped on every record as `logger`
    pub logger_name: String,

    /// Value of the `service` identity field
    pub service_name: String,

    /// Minimum level of the monitor pipeline, parsed case-insensitively
    pub level: String,

    /// Human-readable console output; `dpanic` panics
    pub development: bool,

    /// Destination of the monitor pipeline when remote delivery is on
    pub monitor_stream: Option<String>,

    /// Destination of the report pipeline; no report pipeline without it
    pub report_stream: Option<String>,

    /// Deliver through buffered remote destinations instead of the console
    pub remote_enabled: bool,

    /// Buffer capacity in bytes; zero selects the default
    pub buffer_size: usize,

    /// Time between background flushes; zero selects the default
    #[serde(rename = "flush_interval_ms", with = "millis")]
    pub flush_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_name: String::new(),
            service_name: String::new(),
            level: Level::Info.as_str().to_string(),
            development: false,
            monitor_stream: None,
            report_stream: None,
            remote_enabled: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn monitor_stream(mut self, id: impl Into<String>) -> Self {
        self.monitor_stream = Some(id.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_stream(mut self, id: impl Into<String>) -> Self {
        self.report_stream = Some(id.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_enabled(mut self, enabled: bool) -> Self {
        self.remote_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Parsed minimum level of the monitor pipeline
    pub fn min_level(&self) -> Result<Level> {
        self.level
            .parse::<Level>()
            .map_err(|e| LoggerError::config("level", e.to_string()))
    }

    /// Configured interval, or the default when zero
    pub fn effective_flush_interval(&self) -> Duration {
        if self.flush_interval.is_zero() {
            DEFAULT_FLUSH_INTERVAL
        } else {
            self.flush_interval
        }
    }

    /// Configured capacity, or the default when zero
    pub fn effective_buffer_size(&self) -> usize {
        match self.buffer_size {
            0 => DEFAULT_BUFFER_SIZE,
            bytes => bytes,
        }
    }

    /// Check the settings that can be checked without touching destinations
    pub fn validate(&self) -> Result<()> {
        self.min_level()?;

        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(LoggerError::config(
                "buffer_size",
                format!("{} bytes exceeds the {} byte limit", self.buffer_size, MAX_BUFFER_SIZE),
            ));
        }

        for (component, stream) in [
            ("monitor_stream", &self.monitor_stream),
            ("report_stream", &self.report_stream),
        ] {
            if matches!(stream, Some(id) if id.trim().is_empty()) {
                return Err(LoggerError::config(component, "destination identifier is empty"));
            }
        }

        Ok(())
    }
}

/// `Duration` as whole milliseconds on the wire
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.min_level().unwrap(), Level::Info);
        assert_eq!(config.effective_buffer_size(), DEFAULT_BUFFER_SIZE);
        assert_eq!(config.effective_flush_interval(), DEFAULT_FLUSH_INTERVAL);
        assert!(!config.remote_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_select_defaults() {
        let config = Config::new().buffer_size(0).flush_interval(Duration::ZERO);
        assert_eq!(config.effective_buffer_size(), DEFAULT_BUFFER_SIZE);
        assert_eq!(config.effective_flush_interval(), DEFAULT_FLUSH_INTERVAL);
    }

    #[test]
    fn test_sub_second_interval_kept() {
        let config = Config::new().flush_interval(Duration::from_millis(500));
        assert_eq!(config.effective_flush_interval(), Duration::from_millis(500));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["flush_interval_ms"], 500);
        let back: Config = serde_json::from_value(json).unwrap();
        assert_eq!(back.flush_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_bad_level_is_configuration_error() {
        let err = Config::new().level("verbose").validate().unwrap_err();
        match err {
            LoggerError::InvalidConfiguration { component, message } => {
                assert_eq!(component, "level");
                assert!(message.contains("unrecognized level"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_oversized_buffer_rejected() {
        let config = Config::new().buffer_size(MAX_BUFFER_SIZE + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_stream_rejected() {
        let config = Config::new().remote_enabled(true).monitor_stream("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(
            r#"{"logger_name":"api","remote_enabled":true,"monitor_stream":"tcp://127.0.0.1:9000"}"#,
        )
        .unwrap();

        assert_eq!(config.logger_name, "api");
        assert!(config.remote_enabled);
        assert_eq!(config.monitor_stream.as_deref(), Some("tcp://127.0.0.1:9000"));
        assert_eq!(config.level, "info");
    }
}
