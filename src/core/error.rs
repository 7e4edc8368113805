//! Error types for the logger system

use std::fmt;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level text outside the known set
    #[error("unrecognized level: {0:?}")]
    UnrecognizedLevel(String),

    /// Parse-into through an absent level slot
    #[error("can't unmarshal a nil level")]
    NilLevel,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A configured destination could not be attached
    #[error("Destination '{destination}' unavailable: {message}")]
    DestinationUnavailable {
        destination: String,
        message: String,
    },

    /// Flushing buffered bytes to a destination failed
    #[error("Write to '{destination}' failed: {source}")]
    WriteFailure {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Several independent failures, e.g. while closing every pipeline
    #[error("{}", MultipleDisplay(.0))]
    Multiple(Vec<LoggerError>),
}

struct MultipleDisplay<'a>(&'a [LoggerError]);

impl fmt::Display for MultipleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred", self.0.len())?;
        for err in self.0 {
            write!(f, "; {}", err)?;
        }
        Ok(())
    }
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a destination unavailable error
    pub fn unavailable(destination: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DestinationUnavailable {
            destination: destination.into(),
            message: message.into(),
        }
    }

    /// Create a write failure for a named destination
    pub fn write_failure(destination: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::WriteFailure {
            destination: destination.into(),
            source,
        }
    }

    /// Collapse a list of errors: none is `Ok`, one is itself, more become `Multiple`
    pub fn aggregate(mut errors: Vec<LoggerError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(LoggerError::Multiple(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("level", "bad text");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::unavailable("tcp://127.0.0.1:1", "connection refused");
        assert!(matches!(err, LoggerError::DestinationUnavailable { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::UnrecognizedLevel("nope".to_string());
        assert_eq!(err.to_string(), "unrecognized level: \"nope\"");

        let err = LoggerError::config("Config", "buffer size too large");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for Config: buffer size too large"
        );

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = LoggerError::write_failure("network", io_err);
        assert_eq!(err.to_string(), "Write to 'network' failed: pipe closed");
    }

    #[test]
    fn test_aggregate() {
        assert!(LoggerError::aggregate(Vec::new()).is_ok());

        let single = LoggerError::aggregate(vec![LoggerError::NilLevel]).unwrap_err();
        assert!(matches!(single, LoggerError::NilLevel));

        let many = LoggerError::aggregate(vec![
            LoggerError::NilLevel,
            LoggerError::UnrecognizedLevel("x".to_string()),
        ])
        .unwrap_err();
        assert!(matches!(many, LoggerError::Multiple(ref v) if v.len() == 2));
        assert!(many.to_string().starts_with("2 errors occurred"));
    }
}
