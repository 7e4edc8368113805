//! Logging macros for formatted messages without call-site fields.
//!
//! Each macro formats its arguments like `format!` and calls the matching
//! [`Logger`](crate::Logger) method with an empty field list.
//!
//! # Examples
//!
//! ```
//! use rust_telemetry_logger::prelude::*;
//! use rust_telemetry_logger::info;
//!
//! let logger = Logger::nop();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_telemetry_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_telemetry_logger::debug;
/// debug!(logger, "Cache size: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format!($($arg)+), &[])
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format!($($arg)+), &[])
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_telemetry_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_telemetry_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format!($($arg)+), &[])
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format!($($arg)+), &[])
    };
}

/// Record a business event on the report pipeline.
///
/// # Examples
///
/// ```
/// # use rust_telemetry_logger::prelude::*;
/// # let logger = Logger::nop();
/// use rust_telemetry_logger::report;
/// report!(logger, "Order {} placed", "o-19");
/// ```
#[macro_export]
macro_rules! report {
    ($logger:expr, $($arg:tt)+) => {
        $logger.report(format!($($arg)+), &[])
    };
}
