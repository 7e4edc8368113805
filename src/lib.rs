//! # Rust Telemetry Logger
//!
//! Structured, leveled telemetry emission for backend services, with an
//! optional buffered copy of every record sent to a remote stream.
//!
//! ## Features
//!
//! - **Copy-on-write contexts**: child loggers own their accumulated fields
//! - **Two pipelines**: operational "monitor" records and business "report" events
//! - **Write-behind buffering**: size- and time-bounded batches to remote destinations
//! - **Testable termination**: `fatal` exits through an injectable hook

pub mod core;
pub mod destinations;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Config, ExitHook, Field, FieldOpts, FieldValue, Level, LevelFilter, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, OutputFormat, Result,
    };
    pub use crate::destinations::{Connector, DefaultConnector};
}

pub use crate::core::{
    BufferedSink, Config, Destination, ExitHook, Field, FieldOpts, FieldValue, Level, LevelFilter,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat, Result, Sink, SinkMetrics,
};
pub use crate::destinations::{Connector, DefaultConnector};
