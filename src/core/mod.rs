//! Core logger types and traits

pub mod buffered_sink;
pub mod config;
pub mod context;
pub mod destination;
pub mod encoder;
pub mod error;
pub mod exit;
pub mod field;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod pipeline;
pub mod record;

pub use buffered_sink::{BufferedSink, FlushErrorCallback, DEFAULT_BUFFER_SIZE, DEFAULT_FLUSH_INTERVAL};
pub use config::{Config, MAX_BUFFER_SIZE};
pub use context::{FieldOpts, Identity, IDENTITY_FIELD_COUNT};
pub use destination::{Destination, LockedSink, Sink};
pub use encoder::OutputFormat;
pub use error::{LoggerError, Result};
pub use exit::{ExitHook, ExitStrategy, ExitStub, ProcessExit, StubbedExit};
pub use field::{Field, FieldValue};
pub use level::{Level, LevelFilter};
pub use logger::{Logger, LoggerBuilder, MONITOR_PIPELINE, REPORT_PIPELINE};
pub use metrics::{LoggerMetrics, SinkMetrics};
pub use pipeline::Pipeline;
pub use record::Record;
