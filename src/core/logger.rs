//! Main logger implementation

use super::{
    buffered_sink::{BufferedSink, FlushErrorCallback},
    config::Config,
    context::{FieldOpts, Identity},
    destination::{Destination, LockedSink, Sink},
    encoder::OutputFormat,
    error::{LoggerError, Result},
    exit::ExitHook,
    field::Field,
    level::{Level, LevelFilter},
    metrics::LoggerMetrics,
    pipeline::Pipeline,
    record::Record,
};
use crate::destinations::{ConsoleDestination, Connector, DefaultConnector, NullDestination};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Name of the pipeline carrying operational records
pub const MONITOR_PIPELINE: &str = "monitor";

/// Name of the pipeline carrying business events
pub const REPORT_PIPELINE: &str = "report";

/// Structured logging context
///
/// A root logger is built once per process with [`Logger::builder`]. Units
/// of work derive their own context with [`Logger::new_child`]; every
/// derived context owns its accumulated fields and shares the pipelines,
/// exit hook and metrics of the root.
///
/// # Example
///
/// ```
/// use rust_telemetry_logger::prelude::*;
/// use rust_telemetry_logger::destinations::MemoryDestination;
///
/// let memory = MemoryDestination::new();
/// let records = memory.handle();
///
/// let root = Logger::builder()
///     .config(Config::new().service_name("checkout"))
///     .monitor_destination(memory)
///     .build()
///     .unwrap();
///
/// let request = root.new_child(
///     Some(&FieldOpts::new().correlation_id("req-7")),
///     [Field::string("cart", "c-19")],
/// );
/// request.info("cart loaded", &[Field::int64("items", 3)]);
///
/// let line = &records.lines()[0];
/// assert_eq!(line["service"], "checkout");
/// assert_eq!(line["correlationID"], "req-7");
/// assert_eq!(line["cart"], "c-19");
/// assert_eq!(line["items"], 3);
/// ```
pub struct Logger {
    name: String,
    service: String,
    identity: Identity,
    /// Accumulated fields, oldest first. Never shared between contexts.
    fields: Vec<Field>,
    development: bool,
    monitor: Arc<Pipeline>,
    report: Option<Arc<Pipeline>>,
    exit: ExitHook,
    /// One-shot guard shared by every context derived from the same root
    closed: Arc<AtomicBool>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger that writes every record to a null destination
    ///
    /// Each call returns an independent value; nothing is shared with other
    /// no-op loggers.
    #[must_use]
    pub fn nop() -> Self {
        let sink: Arc<dyn Sink> = Arc::new(LockedSink::new(Box::new(NullDestination)));
        Self::from_parts(
            String::new(),
            String::new(),
            false,
            Pipeline::new(MONITOR_PIPELINE, LevelFilter::Off, OutputFormat::Json, sink),
            None,
            ExitHook::process(),
        )
    }

    fn from_parts(
        name: String,
        service: String,
        development: bool,
        monitor: Pipeline,
        report: Option<Pipeline>,
        exit: ExitHook,
    ) -> Self {
        Self {
            name,
            service,
            identity: Identity::default(),
            fields: Vec::new(),
            development,
            monitor: Arc::new(monitor),
            report: report.map(Arc::new),
            exit,
            closed: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Accumulated fields of this context, oldest first
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn exit_hook(&self) -> &ExitHook {
        &self.exit
    }

    /// Emission statistics shared by every derived context
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn has_report_pipeline(&self) -> bool {
        self.report.is_some()
    }

    /// Whether a record at `level` would reach the monitor pipeline
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.monitor.admits(level)
    }

    /// Update this context in place
    ///
    /// Requires `&mut self`; to hand a context to another task, derive one
    /// with [`Logger::new_child`] instead.
    pub fn with<I>(&mut self, opts: Option<&FieldOpts>, fields: I)
    where
        I: IntoIterator<Item = Field>,
    {
        let overwrite = match opts {
            Some(opts) => {
                self.identity.apply(opts);
                opts.overwrite_accumulated_fields
            }
            None => false,
        };

        if overwrite {
            self.fields.clear();
        }
        self.fields.extend(fields);
    }

    /// Derive an independent context
    ///
    /// The accumulated fields are always copied into a fresh vector, so the
    /// parent, the child and any sibling can be extended without seeing each
    /// other's fields.
    #[must_use]
    pub fn new_child<I>(&self, opts: Option<&FieldOpts>, fields: I) -> Logger
    where
        I: IntoIterator<Item = Field>,
    {
        let mut child = Logger {
            name: self.name.clone(),
            service: self.service.clone(),
            identity: self.identity.clone(),
            fields: self.fields.to_vec(),
            development: self.development,
            monitor: Arc::clone(&self.monitor),
            report: self.report.clone(),
            exit: self.exit.clone(),
            closed: Arc::clone(&self.closed),
            metrics: Arc::clone(&self.metrics),
        };
        child.with(opts, fields);
        child
    }

    /// Identity fields, then accumulated fields, then call-site fields
    fn assemble(&self, reportable: bool, call_site: &[Field]) -> Vec<Field> {
        let identity = self.identity.to_fields(&self.service, reportable);
        let mut fields = Vec::with_capacity(identity.len() + self.fields.len() + call_site.len());
        fields.extend(identity);
        fields.extend_from_slice(&self.fields);
        fields.extend_from_slice(call_site);
        fields
    }

    fn emit(&self, pipeline: &Pipeline, level: Level, message: &str, call_site: &[Field], reportable: bool) {
        if !pipeline.admits(level) {
            self.metrics.record_discarded();
            return;
        }

        let record = Record::new(level, self.name.as_str(), message, self.assemble(reportable, call_site));
        match pipeline.write(&record) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) => {
                let failed = self.metrics.record_write_failure();
                // Alert on first failure and periodically thereafter
                if failed == 0 || (failed + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Pipeline '{}' dropped a record ({} so far): {}",
                        pipeline.name(),
                        failed + 1,
                        e
                    );
                }
            }
        }
    }

    /// Push buffered records out before a panic or exit
    fn sync_before_exit(&self) {
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to sync before exit: {}", e);
        }
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.emit(&self.monitor, Level::Debug, message.as_ref(), fields, false);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.emit(&self.monitor, Level::Info, message.as_ref(), fields, false);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.emit(&self.monitor, Level::Warn, message.as_ref(), fields, false);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.emit(&self.monitor, Level::Error, message.as_ref(), fields, false);
    }

    /// Log at DPanic; panics afterwards in development mode only
    pub fn dpanic(&self, message: impl AsRef<str>, fields: &[Field]) {
        let message = message.as_ref();
        self.emit(&self.monitor, Level::DPanic, message, fields, false);
        if self.development {
            self.sync_before_exit();
            panic!("{}", message);
        }
    }

    /// Log at Panic, then panic with `message`
    ///
    /// The panic happens even when the record itself is filtered out.
    pub fn panic(&self, message: impl AsRef<str>, fields: &[Field]) -> ! {
        let message = message.as_ref();
        self.emit(&self.monitor, Level::Panic, message, fields, false);
        self.sync_before_exit();
        panic!("{}", message);
    }

    /// Log at Fatal, then run the exit hook
    ///
    /// The hook runs even when the record itself is filtered out. With the
    /// process hook this never returns; with a stub installed it does.
    pub fn fatal(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.emit(&self.monitor, Level::Fatal, message.as_ref(), fields, false);
        self.sync_before_exit();
        self.exit.exit();
    }

    /// Record a business event on the report pipeline
    ///
    /// Written at Info with `isReportable=true`. Discarded when the logger
    /// was built without a report destination.
    pub fn report(&self, message: impl AsRef<str>, fields: &[Field]) {
        match &self.report {
            Some(report) => self.emit(report, Level::Info, message.as_ref(), fields, true),
            None => {
                self.metrics.record_discarded();
            }
        }
    }

    /// Drain both pipelines, keeping the first error of each
    pub fn sync(&self) -> Result<()> {
        let mut errors = Vec::new();
        for pipeline in self.pipelines() {
            if let Err(e) = pipeline.sync() {
                errors.push(e);
            }
        }
        LoggerError::aggregate(errors)
    }

    /// Stop background flushing, drain, and release every destination
    ///
    /// Shared by all derived contexts: only the first call does anything,
    /// later calls from any context return `Ok(())`.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let mut errors = Vec::new();
        for pipeline in self.pipelines() {
            if let Err(e) = pipeline.close() {
                errors.push(e);
            }
        }
        LoggerError::aggregate(errors)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn pipelines(&self) -> impl Iterator<Item = &Pipeline> {
        std::iter::once(self.monitor.as_ref()).chain(self.report.as_deref())
    }
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        self.new_child(None, std::iter::empty())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("service", &self.service)
            .field("identity", &self.identity)
            .field("fields", &self.fields)
            .field("monitor", &self.monitor)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

/// Builder for Logger
///
/// Destinations come from the [`Config`] through a [`Connector`] unless an
/// explicit destination is supplied. Explicit destinations still follow
/// `remote_enabled` for buffering.
pub struct LoggerBuilder {
    config: Config,
    connector: Arc<dyn Connector>,
    monitor_destination: Option<Box<dyn Destination>>,
    report_destination: Option<Box<dyn Destination>>,
    monitor_filter: Option<LevelFilter>,
    format: Option<OutputFormat>,
    exit_hook: Option<ExitHook>,
    on_flush_error: Option<FlushErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            connector: Arc::new(DefaultConnector),
            monitor_destination: None,
            report_destination: None,
            monitor_filter: None,
            format: None,
            exit_hook: None,
            on_flush_error: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Resolve `monitor_stream` / `report_stream` through `connector`
    ///
    /// Consulted only when `remote_enabled` is set.
    #[must_use = "builder methods return a new value"]
    pub fn connector<C: Connector + 'static>(mut self, connector: C) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    /// Use `destination` for the monitor pipeline instead of the configured one
    #[must_use = "builder methods return a new value"]
    pub fn monitor_destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.monitor_destination = Some(Box::new(destination));
        self
    }

    /// Use `destination` for the report pipeline, creating it if not configured
    #[must_use = "builder methods return a new value"]
    pub fn report_destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.report_destination = Some(Box::new(destination));
        self
    }

    /// Threshold of the monitor pipeline, overriding the configured level
    ///
    /// Accepts [`LevelFilter::Off`] to silence the pipeline entirely.
    #[must_use = "builder methods return a new value"]
    pub fn monitor_filter(mut self, filter: impl Into<LevelFilter>) -> Self {
        self.monitor_filter = Some(filter.into());
        self
    }

    /// Encoding of the monitor pipeline
    ///
    /// Defaults to text in development mode on a local destination, JSON
    /// everywhere else. Report records are always JSON.
    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_hook(mut self, hook: ExitHook) -> Self {
        self.exit_hook = Some(hook);
        self
    }

    /// Set a callback for errors hit by background flushes
    ///
    /// Only buffered (remote) pipelines flush in the background. Without a
    /// callback those errors are printed to stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_flush_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.on_flush_error = Some(Arc::new(callback));
        self
    }

    /// Build the root logger
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for bad level text or out-of-range settings
    /// - `DestinationUnavailable` when remote delivery has no monitor stream,
    ///   or a configured destination cannot be attached
    ///
    /// Nothing is left running on error: sinks opened before the failure
    /// are closed again.
    pub fn build(self) -> Result<Logger> {
        let LoggerBuilder {
            config,
            connector,
            monitor_destination,
            report_destination,
            monitor_filter,
            format,
            exit_hook,
            on_flush_error,
        } = self;

        config.validate()?;
        let filter = match monitor_filter {
            Some(filter) => filter,
            None => LevelFilter::At(config.min_level()?),
        };

        let destination = match monitor_destination {
            Some(destination) => destination,
            None if config.remote_enabled => {
                let id = config.monitor_stream.as_deref().ok_or_else(|| {
                    LoggerError::unavailable(
                        MONITOR_PIPELINE,
                        "remote delivery enabled without a monitor stream",
                    )
                })?;
                connector.connect(id)?
            }
            None => Box::new(ConsoleDestination::stdout()) as Box<dyn Destination>,
        };

        let format = format.unwrap_or(if config.development && !config.remote_enabled {
            OutputFormat::Text {
                use_colors: destination.is_console() && cfg!(feature = "console"),
            }
        } else {
            OutputFormat::Json
        });

        let monitor_sink = open_sink(destination, &config, &on_flush_error)?;
        let monitor = Pipeline::new(MONITOR_PIPELINE, filter, format, monitor_sink);

        // Streams are only dialed for remote delivery; locally reports go to the console
        let report_destination = match (report_destination, config.report_stream.as_deref()) {
            (Some(destination), _) => Some(destination),
            (None, Some(id)) if config.remote_enabled => match connector.connect(id) {
                Ok(destination) => Some(destination),
                Err(e) => return Err(close_after_failure(&monitor, e)),
            },
            (None, Some(_)) => Some(Box::new(ConsoleDestination::stdout()) as Box<dyn Destination>),
            (None, None) => None,
        };

        let report = match report_destination {
            Some(destination) => match open_sink(destination, &config, &on_flush_error) {
                Ok(sink) => Some(Pipeline::new(REPORT_PIPELINE, Level::Info, OutputFormat::Json, sink)),
                Err(e) => return Err(close_after_failure(&monitor, e)),
            },
            None => None,
        };

        Ok(Logger::from_parts(
            config.logger_name,
            config.service_name,
            config.development,
            monitor,
            report,
            exit_hook.unwrap_or_default(),
        ))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn open_sink(
    destination: Box<dyn Destination>,
    config: &Config,
    on_flush_error: &Option<FlushErrorCallback>,
) -> Result<Arc<dyn Sink>> {
    if config.remote_enabled {
        let sink = BufferedSink::with_callback(
            destination,
            config.effective_buffer_size(),
            config.effective_flush_interval(),
            on_flush_error.clone(),
        )?;
        Ok(Arc::new(sink))
    } else {
        Ok(Arc::new(LockedSink::new(destination)))
    }
}

fn close_after_failure(opened: &Pipeline, err: LoggerError) -> LoggerError {
    if let Err(close_err) = opened.close() {
        eprintln!(
            "[LOGGER WARNING] Failed to close '{}' after construction error: {}",
            opened.name(),
            close_err
        );
    }
    err
}
