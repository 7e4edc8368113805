//! One path from a logger call to one sink

use super::destination::Sink;
use super::encoder::OutputFormat;
use super::error::Result;
use super::level::{Level, LevelFilter};
use super::record::Record;
use std::sync::Arc;

/// Level gate + encoder + sink
pub struct Pipeline {
    name: String,
    filter: LevelFilter,
    format: OutputFormat,
    sink: Arc<dyn Sink>,
}

impl Pipeline {
    pub fn new(
        name: impl Into<String>,
        filter: impl Into<LevelFilter>,
        format: OutputFormat,
        sink: Arc<dyn Sink>,
    ) -> Self {
        Self {
            name: name.into(),
            filter: filter.into(),
            format,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter(&self) -> LevelFilter {
        self.filter
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Name of the destination behind the sink
    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    #[inline]
    pub fn admits(&self, level: Level) -> bool {
        self.filter.admits(level)
    }

    /// Encode and hand the record to the sink. Callers check `admits` first.
    pub fn write(&self, record: &Record) -> Result<()> {
        let line = self.format.encode(record)?;
        self.sink.write(&line)
    }

    pub fn sync(&self) -> Result<()> {
        self.sink.sync()
    }

    pub fn close(&self) -> Result<()> {
        self.sink.close()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .field("format", &self.format)
            .field("sink", &self.sink_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::destination::LockedSink;
    use crate::destinations::MemoryDestination;

    #[test]
    fn test_pipeline_encodes_into_sink() {
        let memory = MemoryDestination::new();
        let handle = memory.handle();
        let pipeline = Pipeline::new(
            "monitor",
            Level::Warn,
            OutputFormat::Json,
            Arc::new(LockedSink::new(Box::new(memory))),
        );

        assert!(!pipeline.admits(Level::Info));
        assert!(pipeline.admits(Level::Error));

        let record = Record::new(Level::Error, "svc", "boom", Vec::new());
        pipeline.write(&record).unwrap();

        let lines = handle.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], "boom");
    }

    #[test]
    fn test_off_filter_admits_nothing() {
        let pipeline = Pipeline::new(
            "monitor",
            LevelFilter::Off,
            OutputFormat::Json,
            Arc::new(LockedSink::new(Box::new(MemoryDestination::new()))),
        );
        assert!(Level::ALL.iter().all(|level| !pipeline.admits(*level)));
    }
}
