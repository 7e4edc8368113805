//! Record structure handed to encoders

use super::field::Field;
use super::level::Level;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One assembled log event: identity, accumulated, then call-site fields
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub logger: String,
    pub message: String,
    pub fields: Vec<Field>,
}

impl Record {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: Level, logger: impl Into<String>, message: &str, fields: Vec<Field>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: Self::sanitize_message(message),
            fields,
        }
    }

    /// Look up the first field with `key`
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key() == key)
    }
}

// Hand-written so field order survives into the encoded object.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let named = usize::from(!self.logger.is_empty());
        let mut map = serializer.serialize_map(Some(3 + named + self.fields.len()))?;
        map.serialize_entry("ts", &self.timestamp.to_rfc3339())?;
        map.serialize_entry("level", self.level.as_str())?;
        if !self.logger.is_empty() {
            map.serialize_entry("logger", &self.logger)?;
        }
        map.serialize_entry("msg", &self.message)?;
        for field in &self.fields {
            map.serialize_entry(field.key(), field.value())?;
        }
        map.end()
    }
}
