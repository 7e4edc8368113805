//! Log level definitions

use super::error::{LoggerError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Severity of a record, in strictly increasing order.
///
/// The zero value is [`Level::Info`], so a defaulted level is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(i8)]
pub enum Level {
    Debug = -1,
    #[default]
    Info = 0,
    Warn = 1,
    Error = 2,
    /// Panics after writing, but only in development mode
    DPanic = 3,
    /// Panics after writing
    Panic = 4,
    /// Terminates the process after writing
    Fatal = 5,
}

impl Level {
    /// Every level, lowest first
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    pub fn capital_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    /// Lower-case canonical text as bytes
    pub fn marshal_text(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }

    /// Parse `text` into `self`. On failure `self` is left untouched.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(text)
            .map_err(|_| LoggerError::UnrecognizedLevel(String::from_utf8_lossy(text).into_owned()))?;
        *self = text.parse()?;
        Ok(())
    }

    /// Parse into a slot that may be absent.
    ///
    /// Returns [`LoggerError::NilLevel`] when there is nowhere to write.
    pub fn parse_into(slot: Option<&mut Level>, text: &[u8]) -> Result<()> {
        match slot {
            Some(level) => level.unmarshal_text(text),
            None => Err(LoggerError::NilLevel),
        }
    }

    /// Whether a record at `self` passes a `min` threshold
    #[inline]
    pub fn enabled_at(self, min: Level) -> bool {
        self >= min
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => Blue,
            Level::Info => Green,
            Level::Warn => Yellow,
            Level::Error => Red,
            Level::DPanic | Level::Panic | Level::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            // empty text maps to the zero value
            "info" | "" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            _ => Err(LoggerError::UnrecognizedLevel(s.to_string())),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Threshold of a pipeline: a minimum level, or nothing at all.
///
/// `Off` sits above [`Level::Fatal`]; a pipeline set to it discards every
/// record, while `panic`/`fatal` still run their control-flow effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    At(Level),
    Off,
}

impl LevelFilter {
    #[inline]
    pub fn admits(&self, level: Level) -> bool {
        match self {
            LevelFilter::At(min) => level.enabled_at(*min),
            LevelFilter::Off => false,
        }
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        LevelFilter::At(Level::Info)
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        LevelFilter::At(level)
    }
}
