//! Destination implementations and identifier resolution
//!
//! A destination identifier from the configuration selects one of:
//!
//! | Identifier           | Destination            |
//! |----------------------|------------------------|
//! | `tcp://host:port`    | [`NetworkDestination`] |
//! | `host:port`          | [`NetworkDestination`] |
//! | `file:///path`       | [`FileDestination`]    |
//! | `stdout` / `stderr`  | [`ConsoleDestination`] |
//! | `null`               | [`NullDestination`]    |

pub mod console;
pub mod file;
pub mod memory;
pub mod network;

pub use console::{ConsoleDestination, ConsoleTarget};
pub use file::FileDestination;
pub use memory::{MemoryDestination, MemoryHandle, NullDestination};
pub use network::{NetworkDestination, NETWORK_TIMEOUT};

use crate::core::{Destination, LoggerError, Result};

/// Turns a configured destination identifier into an attached destination
pub trait Connector: Send + Sync {
    fn connect(&self, id: &str) -> Result<Box<dyn Destination>>;
}

/// Resolves the identifiers listed in the module docs
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConnector;

impl Connector for DefaultConnector {
    fn connect(&self, id: &str) -> Result<Box<dyn Destination>> {
        let id = id.trim();
        match id {
            "" => Err(LoggerError::unavailable(id, "empty destination identifier")),
            "stdout" => Ok(Box::new(ConsoleDestination::stdout())),
            "stderr" => Ok(Box::new(ConsoleDestination::stderr())),
            "null" => Ok(Box::new(NullDestination)),
            _ => {
                if let Some(path) = id.strip_prefix("file://") {
                    Ok(Box::new(FileDestination::open(path)?))
                } else if let Some(address) = id.strip_prefix("tcp://") {
                    Ok(Box::new(NetworkDestination::connect(address)?))
                } else if id.contains("://") {
                    Err(LoggerError::unavailable(id, "unsupported scheme"))
                } else if id.contains(':') {
                    Ok(Box::new(NetworkDestination::connect(id)?))
                } else {
                    Err(LoggerError::unavailable(id, "unrecognized destination identifier"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_named_destinations() {
        let connector = DefaultConnector;
        assert_eq!(connector.connect("stdout").unwrap().name(), "stdout");
        assert_eq!(connector.connect("stderr").unwrap().name(), "stderr");
        assert_eq!(connector.connect(" null ").unwrap().name(), "null");
    }

    #[test]
    fn test_file_scheme() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stream.jsonl");
        let id = format!("file://{}", path.display());

        let destination = DefaultConnector.connect(&id).unwrap();
        assert_eq!(destination.name(), id);
        assert!(path.exists());
    }

    #[test]
    fn test_unknown_identifiers_rejected() {
        for id in ["", "kafka://broker:9092", "somewhere"] {
            let err = DefaultConnector.connect(id).err().unwrap();
            assert!(
                matches!(err, LoggerError::DestinationUnavailable { .. }),
                "{id} gave {err}"
            );
        }
    }
}
