use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

/// Crate-wide error type.
///
/// Variants carry rendered strings rather than source errors so the type
/// stays `Clone`, `PartialEq` and `Serialize` across the CLI and WASM
/// surfaces. Navigation itself never returns errors (missing lookups are
/// skipped, see [crate::index::RuleIndex]); `Result` only appears on the
/// codec, config, and I/O paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RuleboundError {
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("File system error: {0}")]
    Io(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("(De)serialization error: {0}")]
    Serialization(String),
}

impl From<io::Error> for RuleboundError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => RuleboundError::NotFound(format!("{x}")),
            _ => RuleboundError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<toml::de::Error> for RuleboundError {
    fn from(src: toml::de::Error) -> RuleboundError {
        RuleboundError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for RuleboundError {
    fn from(src: toml::ser::Error) -> RuleboundError {
        RuleboundError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for RuleboundError {
    fn from(src: JsonError) -> RuleboundError {
        RuleboundError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<fmt::Error> for RuleboundError {
    fn from(x: fmt::Error) -> Self {
        RuleboundError::Codec(format!("{x}"))
    }
}

impl From<walkdir::Error> for RuleboundError {
    fn from(x: walkdir::Error) -> Self {
        match x.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::NotFound) => RuleboundError::NotFound(format!("{x}")),
            _ => RuleboundError::Io(format!("Directory walk failed: {x}")),
        }
    }
}
