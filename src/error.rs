use std::io;

use regex::Error as RegexError;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use tokio::{sync::mpsc::error::SendError as TokioSendError, task::JoinError};

use crate::rdf::ParseEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum SdsError {
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("RDF parse error: {0}")]
    Parse(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Dataset structure error: {0}")]
    Structure(String),
    #[error("Timed out after {0} seconds waiting for the RDF parser to finish")]
    Timeout(u64),
}

impl From<JsonError> for SdsError {
    fn from(src: JsonError) -> SdsError {
        SdsError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<toml::de::Error> for SdsError {
    fn from(src: toml::de::Error) -> SdsError {
        SdsError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for SdsError {
    fn from(src: toml::ser::Error) -> SdsError {
        SdsError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<RegexError> for SdsError {
    fn from(x: RegexError) -> Self {
        SdsError::Config(format!("Regex parse failed: {x}"))
    }
}

impl From<oxttl::TurtleParseError> for SdsError {
    fn from(x: oxttl::TurtleParseError) -> Self {
        SdsError::Parse(format!("{x}"))
    }
}

impl From<io::Error> for SdsError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => SdsError::NotFound(format!("{x}")),
            _ => SdsError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<JoinError> for SdsError {
    fn from(x: JoinError) -> Self {
        SdsError::Parse(format!("parser task did not complete: {x}"))
    }
}

impl From<TokioSendError<ParseEvent>> for SdsError {
    fn from(x: TokioSendError<ParseEvent>) -> Self {
        SdsError::Io(format!(
            "Channel send Error, could not transmit parse event {:?}",
            x.0
        ))
    }
}
