use std::path::PathBuf;

use thiserror::Error;

use crate::schema::Format;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input is not valid JSON: {source}")]
    MalformedInput {
        #[source]
        source: serde_json::Error,
    },

    #[error("input matches neither the introspection nor the GitHub schema encoding")]
    UnrecognizedFormat,

    #[error("failed to decode {format} schema {detail}")]
    Decode { format: Format, detail: String },

    #[error("type '{target}' not found in schema")]
    TargetTypeNotFound { target: String, suggestions: Vec<String> },

    #[error("schema pre-processing failed: {0}")]
    Preprocess(String),

    #[error("failed to encode {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
