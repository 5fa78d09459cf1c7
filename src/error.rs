//! Error types for hints construction, document assembly and descriptor loading.

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Hints violating the accept-put / accept-post invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HintsError {
    #[error("POST is not allowed but accept-post is provided")]
    AcceptPostWithoutPost,

    #[error("PUT is not allowed but accept-put is provided")]
    AcceptPutWithoutPut,
}

/// Errors while assembling resource links into a document.
///
/// Always a configuration error in the descriptors, attributed to the
/// offending relation type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("invalid hints for {relation_type}: {source}")]
    InvalidHints {
        relation_type: Url,
        #[source]
        source: HintsError,
    },

    #[error("conflicting resource links for {relation_type}: {existing} vs {conflicting}")]
    ConflictingResourceLink {
        relation_type: Url,
        existing: String,
        conflicting: String,
    },
}

impl AssembleError {
    /// The relation type the error is attributed to.
    pub fn relation_type(&self) -> &Url {
        match self {
            Self::InvalidHints { relation_type, .. }
            | Self::ConflictingResourceLink { relation_type, .. } => relation_type,
        }
    }
}

/// Errors while loading descriptor files.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Descriptor errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("descriptors do not match the descriptor schema ({} error(s))", errors.len())]
    Invalid { errors: Vec<SchemaError> },

    #[error("invalid URI \"{value}\": {source}")]
    InvalidUri {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid pattern for href-var \"{var}\": {source}")]
    InvalidPattern {
        var: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid descriptor for {rel}: {message}")]
    InvalidDescriptor { rel: String, message: String },

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Single schema violation with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl AssembleError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::Assemble(e) => e.exit_code(),
            _ => 2,
        }
    }
}
