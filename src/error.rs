//! Error type shared by the loader, the table model and the bar model.

use std::path::PathBuf;

/// Errors surfaced to the caller (CLI, wasm bindings or any other renderer).
#[derive(Debug, thiserror::Error)]
pub enum DtvisError {
    /// The export does not match the expected shape.
    #[error("schema violation: {reason}")]
    SchemaViolation {
        /// What was missing or malformed.
        reason: String,
    },

    /// A leaf identifier has no trailing numeric suffix.
    #[error("malformed leaf identifier `{id}`: expected a trailing number such as `leaf12`")]
    MalformedIdentifier {
        /// The identifier that failed to parse.
        id: String,
    },

    /// A caller-supplied sort mode, criterion or class index is not usable.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the rejected value.
        reason: String,
    },

    /// Reading an export or config file failed.
    #[error("failed to read {path}")]
    ReadFile {
        /// Path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The export is not valid JSON.
    #[error("failed to parse export JSON")]
    ParseJson {
        /// The underlying serde_json error.
        #[from]
        source: serde_json::Error,
    },

    /// A config file is not valid TOML for [`crate::Config`].
    #[error("failed to parse config at {path}")]
    ParseConfig {
        /// Path of the offending config file.
        path: PathBuf,
        /// The underlying toml error.
        source: toml::de::Error,
    },
}

impl DtvisError {
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        DtvisError::SchemaViolation {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        DtvisError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DtvisError>;
