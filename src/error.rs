// error.rs - Error taxonomy for decoding and alignment

use thiserror::Error;

/// Result type for alignment operations
pub type Result<T> = std::result::Result<T, AlignError>;

/// Errors that abort an alignment attempt
#[derive(Debug, Error)]
pub enum AlignError {
    /// File missing or unreadable
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed byte length, non-numeric field or ragged record
    #[error("Format error in '{path}': {message}")]
    Format { path: String, message: String },

    /// The correlation profile came out empty
    #[error("No valid dot products calculated: search window [{lowpad}, {highpad}) is empty")]
    EmptySearch { lowpad: usize, highpad: usize },

    /// Offset window parameters produce an invalid or empty slice
    #[error("Degenerate search window: {message}")]
    DegenerateWindow { message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl AlignError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AlignError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<String>, message: impl Into<String>) -> Self {
        AlignError::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        AlignError::Config {
            message: message.into(),
        }
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        AlignError::DegenerateWindow {
            message: message.into(),
        }
    }
}
