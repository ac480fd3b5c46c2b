//! Error types for the resource finder.

use thiserror::Error;

/// Result type for resource finder operations.
pub type Result<T> = std::result::Result<T, FinderError>;

/// Resource finder errors.
///
/// Filtering, searching and pagination never fail; only loading the dataset
/// and reading configuration can.
#[derive(Debug, Error)]
pub enum FinderError {
    /// Fetch error (connection failed, timeout, non-2xx response)
    #[error("Fetch error{}: {message}", status_suffix(.status))]
    Fetch {
        status: Option<u16>,
        message: String,
    },

    /// Parse error (payload is not CSV/JSON in the expected shape)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error (invalid setting)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FinderError {
    /// HTTP status of a failed fetch, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FinderError::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl From<reqwest::Error> for FinderError {
    fn from(err: reqwest::Error) -> Self {
        FinderError::Fetch {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
