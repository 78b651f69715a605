/*!
 * Error types for the subrelay application.
 *
 * This module contains the error type surfaced by the transfer orchestrator,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can terminate a translation transfer.
///
/// Every network or backend failure is caught at the orchestrator boundary,
/// classified into one of these variants, and surfaced exactly once. A
/// fallback during cue counting is not an error - it is logged and counting
/// continues with a heuristic.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The translation service could not be reached at all
    #[error("Cannot reach translation service at {endpoint}: {reason}")]
    Connection {
        /// Endpoint URL the request was sent to
        endpoint: String,
        /// Underlying transport error text
        reason: String,
    },

    /// The backend rejected the supplied credentials
    #[error("Authentication rejected by translation service: {0}")]
    Auth(String),

    /// The translate endpoint path does not exist on the service
    #[error("Translation endpoint not found at {0}")]
    NotFound(String),

    /// The backend returned a failure status or an explicit error payload
    #[error("{0}")]
    Server(String),

    /// The session was superseded by a new file or an explicit reset
    #[error("Translation cancelled")]
    Cancelled,

    /// Anything that could not be classified
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl TransferError {
    /// User-displayable message for this error.
    ///
    /// Connection failures expand into the likely causes so a user can act on
    /// them without reading logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection { endpoint, .. } => format!(
                "Cannot reach the translation service at {}. Please verify:\n\
                 1. The service is running\n\
                 2. The endpoint URL is correct\n\
                 3. Cross-origin requests are permitted by the backend",
                endpoint
            ),
            Self::NotFound(endpoint) => format!(
                "Translate endpoint not found. Please check that the translation \
                 service is running at: {}",
                endpoint
            ),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for TransferError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}

impl From<std::io::Error> for TransferError {
    fn from(error: std::io::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}
