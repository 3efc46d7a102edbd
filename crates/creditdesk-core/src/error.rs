// ── Core error types ──
//
// User-facing errors from creditdesk-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<creditdesk_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Customer not found: {id}")]
    CustomerNotFound { id: String },

    #[error("Directory error: {message}")]
    Directory {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<creditdesk_api::Error> for CoreError {
    fn from(err: creditdesk_api::Error) -> Self {
        match err {
            creditdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            other => {
                let status = other.status();
                CoreError::Directory {
                    message: other.to_string(),
                    status,
                }
            }
        }
    }
}
