//! Error types for the kidney-classify library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ValidationError`] is **advisory**: the selected file was refused before
//!   anything touched the network (wrong type, too large). It is shown next to
//!   the idle view and never becomes the error view state.
//!
//! * [`ClientError`] is **episode-ending**: the file could not be read, the
//!   service could not be reached, or it answered with a failure. An upload
//!   that hits one of these ends in [`crate::view::ViewState::Error`]; the
//!   auxiliary calls (`model_info`, `start_training`) return it directly.
//!
//! Neither is fatal to a session. The user recovers by selecting a file again.

use std::path::PathBuf;
use thiserror::Error;

/// Why a candidate was refused by [`crate::pipeline::validate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// MIME type is not one of JPEG, JPG or PNG.
    #[error("unsupported type '{mime_type}': please upload a valid image file (JPEG, JPG, or PNG)")]
    UnsupportedType { mime_type: String },

    /// File exceeds the upload ceiling.
    #[error("too large: {size_bytes} bytes exceeds the {max_bytes} byte limit (file size must be less than 10MB)")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

/// All errors raised while talking to the classification service or reading
/// the image to send.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The candidate's bytes could not be read.
    #[error("Could not read image '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// No response was received at all.
    #[error("Failed to {action}. Please try again. ({reason})")]
    Network { action: &'static str, reason: String },

    /// The request exceeded the configured timeout.
    #[error("Failed to {action}: no response after {secs}s")]
    Timeout { action: &'static str, secs: u64 },

    // ── Server errors ─────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the server-supplied detail when the body
    /// carried one, otherwise `"HTTP error, status <code>"`.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body does not have the expected shape.
    #[error("Unexpected response from {endpoint}: {detail}")]
    InvalidResponse { endpoint: &'static str, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to initialise HTTP client: {0}")]
    Http(String),
}

impl ClientError {
    /// HTTP status of a server error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
