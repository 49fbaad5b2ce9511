//! Image encoding: candidate bytes → base64 data URL.
//!
//! The classifier expects the raw base64 payload in a JSON string. The
//! encoder produces the full `data:<mime>;base64,<payload>` form so the
//! MIME type travels with the bytes for display and logging; the client
//! strips the header with [`EncodedPayload::payload`] right before sending.

use super::input::UploadCandidate;
use crate::error::ClientError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// A data URL produced from one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    data_url: String,
}

impl EncodedPayload {
    /// The full `data:<mime>;base64,<payload>` string.
    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }

    /// Everything before the first comma, e.g. `data:image/png;base64`.
    pub fn header(&self) -> &str {
        self.data_url
            .split_once(',')
            .map(|(h, _)| h)
            .unwrap_or("")
    }

    /// The base64 payload with the data-URL header stripped.
    pub fn payload(&self) -> &str {
        self.data_url
            .split_once(',')
            .map(|(_, p)| p)
            .unwrap_or(&self.data_url)
    }

    /// MIME type named in the header.
    pub fn mime_type(&self) -> Option<&str> {
        self.header()
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty())
    }
}

/// Read a candidate and wrap its bytes in a base64 data URL.
///
/// Read failures propagate as [`ClientError::Read`].
pub async fn encode(candidate: &UploadCandidate) -> Result<EncodedPayload, ClientError> {
    let bytes = candidate.read_bytes().await?;
    let b64 = STANDARD.encode(bytes.as_ref());
    debug!(
        "Encoded {} → {} bytes base64",
        candidate.name,
        b64.len()
    );

    Ok(EncodedPayload {
        data_url: format!("data:{};base64,{}", candidate.mime_type, b64),
    })
}
