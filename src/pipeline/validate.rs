//! Candidate validation: the gate in front of every network call.

use super::input::UploadCandidate;
use crate::error::ValidationError;

/// MIME types the classifier accepts. `image/jpg` is not a registered type
/// but some platforms label JPEG files with it.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Upload ceiling: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Check a candidate's declared type and size. Type is checked first.
pub fn validate(candidate: &UploadCandidate) -> Result<(), ValidationError> {
    if !ACCEPTED_MIME_TYPES.contains(&candidate.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedType {
            mime_type: candidate.mime_type.clone(),
        });
    }

    if candidate.size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size_bytes: candidate.size_bytes,
            max_bytes: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}
