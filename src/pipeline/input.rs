//! Input resolution: turn a user-selected file into an [`UploadCandidate`].
//!
//! A candidate carries the same attributes a browser `File` does (a name, a
//! declared MIME type and a size) plus a handle on its bytes. The validator
//! only ever looks at the declared attributes; bytes are not touched until
//! the encoder runs, so a rejected candidate never costs a read.

use crate::error::ClientError;
use image::ImageFormat;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// MIME type assigned to files whose extension is not a known image format.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Where a candidate's bytes live.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// Bytes are read from disk at encode time.
    Path(PathBuf),
    /// Bytes are already in memory (drag-and-drop buffers, tests).
    Memory(Vec<u8>),
}

/// A user-supplied file awaiting validation.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// Display name, usually the file name.
    pub name: String,
    /// Declared MIME type, checked against the allow-list.
    pub mime_type: String,
    /// Declared size in bytes, checked against the ceiling.
    pub size_bytes: u64,
    source: CandidateSource,
}

impl UploadCandidate {
    /// Candidate backed by an in-memory buffer. The size is the buffer length.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            source: CandidateSource::Memory(bytes),
        }
    }

    /// Candidate backed by a file whose attributes are already known.
    ///
    /// Nothing is checked on disk; a missing file surfaces as
    /// [`ClientError::Read`] when the candidate is encoded.
    pub fn from_file_parts(
        path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            mime_type: mime_type.into(),
            size_bytes,
            source: CandidateSource::Path(path),
        }
    }

    /// Resolve a local file: size from metadata, MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|source| ClientError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        if !meta.is_file() {
            return Err(ClientError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        let mime_type = mime_from_path(path);
        debug!(
            "Resolved candidate {} ({}, {} bytes)",
            path.display(),
            mime_type,
            meta.len()
        );
        Ok(Self::from_file_parts(path, mime_type, meta.len()))
    }

    /// Backing file path, if the candidate is disk-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            CandidateSource::Path(p) => Some(p),
            CandidateSource::Memory(_) => None,
        }
    }

    /// Read the candidate's bytes. Suspends on disk I/O for path-backed
    /// candidates.
    pub(crate) async fn read_bytes(&self) -> Result<Cow<'_, [u8]>, ClientError> {
        match &self.source {
            CandidateSource::Memory(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            CandidateSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .map_err(|source| ClientError::Read {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// Map a file extension to a MIME type (`.jpg` → `image/jpeg`).
///
/// Only JPEG and PNG are named; every other extension, image or not, is
/// [`UNKNOWN_MIME`].
pub fn mime_from_path(path: &Path) -> &'static str {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => format.to_mime_type(),
        _ => UNKNOWN_MIME,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("scan.jpg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("scan.JPEG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("/tmp/scan.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("scan.gif")), UNKNOWN_MIME);
        assert_eq!(mime_from_path(Path::new("scan.webp")), UNKNOWN_MIME);
        assert_eq!(mime_from_path(Path::new("scan.dcm")), UNKNOWN_MIME);
        assert_eq!(mime_from_path(Path::new("scan")), UNKNOWN_MIME);
    }

    #[test]
    fn from_bytes_uses_buffer_length() {
        let c = UploadCandidate::from_bytes("a.png", "image/png", vec![0u8; 42]);
        assert_eq!(c.size_bytes, 42);
        assert!(c.path().is_none());
    }

    #[tokio::test]
    async fn from_path_reads_metadata() {
        let mut f = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        f.write_all(&[1, 2, 3, 4, 5]).unwrap();

        let c = UploadCandidate::from_path(f.path()).await.unwrap();
        assert_eq!(c.mime_type, "image/png");
        assert_eq!(c.size_bytes, 5);
        assert_eq!(c.path(), Some(f.path()));
        assert!(c.name.ends_with(".png"));
    }

    #[tokio::test]
    async fn from_path_missing_file_is_read_error() {
        let err = UploadCandidate::from_path("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Read { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadCandidate::from_path(dir.path()).await.unwrap_err();
        assert!(matches!(err, ClientError::Read { .. }));
    }
}
