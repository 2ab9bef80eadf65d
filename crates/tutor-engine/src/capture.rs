//! Problem-image capture.
//!
//! The capture collaborator stands in for a camera: a frame source takes a
//! capture request and returns a base64-encoded frame. The file-backed
//! source reads an existing photo from disk.

use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Parameters for a capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRequest {
    /// Requested quality factor in `0.0..=1.0`.
    pub quality: f32,
    /// Whether the frame should be returned base64-encoded.
    pub base64: bool,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            quality: 0.8,
            base64: true,
        }
    }
}

/// A captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Base64-encoded image bytes (no URI prefix).
    pub base64: String,
    /// Mime type of the encoded image.
    pub mime_type: String,
}

impl CapturedFrame {
    /// The frame as a `data:` URI suitable for an image part.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Hex digest of a frame's encoded content, used to identify sessions.
pub fn frame_digest(frame: &CapturedFrame) -> String {
    let mut hasher = Sha256::new();
    hasher.update(frame.base64.as_bytes());
    let digest = hasher.finalize();
    digest.iter().fold(String::new(), |mut acc, b| {
        use std::fmt::Write as _;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

/// Something that can produce a frame on request.
pub trait FrameSource {
    /// Capture one frame.
    fn capture(&self, request: &CaptureRequest) -> Result<CapturedFrame, CaptureError>;
}

/// Frame source backed by an image file on disk.
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    /// Create a source for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FileFrameSource {
    fn capture(&self, request: &CaptureRequest) -> Result<CapturedFrame, CaptureError> {
        if !request.base64 {
            return Err(CaptureError::Unsupported(
                "file frames are only available base64-encoded".into(),
            ));
        }

        let mime_type = mime_for_path(&self.path)?;
        let bytes = std::fs::read(&self.path).map_err(CaptureError::Io)?;
        if bytes.is_empty() {
            return Err(CaptureError::EmptyFrame(self.path.clone()));
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "captured frame");
        Ok(CapturedFrame {
            base64: base64::engine::general_purpose::STANDARD.encode(&bytes),
            mime_type,
        })
    }
}

/// Mime type for a supported image extension.
fn mime_for_path(path: &Path) -> Result<String, CaptureError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => Ok("image/jpeg".into()),
        Some("png") => Ok("image/png".into()),
        _ => Err(CaptureError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Errors from frame capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// I/O error reading the frame.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file held no data.
    #[error("frame is empty: {0}")]
    EmptyFrame(PathBuf),

    /// Not a supported image format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The request asked for something this source cannot do.
    #[error("unsupported capture request: {0}")]
    Unsupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp_image(ext: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(format!("problem.{ext}"));
        std::fs::write(&path, bytes).unwrap();
        (dir, path)
    }

    #[test]
    fn test_file_capture_encodes_base64() {
        let (_dir, path) = write_temp_image("jpg", b"jpegdata");
        let source = FileFrameSource::new(&path);

        let frame = source.capture(&CaptureRequest::default()).unwrap();
        assert_eq!(frame.mime_type, "image/jpeg");
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&frame.base64)
                .unwrap(),
            b"jpegdata"
        );
        assert!(frame.data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_png_mime_type() {
        let (_dir, path) = write_temp_image("PNG", b"pngdata");
        let frame = FileFrameSource::new(&path)
            .capture(&CaptureRequest::default())
            .unwrap();
        assert_eq!(frame.mime_type, "image/png");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = FileFrameSource::new("/nonexistent/problem.jpg");
        let err = source.capture(&CaptureRequest::default()).unwrap_err();
        assert!(matches!(err, CaptureError::Io(_)));
    }

    #[test]
    fn test_empty_file_rejected() {
        let (_dir, path) = write_temp_image("jpg", b"");
        let err = FileFrameSource::new(&path)
            .capture(&CaptureRequest::default())
            .unwrap_err();
        assert!(matches!(err, CaptureError::EmptyFrame(_)));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let (_dir, path) = write_temp_image("gif", b"gifdata");
        let err = FileFrameSource::new(&path)
            .capture(&CaptureRequest::default())
            .unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_raw_frames_not_supported() {
        let (_dir, path) = write_temp_image("jpg", b"jpegdata");
        let request = CaptureRequest {
            quality: 0.8,
            base64: false,
        };
        let err = FileFrameSource::new(&path).capture(&request).unwrap_err();
        assert!(matches!(err, CaptureError::Unsupported(_)));
    }

    #[test]
    fn test_frame_digest_is_stable() {
        let frame = CapturedFrame {
            base64: "QUJD".into(),
            mime_type: "image/jpeg".into(),
        };
        let a = frame_digest(&frame);
        let b = frame_digest(&frame);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }
}
