//! Error types for the rendering pipeline.

use snapcanvas_raster::RasterError;
use thiserror::Error;

pub type SnapResult<T> = Result<T, SnapError>;

#[derive(Debug, Error)]
pub enum SnapError {
    /// A `transform` matrix with a zero determinant. The pre-transform box
    /// cannot be recovered, so the render stops here.
    #[error("transform is not invertible: {0}")]
    NonInvertibleTransform(String),

    #[error("failed to load image {src}: {reason}")]
    ImageLoad { src: String, reason: String },

    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl SnapError {
    /// Failures confined to one node's resources. The traversal logs these
    /// and moves on to the next node.
    pub fn is_resource_failure(&self) -> bool {
        matches!(
            self,
            SnapError::ImageLoad { .. }
                | SnapError::ImageDecode(_)
                | SnapError::UnsupportedSource(_)
                | SnapError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_failure_classification() {
        let load = SnapError::ImageLoad {
            src: "a.png".to_string(),
            reason: "missing".to_string(),
        };
        assert!(load.is_resource_failure());
        assert!(SnapError::UnsupportedSource("http://x".into()).is_resource_failure());
        assert!(!SnapError::NonInvertibleTransform("matrix(0, 0, 0, 0, 0, 0)".into())
            .is_resource_failure());
        assert!(!SnapError::InvalidSnapshot("empty".into()).is_resource_failure());
    }
}
