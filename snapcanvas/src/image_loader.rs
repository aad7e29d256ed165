//! Image resources for image, video poster, background and nested canvas
//! nodes.
//!
//! Images are decoded fresh for every use; nothing is cached between nodes.

use crate::error::{SnapError, SnapResult};
use base64::Engine;
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};

/// A decoded image with premultiplied RGBA8 pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl LoadedImage {
    /// Wrap straight-alpha RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, mut rgba: Vec<u8>) -> SnapResult<Self> {
        if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
            return Err(snapcanvas_raster::RasterError::InvalidImage {
                width,
                height,
                len: rgba.len(),
            }
            .into());
        }
        snapcanvas_raster::premultiply_rgba(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8]) -> SnapResult<Self> {
        let img = image::load_from_memory(bytes)?;
        let width = img.width();
        let height = img.height();
        Self::from_rgba(width, height, img.to_rgba8().into_raw())
    }
}

/// Resolves an image locator to a decoded image.
pub trait ImageLoader: Send + Sync {
    fn load<'a>(&'a self, src: &'a str) -> BoxFuture<'a, SnapResult<LoadedImage>>;
}

/// Loads `data:` URIs, `file://` URLs and filesystem paths.
#[derive(Debug, Clone, Default)]
pub struct FileImageLoader {
    /// Directory relative paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

impl FileImageLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    async fn load_src(&self, src: &str) -> SnapResult<LoadedImage> {
        let src = src.trim();
        if let Some(data) = src.strip_prefix("data:") {
            return LoadedImage::decode(&decode_data_uri(data).map_err(|reason| {
                SnapError::ImageLoad {
                    src: truncate(src),
                    reason,
                }
            })?);
        }
        let path = if let Some(rest) = src.strip_prefix("file://") {
            PathBuf::from(rest)
        } else if src.contains("://") {
            return Err(SnapError::UnsupportedSource(src.to_string()));
        } else {
            self.resolve_path(src)
        };
        log::debug!("loading image {}", path.display());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SnapError::ImageLoad {
                src: src.to_string(),
                reason: e.to_string(),
            })?;
        LoadedImage::decode(&bytes)
    }
}

impl ImageLoader for FileImageLoader {
    fn load<'a>(&'a self, src: &'a str) -> BoxFuture<'a, SnapResult<LoadedImage>> {
        Box::pin(self.load_src(src))
    }
}

/// Payload of a `data:` URI, after the scheme.
fn decode_data_uri(data: &str) -> Result<Vec<u8>, String> {
    let (meta, payload) = data
        .split_once(',')
        .ok_or_else(|| "data URI without payload".to_string())?;
    if meta.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| e.to_string())
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

fn truncate(src: &str) -> String {
    src.chars().take(48).collect()
}
