//! Borrowed image pixels for blitting.

use crate::error::{RasterError, RasterResult};

/// Borrowed RGBA8 pixels with premultiplied alpha.
#[derive(Debug, Clone, Copy)]
pub struct CanvasImageRef<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> CanvasImageRef<'a> {
    /// Wrap premultiplied pixels, checking the buffer length.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) * 4 {
            return Err(RasterError::InvalidImage {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

/// Convert straight-alpha RGBA8 to premultiplied alpha in place.
pub fn premultiply_rgba(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u32 * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiply() {
        let mut data = vec![255, 128, 0, 128, 10, 20, 30, 255, 200, 200, 200, 0];
        premultiply_rgba(&mut data);
        assert_eq!(data, vec![128, 64, 0, 128, 10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_length_checked() {
        assert!(CanvasImageRef::new(&[0; 16], 2, 2).is_ok());
        assert!(CanvasImageRef::new(&[0; 15], 2, 2).is_err());
    }
}
