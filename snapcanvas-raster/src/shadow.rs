//! Drop shadows: shadow state plus a separable Gaussian blur over
//! premultiplied RGBA8 buffers.

use tiny_skia::Color;

/// Shadow applied to fills while it is set on the drawing state.
///
/// Offsets and blur are in device pixels and are not affected by the
/// current transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Shadow {
    /// Whether painting with this shadow produces any output.
    pub fn is_visible(&self) -> bool {
        self.color.alpha() > 0.0
            && (self.blur > 0.0 || self.offset_x != 0.0 || self.offset_y != 0.0)
    }

    /// Gaussian standard deviation for the blur amount.
    pub(crate) fn sigma(&self) -> f32 {
        (self.blur / 2.0).max(0.0)
    }

    /// Number of pixels the blur can spread beyond the shape.
    pub(crate) fn margin(&self) -> u32 {
        (self.sigma() * 3.0).ceil() as u32
    }
}

/// Blur a premultiplied RGBA8 buffer in place.
///
/// A zero sigma leaves the buffer untouched. Samples outside the buffer
/// repeat the nearest edge pixel.
pub(crate) fn blur_rgba8_premul(data: &mut [u8], width: u32, height: u32, sigma: f32) {
    if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) * 4 {
        return;
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return;
    }
    let radius = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; data.len()];
    horizontal_pass(data, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, data, width, height, &kernel);
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * (sigma as f64) * (sigma as f64);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Push rounding error into the centre tap so the kernel sums to one
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sigma_is_identity() {
        let mut data = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        blur_rgba8_premul(&mut data, 1, 2, 0.0);
        assert_eq!(data, vec![1u8, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_constant_image_is_unchanged() {
        let (w, h) = (6u32, 4u32);
        let px = [10u8, 20, 30, 40];
        let mut data = px.repeat((w * h) as usize);
        blur_rgba8_premul(&mut data, w, h, 1.5);
        assert_eq!(data, px.repeat((w * h) as usize));
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let (w, h) = (9u32, 9u32);
        let mut data = vec![0u8; (w * h * 4) as usize];
        let center = ((4 * w + 4) * 4) as usize;
        data[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

        blur_rgba8_premul(&mut data, w, h, 1.0);

        let lit = data.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(lit > 1);
        let total: u32 = data.chunks_exact(4).map(|px| u32::from(px[3])).sum();
        assert!((total as i32 - 255).abs() <= 8);
    }

    #[test]
    fn test_shadow_visibility() {
        assert!(!Shadow::default().is_visible());
        let shadow = Shadow {
            color: Color::BLACK,
            blur: 0.0,
            offset_x: 2.0,
            offset_y: 0.0,
        };
        assert!(shadow.is_visible());
        let transparent = Shadow {
            color: Color::TRANSPARENT,
            ..shadow
        };
        assert!(!transparent.is_visible());
    }
}
