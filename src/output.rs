//! # Output Module
//!
//! Writes rendered frames to disk:
//! - PNG export with sRGB gamma for display
//! - EXR export keeping linear f32 values
//! - Depth buffer export as a grayscale PNG
//!
//! Failures are logged and never abort the render loop.

use exr::prelude::*;
use image::{ImageBuffer, Luma, Rgb};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Output formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// 8-bit sRGB PNG
    Png,
    /// Linear 32-bit float OpenEXR
    Exr,
}

impl ImageFormat {
    /// Format for `path`, or `None` when the extension is unsupported.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            "exr" => Some(ImageFormat::Exr),
            _ => None,
        }
    }
}

/// File name for `frame` out of `frames`.
///
/// Single-frame renders keep `base` untouched; animations get a zero padded
/// frame index before the extension (`out.png` -> `out_0003.png`).
pub fn numbered_path(base: &str, frame: u32, frames: u32) -> String {
    if frames <= 1 {
        return base.to_string();
    }
    let path = Path::new(base);
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{:04}.{}", stem, frame, ext.to_string_lossy()),
        None => format!("{}_{:04}", stem, frame),
    };
    let numbered: PathBuf = path.with_file_name(name);
    numbered.to_string_lossy().into_owned()
}

/// sRGB transfer curve with linear portion for dark values.
fn linear_to_gamma(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Save an f32 RGB image as an 8-bit PNG.
///
/// Values are clamped to [0, 1] and gamma-encoded with the sRGB curve.
pub fn save_image_as_png(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb([
            (linear_to_gamma(pixel[0].clamp(0.0, 1.0)) * 255.0) as u8,
            (linear_to_gamma(pixel[1].clamp(0.0, 1.0)) * 255.0) as u8,
            (linear_to_gamma(pixel[2].clamp(0.0, 1.0)) * 255.0) as u8,
        ])
    });

    match u8_image.save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save an f32 RGB image as EXR with full precision and no tone mapping.
pub fn save_image_as_exr(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let width = image.width() as usize;
    let pixels = image
        .pixels()
        .map(|rgb| (rgb[0], rgb[1], rgb[2]))
        .collect::<Vec<(f32, f32, f32)>>();

    let result = write_rgb_file(output_path, width, image.height() as usize, |x, y| pixels[y * width + x]);

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}

/// Quantise a window-space depth value in [0, 1] to 16 bits.
fn depth_to_u16(depth: f32) -> u16 {
    (depth.clamp(0.0, 1.0) * u16::MAX as f32) as u16
}

/// Save a window-space depth buffer as a 16-bit grayscale PNG.
///
/// Values are window-space depth as produced by the perspective
/// projection, so they are not linear in eye distance: black at the near
/// plane, white at the far plane and where nothing was drawn.
pub fn save_depth_as_png(depth: &ImageBuffer<Luma<f32>, Vec<f32>>, output_path: &str) {
    let u16_image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(depth.width(), depth.height(), |x, y| {
        Luma([depth_to_u16(depth.get_pixel(x, y)[0])])
    });

    match u16_image.save(output_path) {
        Ok(_) => info!("Depth buffer saved as {}", output_path),
        Err(e) => warn!("Failed to save depth buffer: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_path() {
        assert_eq!(numbered_path("imposter.png", 3, 1), "imposter.png");
        assert_eq!(numbered_path("imposter.png", 3, 10), "imposter_0003.png");
        assert_eq!(numbered_path("out/depth.exr", 12, 20), "out/depth_0012.exr");
        assert_eq!(numbered_path("frame", 0, 2), "frame_0000");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_path("a.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path("a.EXR"), Some(ImageFormat::Exr));
        assert_eq!(ImageFormat::from_path("a.jpg"), None);
        assert_eq!(ImageFormat::from_path("noext"), None);
    }

    #[test]
    fn test_depth_quantisation_keeps_window_depth() {
        assert_eq!(depth_to_u16(0.0), 0);
        assert_eq!(depth_to_u16(1.0), u16::MAX);
        assert_eq!(depth_to_u16(f32::INFINITY), u16::MAX);
        // Stored as given, without converting back to eye distance
        assert_eq!(depth_to_u16(0.5), u16::MAX / 2);
    }

    #[test]
    fn test_gamma_curve_endpoints() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-6);
        // Mid grey brightens under sRGB encoding
        assert!(linear_to_gamma(0.5) > 0.7);
    }
}
