use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Writes a noise PNG to `path` and returns its byte size. Pixel noise is
/// incompressible for PNG, so dimensions translate reliably into file size
/// (256x256 lands well above the 50 KiB skip threshold).
pub fn write_noise_png(path: &Path, width: u32, height: u32) -> u64 {
    let mut seed = 0x9e3779b9u32;
    let buf = RgbImage::from_fn(width, height, |_, _| {
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
        image::Rgb([(seed >> 8) as u8, (seed >> 16) as u8, (seed >> 24) as u8])
    });
    DynamicImage::ImageRgb8(buf)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
    std::fs::metadata(path).unwrap().len()
}

/// Writes a tiny flat-color PNG, guaranteed to be below the skip threshold.
pub fn write_tiny_png(path: &Path) -> u64 {
    let buf = RgbImage::from_pixel(16, 16, image::Rgb([120, 180, 60]));
    DynamicImage::ImageRgb8(buf)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
    std::fs::metadata(path).unwrap().len()
}
