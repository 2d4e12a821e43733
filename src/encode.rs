use crate::constants::{LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, ZOPFLI_ITERATIONS};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::planner::EncodePlan;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{imageops::FilterType, DynamicImage, GenericImageView};
use oxipng::{Deflaters, Options};
use std::num::NonZeroU8;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Encodes a decoded image to the planned dimensions, quality and format.
///
/// The source image is left untouched; resizing produces a scratch copy
/// owned by this call.
pub fn encode_image(img: &DynamicImage, plan: &EncodePlan, format: OutputFormat) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let resized;
    let target = if (plan.width, plan.height) != (width, height) {
        resized = img.resize_exact(plan.width, plan.height, FilterType::Lanczos3);
        &resized
    } else {
        img
    };

    match format {
        OutputFormat::WebP => encode_webp(target, plan),
        OutputFormat::Jpeg => encode_jpeg(target, plan.quality),
        OutputFormat::Png => encode_png(target, plan.quality),
    }
}

/// Lossy WebP with the planned quality; `method` is the effort tier picked
/// by the planner from the original byte size.
fn encode_webp(img: &DynamicImage, plan: &EncodePlan) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();
    let (width, height) = img.dimensions();

    let mut config = webp::WebPConfig::new()
        .map_err(|_| CompressionError::Encode("failed to initialize WebP config".to_string()))?;
    config.quality = plan.quality as f32;
    config.method = plan.effort as i32;

    let encoder = webp::Encoder::from_rgba(&rgba, width, height);
    let encoded = encoder
        .encode_advanced(&config)
        .map_err(|e| CompressionError::Encode(format!("WebP encoding failed: {:?}", e)))?;

    Ok(encoded.to_vec())
}

/// Progressive JPEG through mozjpeg for better quality per byte than a
/// baseline encoder. libjpeg reports failures by unwinding, so the whole
/// encode runs under catch_unwind and surfaces as an Encode error.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let (width, height) = img.dimensions();

    let encoded = catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();

        let mut started = comp.start_compress(Vec::new())?;
        started.write_scanlines(rgb.as_raw())?;
        started.finish()
    }))
    .map_err(|_| CompressionError::Encode("JPEG encoder aborted".to_string()))?
    .map_err(|e| CompressionError::Encode(format!("JPEG encoding failed: {}", e)))?;

    Ok(encoded)
}

/// PNG at the codec's best compression level, then an oxipng pass. The
/// quality value only steers how hard the deflater works; PNG stays lossless.
fn encode_png(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
    img.write_with_encoder(encoder)?;

    let mut options = Options::from_preset(4);
    if quality >= 90 {
        options.deflate = Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS)
                .ok_or_else(|| CompressionError::PngOptimization("bad zopfli setting".to_string()))?,
        };
    } else if quality >= 70 {
        options.deflate = Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        };
    } else {
        options.deflate = Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        };
    }

    oxipng::optimize_from_memory(&buf, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}
