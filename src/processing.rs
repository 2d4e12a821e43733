use crate::constants::{
    DEFAULT_QUALITY, MAX_FILE_SIZE, MAX_IMAGE_DIMENSION, MAX_QUALITY, MIN_QUALITY, NO_GAIN_RATIO,
    SMALL_FILE_THRESHOLD,
};
use crate::error::{CompressionError, Result};
use crate::formats::{format_name_from_mime, OutputFormat};
use crate::planner::EncodePlan;
use crate::provider::FallbackChain;
use crate::verbose;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Raw input bytes plus what little metadata is known up front. Pixel
/// dimensions are probed lazily from the header; the buffer itself is never
/// mutated by the pipeline.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Reads an image file, checking existence and the size limit before
    /// touching the contents.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CompressionError::FileNotFound(path.to_path_buf()));
        }

        let file_size = fs::metadata(path)?.len();
        if file_size > MAX_FILE_SIZE {
            return Err(CompressionError::FileTooLarge(file_size, MAX_FILE_SIZE));
        }

        let bytes = fs::read(path)?;
        let mime_type = ImageFormat::from_path(path)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());

        Ok(Self { bytes, mime_type })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pixel dimensions from the image header, without a full decode.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(&self.bytes)).with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    /// Fully decodes the buffer, enforcing the dimension limit.
    pub fn decode(&self) -> Result<DynamicImage> {
        let img = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()?
            .decode()?;

        let (width, height) = img.dimensions();
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(CompressionError::InvalidDimensions(
                width,
                height,
                MAX_IMAGE_DIMENSION,
            ));
        }

        Ok(img)
    }
}

/// What the caller wants out of one compression run. Quality is canonical
/// 1-100; absent bounds leave the dimensions untouched.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub target_format: OutputFormat,
    pub quality: u8,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub maintain_aspect_ratio: bool,
}

impl CompressionRequest {
    pub fn new(
        target_format: OutputFormat,
        quality: Option<u8>,
        max_width: Option<u32>,
        max_height: Option<u32>,
        maintain_aspect_ratio: bool,
    ) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(CompressionError::InvalidQuality(quality));
        }

        Ok(Self {
            target_format,
            quality,
            max_width,
            max_height,
            maintain_aspect_ratio,
        })
    }
}

/// Why the returned bytes are what they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The encode was accepted; the bytes are the re-encoded image.
    Compressed,
    /// The input was below the small-file threshold; original bytes returned.
    SkippedTooSmall,
    /// The encode saved less than 5%; original bytes returned.
    FallbackNoGain,
}

#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub bytes: Vec<u8>,
    pub output_format: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: u32,
    pub width: u32,
    pub height: u32,
    pub quality_used: u8,
    pub decision: Decision,
}

/// Percentage reduction relative to the original, rounded to the nearest
/// integer and never negative.
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> u32 {
    if original_size == 0 || compressed_size >= original_size {
        return 0;
    }
    (((original_size - compressed_size) as f64 / original_size as f64) * 100.0).round() as u32
}

/// The compression orchestrator: skip check, planning, encoding through the
/// provider chain, and the not-worth-it gate. Holds no per-call state, so one
/// instance is safe to share across threads.
pub struct Compressor {
    chain: FallbackChain,
}

impl Compressor {
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain }
    }

    /// Runs one image through the pipeline. Each call is independent.
    pub fn compress(
        &self,
        image: &SourceImage,
        request: &CompressionRequest,
    ) -> Result<CompressionOutcome> {
        let original_size = image.len();

        if original_size < SMALL_FILE_THRESHOLD {
            verbose!(
                "Skipping compression: {} bytes is below the {} byte threshold",
                original_size,
                SMALL_FILE_THRESHOLD
            );
            let (width, height) = image.dimensions().unwrap_or((0, 0));
            return Ok(self.original_outcome(
                image,
                request.quality,
                width,
                height,
                Decision::SkippedTooSmall,
            ));
        }

        let (original_width, original_height) = image.dimensions()?;
        let plan = EncodePlan::new(
            original_width,
            original_height,
            original_size,
            request.quality,
            request.max_width,
            request.max_height,
            request.maintain_aspect_ratio,
        );
        verbose!(
            "Encode plan: {}x{} at quality {} (effort {})",
            plan.width,
            plan.height,
            plan.quality,
            plan.effort
        );

        let output = self.chain.encode(image, request, &plan)?;

        // A provider may have applied the skip/no-gain policy on its own
        // side; honor that decision without re-evaluating.
        if let Some(decision) = output.decision_hint {
            return Ok(self.original_outcome(
                image,
                output.quality_used,
                original_width,
                original_height,
                decision,
            ));
        }

        let compressed_size = output.bytes.len() as u64;
        if compressed_size as f64 >= original_size as f64 * NO_GAIN_RATIO {
            verbose!(
                "Encode saved too little ({} -> {} bytes); keeping the original",
                original_size,
                compressed_size
            );
            return Ok(self.original_outcome(
                image,
                output.quality_used,
                original_width,
                original_height,
                Decision::FallbackNoGain,
            ));
        }

        Ok(CompressionOutcome {
            output_format: request.target_format.name().to_string(),
            original_size,
            compressed_size,
            compression_ratio: compression_ratio(original_size, compressed_size),
            width: output.width,
            height: output.height,
            quality_used: output.quality_used,
            decision: Decision::Compressed,
            bytes: output.bytes,
        })
    }

    /// Outcome that hands the caller back their own bytes, with the ratio
    /// reported as zero by definition.
    fn original_outcome(
        &self,
        image: &SourceImage,
        quality_used: u8,
        width: u32,
        height: u32,
        decision: Decision,
    ) -> CompressionOutcome {
        CompressionOutcome {
            bytes: image.bytes().to_vec(),
            output_format: format_name_from_mime(image.mime_type()),
            original_size: image.len(),
            compressed_size: image.len(),
            compression_ratio: 0,
            width,
            height,
            quality_used,
            decision,
        }
    }
}

/// Resolves the target format from an explicit token or the output path
/// extension, defaulting to JPEG when neither decides.
pub fn determine_output_format(output: &Path, format: &Option<String>) -> Result<OutputFormat> {
    if let Some(fmt) = format {
        return OutputFormat::from_name(fmt);
    }

    let inferred = output
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(OutputFormat::from_extension);

    Ok(inferred.unwrap_or(OutputFormat::Jpeg))
}

/// Compresses a single file on disk and writes the resulting bytes to the
/// output path, creating parent directories as needed.
pub fn compress_file(
    compressor: &Compressor,
    input: &Path,
    output: &Path,
    request: &CompressionRequest,
) -> Result<CompressionOutcome> {
    let image = SourceImage::from_file(input)?;
    let outcome = compressor.compress(&image, request)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
        }
    }
    fs::write(output, &outcome.bytes)?;

    Ok(outcome)
}
