use crate::archive::{package_for_download, save_artifact, BatchItem};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::processing::{
    compress_file, determine_output_format, CompressionRequest, Compressor, SourceImage,
};
use crate::{error, info};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Per-run totals for a batch. Failures are per-file and never abort the
/// remaining files.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_size_before: u64,
    pub total_size_after: u64,
}

impl BatchSummary {
    pub fn overall_ratio(&self) -> f64 {
        if self.total_size_before == 0 {
            return 0.0;
        }
        ((self.total_size_before as f64 - self.total_size_after as f64)
            / self.total_size_before as f64)
            * 100.0
    }
}

/// Compresses every image under `input` one file at a time, writing results
/// into `output`. With `archive` set, results are packaged into a single
/// downloadable artifact instead of individual files.
///
/// Files are processed strictly sequentially so the progress bar advances
/// one file at a time in input order.
#[allow(clippy::too_many_arguments)]
pub fn batch_compress_images(
    compressor: &Compressor,
    input: String,
    output: PathBuf,
    quality: Option<u8>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect_ratio: bool,
    format: Option<String>,
    recursive: bool,
    archive: bool,
) -> Result<BatchSummary> {
    info!("🚀 Starting batch compression...");
    info!("📁 Input: {}", input);
    info!("📁 Output: {:?}", output);

    let start_time = Instant::now();

    let image_files = collect_image_files(&input, recursive)?;
    let total_files = image_files.len();

    if total_files == 0 {
        info!("⚠️  No image files found in the input path");
        return Ok(BatchSummary::default());
    }

    info!("📊 Found {} image files to process", total_files);

    fs::create_dir_all(&output)
        .map_err(|_| CompressionError::DirectoryCreationFailed(output.clone()))?;

    let progress = ProgressBar::new(total_files as u64);
    progress.set_style(ProgressStyle::default_bar());

    let mut summary = BatchSummary::default();
    let mut items: Vec<BatchItem> = Vec::new();

    for input_path in &image_files {
        let result = if archive {
            process_into_item(compressor, input_path, quality, max_width, max_height,
                maintain_aspect_ratio, &format)
            .map(|(item, before, after)| {
                items.push(item);
                (before, after)
            })
        } else {
            process_into_file(compressor, input_path, &output, quality, max_width, max_height,
                maintain_aspect_ratio, &format)
        };

        match result {
            Ok((before, after)) => {
                summary.processed += 1;
                summary.total_size_before += before;
                summary.total_size_after += after;
            }
            Err(e) => {
                error!("Failed to process {:?}: {}", input_path, e);
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_with_message("✅ Batch compression complete");

    if archive {
        let artifact = package_for_download(items)?;
        let path = save_artifact(&artifact, &output)?;
        info!("📦 Packaged {} file(s) into {:?}", summary.processed, path);
    }

    let elapsed_time = start_time.elapsed();
    info!("\n📊 Batch Compression Summary:");
    info!("  📁 Total files processed: {}", summary.processed);
    info!("  📊 Total original size: {} bytes", summary.total_size_before);
    info!("  📊 Total compressed size: {} bytes", summary.total_size_after);
    info!("  🎯 Overall compression ratio: {:.1}%", summary.overall_ratio());
    info!("  ⏱️  Total time: {:?}", elapsed_time);
    if summary.failed > 0 {
        info!("  ⚠️  Failed files: {}", summary.failed);
    }

    Ok(summary)
}

fn build_request(
    target_path: &Path,
    quality: Option<u8>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect_ratio: bool,
    format: &Option<String>,
) -> Result<CompressionRequest> {
    let target_format = determine_output_format(target_path, format)?;
    CompressionRequest::new(
        target_format,
        quality,
        max_width,
        max_height,
        maintain_aspect_ratio,
    )
}

#[allow(clippy::too_many_arguments)]
fn process_into_file(
    compressor: &Compressor,
    input_path: &Path,
    output_dir: &Path,
    quality: Option<u8>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect_ratio: bool,
    format: &Option<String>,
) -> Result<(u64, u64)> {
    let output_path = generate_output_path(input_path, output_dir, format)?;
    let request = build_request(&output_path, quality, max_width, max_height,
        maintain_aspect_ratio, format)?;
    let outcome = compress_file(compressor, input_path, &output_path, &request)?;
    Ok((outcome.original_size, outcome.compressed_size))
}

#[allow(clippy::too_many_arguments)]
fn process_into_item(
    compressor: &Compressor,
    input_path: &Path,
    quality: Option<u8>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect_ratio: bool,
    format: &Option<String>,
) -> Result<(BatchItem, u64, u64)> {
    let filename = output_filename(input_path, format)?;
    let request = build_request(Path::new(&filename), quality, max_width, max_height,
        maintain_aspect_ratio, format)?;
    let image = SourceImage::from_file(input_path)?;
    let outcome = compressor.compress(&image, &request)?;

    let (before, after) = (outcome.original_size, outcome.compressed_size);
    Ok((BatchItem::new(outcome.bytes, filename), before, after))
}

pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    let input_path = Path::new(input);
    let canonical_input = if input_path.exists() {
        input_path
            .canonicalize()
            .map_err(|_| CompressionError::NoImageFilesFound(input.to_string()))?
    } else {
        // Glob patterns are validated entry by entry below
        input_path.to_path_buf()
    };

    if canonical_input.exists() && canonical_input.is_file() {
        image_files.push(canonical_input);
    } else if canonical_input.exists() && canonical_input.is_dir() {
        let walker = if recursive {
            WalkDir::new(&canonical_input).into_iter()
        } else {
            WalkDir::new(&canonical_input).max_depth(1).into_iter()
        };

        for entry in walker.filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.')) {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && is_image_file(path) {
                if let Ok(canonical_path) = path.canonicalize() {
                    image_files.push(canonical_path);
                }
            }
        }
    } else if let Ok(glob_pattern) = glob(input) {
        for entry in glob_pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) {
                if let Ok(canonical_path) = entry.canonicalize() {
                    image_files.push(canonical_path);
                }
            }
        }
    } else {
        return Err(CompressionError::NoImageFilesFound(input.to_string()));
    }

    image_files.sort();
    Ok(image_files)
}

/// Decodable input extensions; output is always one of the three supported
/// formats.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            matches!(
                ext.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tiff" | "gif"
            )
        })
        .unwrap_or(false)
}

pub fn generate_output_path(
    input_path: &Path,
    output_dir: &Path,
    format: &Option<String>,
) -> Result<PathBuf> {
    Ok(output_dir.join(output_filename(input_path, format)?))
}

/// Output filename for a source file: original stem, extension taken from
/// the output format the file will actually be encoded to. Inputs whose
/// extension is decodable but not producible (bmp, gif, tiff) land on the
/// JPEG default, same as format resolution on the output path.
pub fn output_filename(input_path: &Path, format: &Option<String>) -> Result<String> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat("Invalid file name".to_string()))?;

    let target = match format {
        Some(fmt) => OutputFormat::from_name(fmt)?,
        None => input_path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(OutputFormat::from_extension)
            .unwrap_or(OutputFormat::Jpeg),
    };

    Ok(format!("{}.{}", file_stem.to_string_lossy(), target.extension()))
}
