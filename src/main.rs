use anyhow::Result;
use clap::Parser;
use img_crush::archive::{package_for_download, save_artifact, BatchItem};
use img_crush::cli::{Args, Commands};
use img_crush::error::CompressionError;
use img_crush::processing::{
    compress_file, determine_output_format, CompressionRequest, Compressor, Decision,
};
use img_crush::provider::{FallbackChain, LocalProvider};
use img_crush::remote::{RemoteOptions, RemoteProvider};
use img_crush::{batch::batch_compress_images, info::print_image_info, logger};
use img_crush::info;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::configure(args.quiet, args.verbose);

    match args.command {
        Commands::Compress {
            input,
            output,
            quality,
            max_width,
            max_height,
            stretch,
            format,
            server,
        } => {
            let compressor = build_compressor(server);
            run_compress(
                &compressor,
                &input,
                &output,
                quality,
                max_width,
                max_height,
                !stretch,
                format,
            )?;
        }
        Commands::Batch {
            input,
            output,
            quality,
            max_width,
            max_height,
            stretch,
            format,
            recursive,
            archive,
            server,
        } => {
            let compressor = build_compressor(server);
            batch_compress_images(
                &compressor,
                input,
                output,
                quality,
                max_width,
                max_height,
                !stretch,
                format,
                recursive,
                archive,
            )?;
        }
        Commands::Pack { input, output } => {
            run_pack(&input, &output)?;
        }
        Commands::Info { input } => {
            print_image_info(&input)?;
        }
    }

    Ok(())
}

fn run_pack(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let mut items = Vec::with_capacity(inputs.len());
    for path in inputs {
        if !path.exists() {
            return Err(CompressionError::FileNotFound(path.clone()).into());
        }
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| CompressionError::FileNotFound(path.clone()))?;
        items.push(BatchItem::new(std::fs::read(path)?, filename));
    }

    let count = items.len();
    let artifact = package_for_download(items)?;
    let path = save_artifact(&artifact, output)?;
    info!("📦 Packaged {} file(s) into {:?}", count, path);

    Ok(())
}

/// Remote first when a server is given, local encoders as fallback;
/// otherwise local only.
fn build_compressor(server: Option<String>) -> Compressor {
    let chain = match server {
        Some(url) => FallbackChain::new(vec![
            Box::new(RemoteProvider::new(RemoteOptions::new(Some(url)))),
            Box::new(LocalProvider),
        ]),
        None => FallbackChain::local_only(),
    };
    Compressor::new(chain)
}

#[allow(clippy::too_many_arguments)]
fn run_compress(
    compressor: &Compressor,
    input: &Path,
    output: &Path,
    quality: Option<u8>,
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect_ratio: bool,
    format: Option<String>,
) -> Result<()> {
    info!("🗜️  Compressing image: {:?}", input);
    info!("📁 Output: {:?}", output);

    let target_format = determine_output_format(output, &format)?;
    let request = CompressionRequest::new(
        target_format,
        quality,
        max_width,
        max_height,
        maintain_aspect_ratio,
    )?;

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Compressing...");

    let outcome = compress_file(compressor, input, output, &request)?;
    pb.finish_with_message("✅ Compression complete");

    info!(
        "📊 Original size: {} bytes ({}x{})",
        outcome.original_size, outcome.width, outcome.height
    );
    info!("📈 Compressed size: {} bytes", outcome.compressed_size);
    info!("🎯 Compression ratio: {}%", outcome.compression_ratio);

    match outcome.decision {
        Decision::Compressed => {
            info!(
                "✅ Reduced file size by {}% (quality {}, {})",
                outcome.compression_ratio, outcome.quality_used, outcome.output_format
            );
        }
        Decision::SkippedTooSmall => {
            info!("⏭️  File already small enough, original bytes kept");
        }
        Decision::FallbackNoGain => {
            info!("⚠️  Compression gain below 5%, original bytes kept");
        }
    }

    Ok(())
}
