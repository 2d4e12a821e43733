use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "img-crush",
    about = "Adaptive image compression with remote/local encoder fallback and zip batch packaging",
    long_about = "img-crush compresses images toward a target format/quality/size envelope. \
                  It prefers a remote compression service when one is configured and falls \
                  back to local in-process encoders (WebP, mozjpeg, PNG+oxipng) when the \
                  service is unreachable. Batch runs can bundle results into one zip archive.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    img-crush compress input.jpg output.webp -q 85 -w 1920\n  \
    img-crush batch \"./images/*.jpg\" ./compressed -r -q 80 -f webp --archive\n  \
    img-crush compress input.png output.webp --server http://localhost:3001\n  \
    img-crush info photo.png"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Suppress informational output")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Print pipeline decisions as they happen")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single image file",
        long_about = "Compress a single image with adaptive quality selection. Files under \
                      50 KiB are passed through unchanged, and an encode that saves less \
                      than 5% is discarded in favor of the original bytes."
    )]
    Compress {
        #[arg(help = "Input image file path")]
        input: PathBuf,

        #[arg(help = "Output image file path")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            help = "Compression quality (1-100, default: 80)",
            long_help = "Requested compression quality from 1 (lowest) to 100 (highest). \
                         Inputs under 100 KiB are capped at 60 and inputs under 500 KiB \
                         at 70 to avoid growing small files."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'w',
            long = "max-width",
            help = "Maximum width in pixels",
            long_help = "Scale the image down to fit this width. The image is never upscaled."
        )]
        max_width: Option<u32>,

        #[arg(
            short = 'H',
            long = "max-height",
            help = "Maximum height in pixels",
            long_help = "Scale the image down to fit this height. The image is never upscaled."
        )]
        max_height: Option<u32>,

        #[arg(
            long,
            help = "Clamp width and height independently instead of preserving aspect ratio"
        )]
        stretch: bool,

        #[arg(
            short = 'f',
            long,
            help = "Output format (webp, jpeg, png)",
            long_help = "Force the output format regardless of the output file extension. \
                         Supported formats: webp, jpeg/jpg, png"
        )]
        format: Option<String>,

        #[arg(
            short = 's',
            long,
            help = "Remote compression service URL",
            long_help = "Base URL of a remote compression service to try first. Local \
                         encoders are used as fallback when it is unreachable."
        )]
        server: Option<String>,
    },

    #[command(
        about = "Compress multiple images sequentially",
        long_about = "Process a directory, file or glob pattern one file at a time. \
                      Failures are reported per file and do not stop the batch."
    )]
    Batch {
        #[arg(
            help = "Input directory, file path, or glob",
            long_help = "Input can be a directory path, a single file, or a glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.png'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(short = 'q', long, help = "Compression quality (1-100, default: 80)")]
        quality: Option<u8>,

        #[arg(short = 'w', long = "max-width", help = "Maximum width in pixels")]
        max_width: Option<u32>,

        #[arg(short = 'H', long = "max-height", help = "Maximum height in pixels")]
        max_height: Option<u32>,

        #[arg(
            long,
            help = "Clamp width and height independently instead of preserving aspect ratio"
        )]
        stretch: bool,

        #[arg(
            short = 'f',
            long,
            help = "Output format (webp, jpeg, png)",
            long_help = "Convert all images to the given format. If not specified, each \
                         image keeps its original format."
        )]
        format: Option<String>,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,

        #[arg(
            short = 'a',
            long,
            help = "Package results into a single zip archive",
            long_help = "Instead of writing individual files, bundle all results into one \
                         zip archive under a timestamped folder. Duplicate filenames are \
                         disambiguated with _1, _2, ... suffixes."
        )]
        archive: bool,

        #[arg(short = 's', long, help = "Remote compression service URL")]
        server: Option<String>,
    },

    #[command(
        about = "Package already-compressed files into a download artifact",
        long_about = "Bundle files into the standard download artifact: a single file is \
                      written as-is, two or more become a zip archive under a timestamped \
                      folder with collision-safe entry names."
    )]
    Pack {
        #[arg(required = true, help = "Files to package")]
        input: Vec<PathBuf>,

        #[arg(short = 'o', long, default_value = ".", help = "Output directory")]
        output: PathBuf,
    },

    #[command(
        about = "Display image information and pipeline predictions",
        long_about = "Show dimensions, size and format of an image, plus what the adaptive \
                      compression pipeline would decide for it."
    )]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },
}
