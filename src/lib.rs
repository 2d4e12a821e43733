pub mod archive;
pub mod batch;
pub mod cli;
pub mod constants;
pub mod encode;
pub mod error;
pub mod formats;
pub mod info;
pub mod logger;
pub mod planner;
pub mod processing;
pub mod provider;
pub mod remote;

pub use archive::{package_for_download, save_artifact, Artifact, BatchItem};
pub use batch::{batch_compress_images, collect_image_files, is_image_file, BatchSummary};
pub use error::{CompressionError, Result};
pub use formats::OutputFormat;
pub use planner::{adaptive_quality, plan_dimensions, EncodePlan};
pub use processing::{
    compress_file, compression_ratio, determine_output_format, CompressionOutcome,
    CompressionRequest, Compressor, Decision, SourceImage,
};
pub use provider::{CompressionProvider, FallbackChain, LocalProvider, ProviderOutput};
pub use remote::{RemoteOptions, RemoteProvider};
