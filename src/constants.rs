pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Files below this size are returned untouched. Binary-KiB convention
/// (50 * 1024 bytes) is the canonical threshold for the whole pipeline.
pub const SMALL_FILE_THRESHOLD: u64 = 50 * 1024;

/// Adaptive quality tiers: small inputs gain little from high-fidelity
/// re-encoding and tend to grow under lossy re-encode overhead.
pub const ADAPTIVE_SMALL_BYTES: u64 = 100 * 1024;
pub const ADAPTIVE_MEDIUM_BYTES: u64 = 500 * 1024;
pub const ADAPTIVE_SMALL_CAP: u8 = 60;
pub const ADAPTIVE_MEDIUM_CAP: u8 = 70;

/// An encode that keeps >= 95% of the original bytes is not worth the
/// format/metadata loss; the original bytes win.
pub const NO_GAIN_RATIO: f64 = 0.95;

/// WebP search effort (0-6): cheap for small inputs, exhaustive above 500 KiB.
pub const WEBP_EFFORT_DEFAULT: u8 = 4;
pub const WEBP_EFFORT_LARGE: u8 = 6;
pub const WEBP_EFFORT_THRESHOLD: u64 = 500 * 1024;

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

/// Fixed container settings for batch archives, independent of the image
/// compression settings.
pub const ZIP_COMPRESSION_LEVEL: i64 = 6;
pub const ARCHIVE_FOLDER_PREFIX: &str = "compressed_images";
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Upper bound on input size, matching the remote provider's upload limit.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 20000;

pub const DEFAULT_REMOTE_URL: &str = "http://localhost:3001";
pub const REMOTE_TIMEOUT_SECS: u64 = 30;
