use crate::constants::{ARCHIVE_FOLDER_PREFIX, ARCHIVE_TIMESTAMP_FORMAT, ZIP_COMPRESSION_LEVEL};
use crate::error::{CompressionError, Result};
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One compression result queued for download, consumed exactly once by
/// packaging.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl BatchItem {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }
}

/// The single downloadable result of packaging: either one file passed
/// through untouched, or a zip archive of many.
#[derive(Debug, Clone)]
pub enum Artifact {
    Single { filename: String, bytes: Vec<u8> },
    Archive { filename: String, bytes: Vec<u8> },
}

impl Artifact {
    pub fn filename(&self) -> &str {
        match self {
            Artifact::Single { filename, .. } | Artifact::Archive { filename, .. } => filename,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Artifact::Single { bytes, .. } | Artifact::Archive { bytes, .. } => bytes,
        }
    }
}

/// Packages batch results for download.
///
/// A single item is delivered as-is under its own filename. Two or more are
/// zipped under one timestamped top-level folder, with name collisions
/// resolved against the entries committed so far.
pub fn package_for_download(mut items: Vec<BatchItem>) -> Result<Artifact> {
    match items.len() {
        0 => Err(CompressionError::NothingToDownload),
        1 => {
            let item = items.remove(0);
            Ok(Artifact::Single {
                filename: item.filename,
                bytes: item.bytes,
            })
        }
        _ => {
            let folder = archive_folder_name();
            let bytes = build_archive(&items, &folder)?;
            Ok(Artifact::Archive {
                filename: format!("{}.zip", folder),
                bytes,
            })
        }
    }
}

/// Writes the artifact into `dir` under its suggested filename and returns
/// the final path.
pub fn save_artifact(artifact: &Artifact, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|_| CompressionError::DirectoryCreationFailed(dir.to_path_buf()))?;

    let path = dir.join(artifact.filename());
    fs::write(&path, artifact.bytes())?;
    Ok(path)
}

/// Filesystem-safe folder name derived from the archive creation time.
fn archive_folder_name() -> String {
    format!(
        "{}_{}",
        ARCHIVE_FOLDER_PREFIX,
        Local::now().format(ARCHIVE_TIMESTAMP_FORMAT)
    )
}

/// Builds the zip buffer. The container always uses DEFLATE at a fixed
/// medium level, independent of how the images themselves were compressed.
fn build_archive(items: &[BatchItem], folder: &str) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(ZIP_COMPRESSION_LEVEL));

    writer
        .add_directory(folder, options)
        .map_err(|e| CompressionError::ArchiveBuildFailed(e.to_string()))?;

    let mut committed: HashSet<String> = HashSet::new();
    for item in items {
        let final_name = disambiguate(&item.filename, &committed);

        writer
            .start_file(format!("{}/{}", folder, final_name), options)
            .map_err(|e| CompressionError::ArchiveBuildFailed(e.to_string()))?;
        writer
            .write_all(&item.bytes)
            .map_err(|e| CompressionError::ArchiveBuildFailed(e.to_string()))?;

        committed.insert(final_name);
    }

    let cursor = writer
        .finish()
        .map_err(|e| CompressionError::ArchiveBuildFailed(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Resolves a filename against the already-committed entries by inserting
/// `_<n>` before the extension until the name is free. Insertion order
/// therefore determines the numbering.
fn disambiguate(filename: &str, committed: &HashSet<String>) -> String {
    if !committed.contains(filename) {
        return filename.to_string();
    }

    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    let mut counter = 1;
    loop {
        let candidate = match extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        if !committed.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
