//! Partition discovery and parsing.
//!
//! A partition is one day of scraped output laid out as
//! `<base>/raw/telegram_messages/<YYYY-MM-DD>/*.json`. Each file holds a JSON
//! array of message objects; `_manifest.json` describes the scrape and is
//! never loaded.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{LoaderError, Result};
use crate::models::RawMessage;

/// Reserved file in each partition that is skipped during loading
pub const MANIFEST_FILE: &str = "_manifest.json";

/// Extension of message files
pub const MESSAGE_FILE_SUFFIX: &str = ".json";

/// Path segments between the base directory and the date directory
const PARTITION_ROOT: [&str; 2] = ["raw", "telegram_messages"];

/// A date partition under a base data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    base: PathBuf,
    date: String,
}

impl Partition {
    /// Address the partition for `date` under `base`
    pub fn new(base: impl Into<PathBuf>, date: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            date: date.into(),
        }
    }

    /// Base data directory
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Partition date string
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// `<base>/raw/telegram_messages/<date>`
    #[must_use]
    pub fn dir(&self) -> PathBuf {
        let mut dir = self.base.clone();
        dir.extend(PARTITION_ROOT);
        dir.push(&self.date);
        dir
    }
}

/// Messages gathered from every file of a partition
#[derive(Debug, Clone, Default)]
pub struct PartitionBatch {
    /// Files that were read, in read order
    pub files: Vec<PathBuf>,
    /// All records, concatenated file by file
    pub messages: Vec<RawMessage>,
}

/// Whether `file_name` is a message file rather than the manifest or something else
#[must_use]
pub fn is_message_file(file_name: &str) -> bool {
    file_name.ends_with(MESSAGE_FILE_SUFFIX) && file_name != MANIFEST_FILE
}

/// List message files in a partition directory, sorted by file name
pub fn list_message_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source: std::io::Error| LoaderError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if is_message_file(file_name) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Parse one message file
///
/// The whole file must be a JSON array whose elements are all objects.
pub fn read_message_file(path: &Path) -> Result<Vec<RawMessage>> {
    let content = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_messages(&content).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a JSON array of message objects
pub fn parse_messages(content: &str) -> serde_json::Result<Vec<RawMessage>> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(content)?;
    objects
        .into_iter()
        .map(|object| serde_json::from_value(Value::Object(object)))
        .collect()
}

/// Read every message file of a partition
///
/// Fails with [`LoaderError::PartitionNotFound`] if the directory is missing
/// and with [`LoaderError::Parse`] on the first malformed file.
pub fn read_partition(partition: &Partition) -> Result<PartitionBatch> {
    let dir = partition.dir();
    if !dir.is_dir() {
        return Err(LoaderError::PartitionNotFound(dir));
    }

    let files = list_message_files(&dir)?;
    info!("Found {} JSON files in {}", files.len(), dir.display());

    let mut messages = Vec::new();
    for path in &files {
        debug!(file = %path.display(), "Reading message file");
        let file_messages = read_message_file(path)?;
        info!(
            "Loaded {} messages from {}",
            file_messages.len(),
            path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
        );
        messages.extend(file_messages);
    }

    Ok(PartitionBatch { files, messages })
}
