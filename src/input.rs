use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{VisionError, VisionResult};

/// An image file read into memory, keyed by the path it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub name: String,
    pub content: Vec<u8>,
}

impl ImageInput {
    pub fn open(path: impl AsRef<Path>) -> VisionResult<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| VisionError::input(path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "read image");

        Ok(Self {
            name: path.display().to_string(),
            content,
        })
    }

    /// Reads every entry of `dir` in file-name order. Entries are not
    /// filtered, so anything that is not a readable file fails the whole read.
    pub fn read_dir(dir: impl AsRef<Path>) -> VisionResult<Vec<Self>> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir)
            .map_err(|e| VisionError::input(dir, e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| VisionError::input(dir, e))?;
        entries.sort_by_key(|entry| entry.file_name());

        entries
            .iter()
            .map(|entry| Self::open(dir.join(entry.file_name())))
            .collect()
    }
}
