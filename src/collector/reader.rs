//! Reads the status document from disk.

use std::path::{Path, PathBuf};

use crate::collector::traits::FileSystem;
use crate::error::ReadError;

/// Reads the status document at a fixed path.
///
/// Every call goes back to the filesystem, so a document rotated or
/// rewritten by the agent between scrapes is picked up on the next read.
pub struct SummaryReader<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> SummaryReader<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the raw document bytes.
    pub fn read(&self) -> Result<Vec<u8>, ReadError> {
        self.fs.read(&self.path).map_err(|source| ReadError {
            path: self.path.clone(),
            source,
        })
    }
}
