use std::fs::File;
use std::io;
use std::path::Path;

use crate::domain::{AppError, BundleArchive};

/// Port for persisting and reopening host archives.
pub trait ArchiveStore {
    /// Make sure the directory archives are written to exists.
    fn prepare(&self, dir: &Path) -> Result<(), AppError>;

    /// Serialize `archive` to `path`, replacing any previous archive.
    ///
    /// Readers holding the previous file open must never observe a partial
    /// write.
    fn write(&self, archive: &BundleArchive, path: &Path) -> Result<(), AppError>;

    /// Open a previously written archive for streaming.
    fn open(&self, path: &Path) -> io::Result<File>;
}
