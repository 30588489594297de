use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::{AppError, BundleArchive};
use crate::ports::ArchiveStore;

/// Archive store that keeps written bundles in memory for testing.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingArchiveStore {
    written: RefCell<Vec<(PathBuf, BundleArchive)>>,
}

#[allow(dead_code)]
impl RecordingArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.written.borrow().iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn archive_for(&self, path: &Path) -> Option<BundleArchive> {
        self.written
            .borrow()
            .iter()
            .rev()
            .find(|(written, _)| written == path)
            .map(|(_, archive)| archive.clone())
    }
}

impl ArchiveStore for RecordingArchiveStore {
    fn prepare(&self, _dir: &Path) -> Result<(), AppError> {
        Ok(())
    }

    fn write(&self, archive: &BundleArchive, path: &Path) -> Result<(), AppError> {
        self.written.borrow_mut().push((path.to_path_buf(), archive.clone()));
        Ok(())
    }

    fn open(&self, _path: &Path) -> io::Result<File> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "recording store cannot reopen archives"))
    }
}
