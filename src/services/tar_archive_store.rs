use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tar::{Builder, EntryType, Header};
use tempfile::NamedTempFile;

use crate::domain::{AppError, BundleArchive};
use crate::ports::ArchiveStore;

/// Writes bundles as tar files next to their final location, then renames
/// them into place.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarArchiveStore;

impl TarArchiveStore {
    pub fn new() -> Self {
        Self
    }

    /// Serialize `archive` as tar into `writer`.
    ///
    /// Headers carry zero mtime and ownership so identical inputs produce
    /// identical bytes.
    pub fn encode<W: Write>(archive: &BundleArchive, writer: W) -> io::Result<W> {
        let mut builder = Builder::new(writer);

        for entry in archive.entries() {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(entry.contents.len() as u64);
            header.set_mode(entry.effective_mode());
            header.set_mtime(0);
            header.set_uid(0);
            header.set_gid(0);
            builder.append_data(&mut header, &entry.path, entry.contents.as_slice())?;
        }

        builder.into_inner()
    }
}

impl ArchiveStore for TarArchiveStore {
    fn prepare(&self, dir: &Path) -> Result<(), AppError> {
        ensure_archive_dir(dir)?;
        Ok(())
    }

    fn write(&self, archive: &BundleArchive, path: &Path) -> Result<(), AppError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let staging = NamedTempFile::new_in(dir)?;
        let mut file = Self::encode(archive, staging)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| AppError::Io(err.error))?;

        Ok(())
    }

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }
}

/// Create the generated-archive directory, private to the owner.
fn ensure_archive_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}
