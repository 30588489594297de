use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::{AppError, RoleFileEntry};
use crate::ports::RoleFileSource;

/// Reads role files from `{roles_root}/{role}`.
#[derive(Debug, Clone)]
pub struct FilesystemRoleFileSource {
    roles_root: PathBuf,
}

impl FilesystemRoleFileSource {
    pub fn new(roles_root: impl Into<PathBuf>) -> Self {
        Self { roles_root: roles_root.into() }
    }

    /// `path` relative to the roles root, `/`-joined. `None` if any component
    /// is not valid UTF-8.
    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.roles_root).unwrap_or(path);
        let mut parts = Vec::new();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                parts.push(part.to_str()?);
            }
        }
        Some(parts.join("/"))
    }
}

impl RoleFileSource for FilesystemRoleFileSource {
    fn collect(&self, role: &str) -> Result<Vec<RoleFileEntry>, AppError> {
        let role_dir = self.roles_root.join(role);
        let unreadable = |path: &Path, details: String| AppError::RoleUnreadable {
            role: role.to_string(),
            path: path.display().to_string(),
            details,
        };

        if !role_dir.is_dir() {
            return Err(unreadable(&role_dir, "role directory doesn't exist".to_string()));
        }

        let mut entries = Vec::new();
        for item in WalkDir::new(&role_dir).follow_links(true) {
            let item = item.map_err(|err| {
                let path = err.path().unwrap_or(&role_dir).to_path_buf();
                unreadable(&path, err.to_string())
            })?;

            let path = item.path();
            if !item.file_type().is_file() {
                if !item.file_type().is_dir() {
                    debug!(role, path = %path.display(), "skipping non-regular file");
                }
                continue;
            }

            let relative_path = self.relative_path(path).ok_or_else(|| {
                unreadable(path, "file name is not valid UTF-8".to_string())
            })?;
            let contents = fs::read(path).map_err(|err| unreadable(path, err.to_string()))?;
            let metadata = fs::metadata(path).map_err(|err| unreadable(path, err.to_string()))?;

            entries.push(RoleFileEntry {
                relative_path,
                contents,
                mode: permission_bits(&metadata),
            });
        }

        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(entries)
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> u32 {
    if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}
