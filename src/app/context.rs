use std::path::Path;
use std::sync::Arc;

use crate::app::config::{Settings, SettingsOverrides, load_registry, load_settings};
use crate::domain::{AppError, Registry};
use crate::ports::{ArchiveStore, RoleFileSource};
use crate::services::{FilesystemRoleFileSource, TarArchiveStore};

/// Application context holding dependencies for command execution.
pub struct AppContext<R: RoleFileSource, A: ArchiveStore> {
    settings: Settings,
    registry: Arc<Registry>,
    roles: R,
    archives: A,
}

impl AppContext<FilesystemRoleFileSource, TarArchiveStore> {
    /// Load settings and registry from `config_dir`, wired to the filesystem.
    pub fn load(config_dir: &Path, overrides: &SettingsOverrides) -> Result<Self, AppError> {
        let settings = load_settings(config_dir, overrides)?;
        let registry = load_registry(&settings)?;
        let roles = FilesystemRoleFileSource::new(settings.roles_dir());
        Ok(Self::new(settings, registry, roles, TarArchiveStore::new()))
    }
}

impl<R: RoleFileSource, A: ArchiveStore> AppContext<R, A> {
    /// Create a new application context.
    pub fn new(settings: Settings, registry: Registry, roles: R, archives: A) -> Self {
        Self { settings, registry: Arc::new(registry), roles, archives }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Get a reference to the role file source.
    pub fn roles(&self) -> &R {
        &self.roles
    }

    /// Get a reference to the archive store.
    pub fn archives(&self) -> &A {
        &self.archives
    }

    pub fn into_parts(self) -> (Settings, Arc<Registry>, A) {
        (self.settings, self.registry, self.archives)
    }
}
