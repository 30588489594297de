//! API Facade for the application.
//!
//! This module exposes high-level functions that glue together context creation
//! and command execution.

use std::path::Path;

use crate::app::{
    AppContext,
    commands::{generate, serve, url},
};

pub use crate::app::commands::generate::{GenerationReport, HostGenerationError};
pub use crate::app::commands::serve::BoundServer;
pub use crate::app::config::SettingsOverrides;
pub use crate::domain::AppError;

/// Generate archives for `hosts` (all hosts when empty) from `config_dir`.
///
/// Per-host failures are reported in the returned [`GenerationReport`]; only
/// startup problems are returned as errors.
pub fn generate(
    config_dir: &Path,
    overrides: &SettingsOverrides,
    hosts: &[String],
) -> Result<GenerationReport, AppError> {
    let ctx = AppContext::load(config_dir, overrides)?;
    generate::execute(&ctx, hosts)
}

/// Render the capability URL listing for `hosts` (all hosts when empty).
pub fn urls(
    config_dir: &Path,
    overrides: &SettingsOverrides,
    hosts: &[String],
) -> Result<String, AppError> {
    let ctx = AppContext::load(config_dir, overrides)?;
    url::listing(ctx.registry(), &ctx.settings().url_prefix, hosts)
}

/// Load configuration and serve until the process is stopped.
pub fn serve(config_dir: &Path, overrides: &SettingsOverrides) -> Result<(), AppError> {
    let ctx = AppContext::load(config_dir, overrides)?;
    serve::execute(ctx)
}

/// Load configuration and bind the listener without serving yet.
pub fn bind(
    config_dir: &Path,
    overrides: &SettingsOverrides,
) -> Result<BoundServer<crate::services::TarArchiveStore>, AppError> {
    let ctx = AppContext::load(config_dir, overrides)?;
    serve::bind(ctx)
}
