//! Url command implementation.

use std::path::Path;

use crate::app::api;
use crate::app::config::SettingsOverrides;
use crate::domain::AppError;

pub fn run_url(
    config_dir: &Path,
    overrides: &SettingsOverrides,
    hosts: &[String],
) -> Result<(), AppError> {
    print!("{}", api::urls(config_dir, overrides, hosts)?);
    Ok(())
}
