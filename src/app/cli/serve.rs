//! Serve command implementation.

use std::path::Path;

use crate::app::api;
use crate::app::config::SettingsOverrides;
use crate::domain::AppError;

pub fn run_serve(config_dir: &Path, overrides: &SettingsOverrides) -> Result<(), AppError> {
    api::serve(config_dir, overrides)
}
