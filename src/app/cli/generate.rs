//! Generate command implementation.

use std::path::Path;

use crate::app::api;
use crate::app::config::SettingsOverrides;
use crate::domain::AppError;

pub fn run_generate(
    config_dir: &Path,
    overrides: &SettingsOverrides,
    hosts: &[String],
) -> Result<(), AppError> {
    let report = api::generate(config_dir, overrides, hosts)?;

    for host in &report.generated {
        println!("✅ Generated config for {}", host);
    }
    for failure in &report.failures {
        eprintln!("❌ Failed to generate config for {}: {}", failure.host, failure.error);
    }

    report.into_result().map(|_| ())
}
