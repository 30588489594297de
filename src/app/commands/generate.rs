//! Batch bundle generation.
//!
//! Hosts are processed in name order. A failing host is recorded and skipped;
//! every other selected host is still generated.

use tracing::{info, warn};

use crate::app::AppContext;
use crate::domain::AppError;
use crate::ports::{ArchiveStore, RoleFileSource};
use crate::services::build_bundle;

/// A generation failure attributed to one host.
#[derive(Debug)]
pub struct HostGenerationError {
    pub host: String,
    pub error: AppError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Hosts whose archive was written, in name order.
    pub generated: Vec<String>,
    pub failures: Vec<HostGenerationError>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.generated.len() + self.failures.len()
    }

    /// Convert into an error if any host failed.
    pub fn into_result(self) -> Result<Self, AppError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AppError::GenerationFailed { failed: self.failures.len(), total: self.total() })
        }
    }
}

/// Generate archives for `hosts`, or for every host when empty.
///
/// Unknown host names fail the whole run before anything is written.
pub fn execute<R, A>(ctx: &AppContext<R, A>, hosts: &[String]) -> Result<GenerationReport, AppError>
where
    R: RoleFileSource,
    A: ArchiveStore,
{
    let registry = ctx.registry();
    let selected = registry.select_hosts(hosts)?;
    let generated_dir = &ctx.settings().generated_dir;

    info!(dir = %generated_dir.display(), hosts = selected.len(), "generating configs");
    ctx.archives().prepare(generated_dir)?;

    let mut report = GenerationReport::default();
    for host in selected {
        info!(host = %host.name, "generating config");

        let result = build_bundle(host, registry.global_vars(), ctx.roles())
            .and_then(|archive| ctx.archives().write(&archive, &host.archive_path));

        match result {
            Ok(()) => report.generated.push(host.name.clone()),
            Err(error) => {
                warn!(host = %host.name, %error, "generation failed");
                report.failures.push(HostGenerationError { host: host.name.clone(), error });
            }
        }
    }

    Ok(report)
}
