//! Bundle assembly.
//!
//! A bundle is flat at its root for synthesized files (variables, inventory,
//! playbook) and mirrors each role's own tree under `{role}/` for role files.

use crate::domain::bundle::{
    GLOBAL_VARS_FILE, HOST_VARS_FILE, INVENTORY, INVENTORY_FILE, PLAYBOOK_FILE,
};
use crate::domain::{AppError, BundleArchive, BundleEntry, HostConfig, PlaybookSpec};
use crate::ports::RoleFileSource;

/// Assemble the archive for `host`.
///
/// Role files are appended in playbook role order, each role's files in path
/// order. The first unreadable role aborts this host's bundle.
pub fn build_bundle<R: RoleFileSource>(
    host: &HostConfig,
    global_vars: &[u8],
    roles: &R,
) -> Result<BundleArchive, AppError> {
    let mut archive = BundleArchive::new();
    let mut playbook = PlaybookSpec::for_host(host);

    archive.push(BundleEntry::synthesized(HOST_VARS_FILE, host.variables.clone()));
    playbook.add_vars_file(HOST_VARS_FILE);

    if !global_vars.is_empty() {
        archive.push(BundleEntry::synthesized(GLOBAL_VARS_FILE, global_vars));
        playbook.add_vars_file(GLOBAL_VARS_FILE);
    }

    archive.push(BundleEntry::synthesized(INVENTORY_FILE, INVENTORY));
    archive.push(BundleEntry::synthesized(PLAYBOOK_FILE, playbook.to_yaml()?));

    for role in &playbook.roles {
        let files = roles.collect(role)?;
        archive.extend(files.into_iter().map(BundleEntry::from));
    }

    Ok(archive)
}
