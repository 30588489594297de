//! ansible-config-manager: per-host Ansible bundles behind capability URLs.
//!
//! `generate` turns each host's declared services into a tar bundle of role
//! files, variables and a local playbook. `serve` hands those bundles, and
//! bootstrap scripts rendered for the requesting host, to anyone presenting
//! the host's capability URL `{prefix}/{host}/{key}/{file}`.

pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    BoundServer, GenerationReport, HostGenerationError, SettingsOverrides, bind, generate, serve,
    urls,
};
pub use domain::{AppError, CONFIG_ARCHIVE_NAME, capability_url};
