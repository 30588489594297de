use std::collections::{BTreeMap, BTreeSet};

use super::{AppError, HostConfig, ScriptConfig};

/// Read-only collection of hosts, scripts and roles known to this invocation.
///
/// Maps are ordered so every listing and batch run walks hosts by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    hosts: BTreeMap<String, HostConfig>,
    scripts: BTreeMap<String, ScriptConfig>,
    roles: BTreeSet<String>,
    global_vars: Vec<u8>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: HostConfig) -> Self {
        self.hosts.insert(host.name.clone(), host);
        self
    }

    pub fn with_script(mut self, script: ScriptConfig) -> Self {
        self.scripts.insert(script.name.clone(), script);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_global_vars(mut self, global_vars: impl Into<Vec<u8>>) -> Self {
        self.global_vars = global_vars.into();
        self
    }

    pub fn host(&self, name: &str) -> Option<&HostConfig> {
        self.hosts.get(name)
    }

    pub fn script(&self, name: &str) -> Option<&ScriptConfig> {
        self.scripts.get(name)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }

    /// Hosts in name order.
    pub fn hosts(&self) -> impl Iterator<Item = &HostConfig> {
        self.hosts.values()
    }

    /// Scripts in name order.
    pub fn scripts(&self) -> impl Iterator<Item = &ScriptConfig> {
        self.scripts.values()
    }

    pub fn global_vars(&self) -> &[u8] {
        &self.global_vars
    }

    /// Resolve an optional host filter to hosts in name order.
    ///
    /// An empty filter selects every host. Unknown names are rejected before
    /// anything is selected.
    pub fn select_hosts(&self, filter: &[String]) -> Result<Vec<&HostConfig>, AppError> {
        if let Some(unknown) = filter.iter().find(|name| !self.hosts.contains_key(name.as_str())) {
            return Err(AppError::HostNotFound(unknown.clone()));
        }

        let wanted: BTreeSet<&str> = filter.iter().map(String::as_str).collect();
        Ok(self
            .hosts
            .values()
            .filter(|host| wanted.is_empty() || wanted.contains(host.name.as_str()))
            .collect())
    }
}
