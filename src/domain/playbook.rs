use serde::{Deserialize, Serialize};

use super::HostConfig;

/// Role every bundle starts with.
pub const BASELINE_ROLE: &str = "basic";
/// Role appended for hosts that declare projects.
pub const PROJECTS_ROLE: &str = "projects";

/// A single Ansible play applied locally on the pulling host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookSpec {
    pub hosts: String,
    pub connection: String,
    pub vars_files: Vec<String>,
    pub roles: Vec<String>,
}

impl PlaybookSpec {
    /// Local play with the baseline role, the host's services, then `projects`.
    pub fn for_host(host: &HostConfig) -> Self {
        let mut roles = Vec::with_capacity(host.service_names.len() + 2);
        roles.push(BASELINE_ROLE.to_string());
        roles.extend(host.service_names.iter().cloned());
        if host.has_projects {
            roles.push(PROJECTS_ROLE.to_string());
        }

        Self {
            hosts: "localhost".to_string(),
            connection: "local".to_string(),
            vars_files: Vec::new(),
            roles,
        }
    }

    pub fn add_vars_file(&mut self, name: impl Into<String>) {
        self.vars_files.push(name.into());
    }

    /// Serialize as the single-element list Ansible expects for a playbook.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&[self])
    }
}
