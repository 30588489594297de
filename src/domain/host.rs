use std::path::{Path, PathBuf};

use serde::Serialize;

/// Suffix marking a script as a template; stripped from the served name.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Archive file name for a host inside the generated directory.
pub fn archive_file_name(host_name: &str) -> String {
    format!("{}.tar", host_name)
}

/// Resolved configuration of a single host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Unique host name, also the first URL path segment.
    pub name: String,
    /// Secret embedded in the host's capability URLs.
    pub capability_key: String,
    /// Role names declared as services, in declared order.
    pub service_names: Vec<String>,
    /// Whether the fixed `projects` role is appended.
    pub has_projects: bool,
    /// Raw host file contents, shipped as `playbook_vars.yml`.
    pub variables: Vec<u8>,
    /// `{generated_dir}/{name}.tar`.
    pub archive_path: PathBuf,
}

impl HostConfig {
    pub fn new(
        name: impl Into<String>,
        capability_key: impl Into<String>,
        generated_dir: &Path,
    ) -> Self {
        let name = name.into();
        let archive_path = generated_dir.join(archive_file_name(&name));
        Self {
            name,
            capability_key: capability_key.into(),
            service_names: Vec::new(),
            has_projects: false,
            variables: Vec::new(),
            archive_path,
        }
    }

    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_names = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_projects(mut self, has_projects: bool) -> Self {
        self.has_projects = has_projects;
        self
    }

    pub fn with_variables(mut self, variables: impl Into<Vec<u8>>) -> Self {
        self.variables = variables.into();
        self
    }

    /// A host without a capability key can never be served.
    pub fn is_servable(&self) -> bool {
        !self.capability_key.is_empty()
    }

    /// The read-only view of this host handed to script templates.
    pub fn template_view(&self) -> HostView<'_> {
        HostView {
            name: &self.name,
            key: &self.capability_key,
            service_names: &self.service_names,
            has_projects: self.has_projects,
        }
    }
}

/// Host fields exposed to script templates.
///
/// Excludes host variables and on-disk paths.
#[derive(Debug, Serialize)]
pub struct HostView<'a> {
    pub name: &'a str,
    pub key: &'a str,
    pub service_names: &'a [String],
    pub has_projects: bool,
}

/// A bootstrap script served next to the host archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Externally visible name (template suffix stripped).
    pub name: String,
    pub source_path: PathBuf,
    pub is_template: bool,
}

impl ScriptConfig {
    /// Build a script entry from its file name inside the scripts directory.
    pub fn from_file_name(file_name: &str, source_path: PathBuf) -> Self {
        match file_name.strip_suffix(TEMPLATE_SUFFIX) {
            Some(stripped) if !stripped.is_empty() => {
                Self { name: stripped.to_string(), source_path, is_template: true }
            }
            _ => Self { name: file_name.to_string(), source_path, is_template: false },
        }
    }
}
