//! Registry loading from the configuration directory.
//!
//! Layout:
//! - `roles/<role>/` (required)
//! - `hosts/<host>.yml|.yaml` (required)
//! - `scripts/<name>[.tpl]` (optional)

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::Settings;
use crate::domain::{AppError, HostConfig, Registry, ScriptConfig};

/// The fields of a host file the manager itself reads.
///
/// Everything else in the file is host variables and is passed through as-is.
#[derive(Debug, Default, Deserialize)]
struct HostFile {
    config_key: Option<String>,
    services: Option<serde_yaml::Mapping>,
    projects: Option<serde_yaml::Mapping>,
}

/// Build the read-only registry for this invocation.
pub fn load_registry(settings: &Settings) -> Result<Registry, AppError> {
    let mut registry = Registry::new().with_global_vars(settings.global_vars.clone());

    for role in load_roles(&settings.roles_dir())? {
        registry = registry.with_role(role);
    }

    let hosts = load_hosts(&settings.hosts_dir(), &settings.generated_dir, &registry)?;
    for host in hosts {
        registry = registry.with_host(host);
    }

    for script in load_scripts(&settings.scripts_dir())? {
        registry = registry.with_script(script);
    }

    Ok(registry)
}

fn sorted_dir_entries(dir: &Path, what: &str) -> Result<Vec<(String, PathBuf)>, AppError> {
    let read_dir = fs::read_dir(dir).map_err(|_| AppError::DirectoryMissing {
        what: what.to_string(),
        path: dir.display().to_string(),
    })?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        entries.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    entries.sort();
    Ok(entries)
}

fn load_roles(roles_dir: &Path) -> Result<Vec<String>, AppError> {
    Ok(sorted_dir_entries(roles_dir, "Roles")?
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .map(|(name, _)| name)
        .collect())
}

fn load_hosts(
    hosts_dir: &Path,
    generated_dir: &Path,
    registry: &Registry,
) -> Result<Vec<HostConfig>, AppError> {
    let mut hosts = Vec::new();
    let mut seen = BTreeSet::new();

    for (file_name, path) in sorted_dir_entries(hosts_dir, "Hosts")? {
        let Some(host_name) =
            file_name.strip_suffix(".yml").or_else(|| file_name.strip_suffix(".yaml"))
        else {
            continue;
        };
        if host_name.is_empty() || !path.is_file() {
            continue;
        }

        if !seen.insert(host_name.to_string()) {
            return Err(AppError::config_error(format!(
                "Host '{}' is declared by more than one file",
                host_name
            )));
        }

        let variables = fs::read(&path)?;
        let host = parse_host(host_name, &file_name, variables, generated_dir, registry)?;
        debug!(host = %host.name, services = host.service_names.len(), "loaded host");
        hosts.push(host);
    }

    Ok(hosts)
}

fn parse_host(
    host_name: &str,
    file_name: &str,
    variables: Vec<u8>,
    generated_dir: &Path,
    registry: &Registry,
) -> Result<HostConfig, AppError> {
    let parse_error = |details: String| AppError::ParseError {
        what: format!("host file {}", file_name),
        details,
    };

    let file: HostFile = if variables.iter().all(u8::is_ascii_whitespace) {
        HostFile::default()
    } else {
        serde_yaml::from_slice(&variables).map_err(|err| parse_error(err.to_string()))?
    };

    let key = file.config_key.filter(|key| !key.is_empty());
    let Some(key) = key else {
        return Err(AppError::MissingConfigKey(file_name.to_string()));
    };

    let mut services = Vec::new();
    for service in file.services.unwrap_or_default().keys() {
        let service = service
            .as_str()
            .ok_or_else(|| parse_error("service names must be strings".to_string()))?;
        if !registry.has_role(service) {
            return Err(AppError::UnknownService {
                host: host_name.to_string(),
                service: service.to_string(),
            });
        }
        services.push(service.to_string());
    }

    let has_projects = file.projects.is_some_and(|projects| !projects.is_empty());

    Ok(HostConfig::new(host_name, key, generated_dir)
        .with_services(services)
        .with_projects(has_projects)
        .with_variables(variables))
}

fn load_scripts(scripts_dir: &Path) -> Result<Vec<ScriptConfig>, AppError> {
    if !scripts_dir.is_dir() {
        return Ok(Vec::new());
    }

    Ok(sorted_dir_entries(scripts_dir, "Scripts")?
        .into_iter()
        .filter(|(_, path)| path.is_file())
        .map(|(file_name, path)| ScriptConfig::from_file_name(&file_name, path))
        .collect())
}
