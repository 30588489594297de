//! Main settings loading from `ansible-config-manager.yaml`.
//!
//! Precedence per field: explicit command-line flag, then the YAML value, then
//! the built-in default. Empty YAML strings and a zero port count as unset.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::domain::AppError;

pub const CONFIG_FILE_NAME: &str = "ansible-config-manager.yaml";
pub const DEFAULT_CONFIG_DIR: &str = "/etc/ansible-config-manager/";
pub const DEFAULT_GENERATED_DIR: &str = "/var/lib/ansible-config-manager/";
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 80;

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    listen: ListenFile,
    url_prefix: Option<String>,
    generated_config_dir_path: Option<String>,
    global_vars: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Default, Deserialize)]
struct ListenFile {
    host: Option<String>,
    port: Option<u16>,
    ssl_cert: Option<String>,
    ssl_key: Option<String>,
}

/// Values passed explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub ssl_cert: Option<PathBuf>,
    pub ssl_key: Option<PathBuf>,
    pub generated_config_dir: Option<PathBuf>,
    pub url_prefix: Option<String>,
}

/// Certificate and key paths for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenSettings {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
}

impl ListenSettings {
    /// `host:port`, bracketing IPv6 literals.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config_dir: PathBuf,
    pub listen: ListenSettings,
    /// Capability URL prefix without a trailing slash.
    pub url_prefix: String,
    pub generated_dir: PathBuf,
    /// Re-serialized `global_vars`; empty when absent or empty.
    pub global_vars: Vec<u8>,
}

impl Settings {
    pub fn roles_dir(&self) -> PathBuf {
        self.config_dir.join("roles")
    }

    pub fn hosts_dir(&self) -> PathBuf {
        self.config_dir.join("hosts")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.config_dir.join("scripts")
    }
}

/// Load `{config_dir}/ansible-config-manager.yaml` and merge `overrides`.
pub fn load_settings(config_dir: &Path, overrides: &SettingsOverrides) -> Result<Settings, AppError> {
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let content = fs::read_to_string(&config_path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            AppError::ConfigFileMissing(config_path.display().to_string())
        } else {
            AppError::Io(err)
        }
    })?;

    let file: SettingsFile = if content.trim().is_empty() {
        SettingsFile::default()
    } else {
        serde_yaml::from_str(&content).map_err(|err| AppError::ParseError {
            what: format!("config file {}", config_path.display()),
            details: err.to_string(),
        })?
    };

    resolve(config_dir, file, overrides)
}

fn resolve(
    config_dir: &Path,
    file: SettingsFile,
    overrides: &SettingsOverrides,
) -> Result<Settings, AppError> {
    let host = overrides
        .host
        .clone()
        .or(non_empty(file.listen.host))
        .unwrap_or_else(|| DEFAULT_LISTEN_HOST.to_string());
    let port = overrides
        .port
        .or(file.listen.port.filter(|port| *port != 0))
        .unwrap_or(DEFAULT_LISTEN_PORT);

    let ssl_cert = overrides.ssl_cert.clone().or(non_empty(file.listen.ssl_cert).map(PathBuf::from));
    let ssl_key = overrides.ssl_key.clone().or(non_empty(file.listen.ssl_key).map(PathBuf::from));
    let tls = match (ssl_cert, ssl_key) {
        (Some(cert), Some(key)) => Some(TlsPaths { cert, key }),
        (Some(_), None) => {
            return Err(AppError::config_error(
                "SSL certificate is defined, but the SSL key is not",
            ));
        }
        (None, Some(_)) => {
            return Err(AppError::config_error(
                "SSL key is defined, but the SSL certificate is not",
            ));
        }
        (None, None) => None,
    };

    let listen = ListenSettings { host, port, tls };

    let generated_dir = overrides
        .generated_config_dir
        .clone()
        .or(non_empty(file.generated_config_dir_path).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GENERATED_DIR));

    let url_prefix = determine_url_prefix(
        overrides.url_prefix.clone().or(non_empty(file.url_prefix)),
        &listen,
    )?;

    let global_vars = match file.global_vars {
        Some(vars) if !vars.is_empty() => serde_yaml::to_string(&vars)?.into_bytes(),
        _ => Vec::new(),
    };

    Ok(Settings {
        config_dir: config_dir.to_path_buf(),
        listen,
        url_prefix,
        generated_dir,
        global_vars,
    })
}

/// Use the configured prefix, or derive one from the listen address.
///
/// The port is omitted for plain HTTP on 80 and HTTPS on 443.
fn determine_url_prefix(
    configured: Option<String>,
    listen: &ListenSettings,
) -> Result<String, AppError> {
    let configured = configured.unwrap_or_default();
    let trimmed = configured.trim_end_matches('/');

    if !trimmed.is_empty() {
        Url::parse(trimmed).map_err(|err| {
            AppError::config_error(format!("Invalid url_prefix '{}': {}", trimmed, err))
        })?;
        return Ok(trimmed.to_string());
    }

    let ssl = listen.tls.is_some();
    let scheme = if ssl { "https" } else { "http" };
    let default_port = (listen.port == 80 && !ssl) || (listen.port == 443 && ssl);
    let port = if default_port { String::new() } else { format!(":{}", listen.port) };
    let host = if listen.host.contains(':') && !listen.host.starts_with('[') {
        format!("[{}]", listen.host)
    } else {
        listen.host.clone()
    };

    Ok(format!("{}://{}{}", scheme, host, port))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn load(yaml: &str, overrides: &SettingsOverrides) -> Result<Settings, AppError> {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), yaml).unwrap();
        load_settings(dir.path(), overrides)
    }

    #[test]
    fn defaults_apply_to_empty_file() {
        let settings = load("", &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.listen.host, "0.0.0.0");
        assert_eq!(settings.listen.port, 80);
        assert_eq!(settings.listen.tls, None);
        assert_eq!(settings.generated_dir, PathBuf::from(DEFAULT_GENERATED_DIR));
        assert_eq!(settings.url_prefix, "http://0.0.0.0");
        assert!(settings.global_vars.is_empty());
    }

    #[test]
    fn yaml_values_are_used() {
        let settings = load(
            "listen:\n  host: 10.0.0.5\n  port: 8080\nurl_prefix: http://cfg.example/\ngenerated_config_dir_path: /srv/gen\n",
            &SettingsOverrides::default(),
        )
        .unwrap();
        assert_eq!(settings.listen.address(), "10.0.0.5:8080");
        assert_eq!(settings.url_prefix, "http://cfg.example");
        assert_eq!(settings.generated_dir, PathBuf::from("/srv/gen"));
    }

    #[test]
    fn flags_win_over_yaml() {
        let overrides = SettingsOverrides {
            port: Some(9000),
            url_prefix: Some("https://flag.example".to_string()),
            ..SettingsOverrides::default()
        };
        let settings =
            load("listen:\n  port: 8080\nurl_prefix: http://yaml.example\n", &overrides).unwrap();
        assert_eq!(settings.listen.port, 9000);
        assert_eq!(settings.url_prefix, "https://flag.example");
    }

    #[test]
    fn derived_prefix_includes_non_default_port() {
        let settings = load("listen:\n  host: cfg.local\n  port: 8080\n", &SettingsOverrides::default())
            .unwrap();
        assert_eq!(settings.url_prefix, "http://cfg.local:8080");
    }

    #[test]
    fn derived_prefix_uses_https_with_tls() {
        let settings = load(
            "listen:\n  host: cfg.local\n  port: 443\n  ssl_cert: /c.pem\n  ssl_key: /k.pem\n",
            &SettingsOverrides::default(),
        )
        .unwrap();
        assert_eq!(settings.url_prefix, "https://cfg.local");
        assert!(settings.listen.tls.is_some());
    }

    #[test]
    fn cert_without_key_is_rejected() {
        let err = load("listen:\n  ssl_cert: /c.pem\n", &SettingsOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("SSL key is not"));
    }

    #[test]
    fn key_without_cert_is_rejected() {
        let overrides =
            SettingsOverrides { ssl_key: Some(PathBuf::from("/k.pem")), ..Default::default() };
        assert!(load("", &overrides).is_err());
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        assert!(load("url_prefix: not a url\n", &SettingsOverrides::default()).is_err());
    }

    #[test]
    fn global_vars_are_reserialized() {
        let settings =
            load("global_vars:\n  ntp: pool.ntp.org\n", &SettingsOverrides::default()).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_slice(&settings.global_vars).unwrap();
        assert_eq!(parsed["ntp"], "pool.ntp.org");
    }

    #[test]
    fn empty_global_vars_stay_empty() {
        let settings = load("global_vars: {}\n", &SettingsOverrides::default()).unwrap();
        assert!(settings.global_vars.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = load_settings(dir.path(), &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, AppError::ConfigFileMissing(_)));
    }

    #[test]
    fn ipv6_listen_address_is_bracketed() {
        let listen = ListenSettings { host: "::1".to_string(), port: 8080, tls: None };
        assert_eq!(listen.address(), "[::1]:8080");
    }
}
