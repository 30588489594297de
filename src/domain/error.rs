use std::io;

use thiserror::Error;

/// Library-wide error type for ansible-config-manager operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Main configuration file is missing.
    #[error("Config file {0} doesn't exist")]
    ConfigFileMissing(String),

    /// A required configuration directory is missing.
    #[error("{what} directory {path} doesn't exist")]
    DirectoryMissing { what: String, path: String },

    /// Parse error.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// Host file declares no capability key.
    #[error("Host file {0} doesn't have the config_key set")]
    MissingConfigKey(String),

    /// Host declares a service that has no role directory.
    #[error("Role for service '{service}' on host '{host}' doesn't exist")]
    UnknownService { host: String, service: String },

    /// Host name given on the command line is not in the registry.
    #[error("Host '{0}' does not exist")]
    HostNotFound(String),

    /// A role directory or one of its files could not be read.
    #[error("Role '{role}' is unreadable at {path}: {details}")]
    RoleUnreadable { role: String, path: String, details: String },

    /// Script template failed to parse or render.
    #[error("Failed to render template '{template}': {reason}")]
    TemplateRender { template: String, reason: String },

    /// HTTP listener could not be started.
    #[error("Server error: {0}")]
    Server(String),

    /// At least one host failed during batch generation.
    #[error("Generation failed for {failed} of {total} host(s)")]
    GenerationFailed { failed: usize, total: usize },

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}
