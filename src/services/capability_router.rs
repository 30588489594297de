//! Capability-addressed request dispatch.
//!
//! Unknown hosts, wrong keys and unknown files all produce the same `404`
//! so a client cannot tell which hosts exist.

use std::fmt;
use std::fs::{self, File};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CONFIG_ARCHIVE_NAME, CapabilityPath, Registry, capability_url, keys_match};
use crate::ports::{ArchiveStore, ScriptRenderer};

pub const READ_CONFIG_FAILED: &str = "Error reading config";
pub const READ_SCRIPT_FAILED: &str = "Error reading script";
pub const RENDER_SCRIPT_FAILED: &str = "Error rendering script template";

/// Outcome of routing one request.
pub enum Reply {
    /// The host's archive, opened for streaming.
    Archive(File),
    /// A raw or rendered script.
    Script(Vec<u8>),
    NotFound,
    /// Server-side failure with a fixed, path-free message.
    InternalError(&'static str),
}

impl Reply {
    pub fn status_code(&self) -> u16 {
        match self {
            Reply::Archive(_) | Reply::Script(_) => 200,
            Reply::NotFound => 404,
            Reply::InternalError(_) => 500,
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Archive(_) => f.write_str("Archive"),
            Reply::Script(body) => write!(f, "Script({} bytes)", body.len()),
            Reply::NotFound => f.write_str("NotFound"),
            Reply::InternalError(message) => write!(f, "InternalError({message})"),
        }
    }
}

/// Routes capability requests against an immutable registry.
pub struct CapabilityRouter<S: ArchiveStore, T: ScriptRenderer> {
    registry: Arc<Registry>,
    url_prefix: String,
    archives: S,
    renderer: T,
}

impl<S: ArchiveStore, T: ScriptRenderer> CapabilityRouter<S, T> {
    pub fn new(registry: Arc<Registry>, url_prefix: impl Into<String>, archives: S, renderer: T) -> Self {
        Self { registry, url_prefix: url_prefix.into(), archives, renderer }
    }

    /// Dispatch a request target such as `/alpha/secret123/config.tar`.
    pub fn route(&self, target: &str) -> Reply {
        let Some(path) = CapabilityPath::parse(target) else {
            debug!("rejecting malformed capability path");
            return Reply::NotFound;
        };

        let Some(host) = self.registry.host(path.host) else {
            return Reply::NotFound;
        };

        if !host.is_servable() || !keys_match(path.key, &host.capability_key) {
            return Reply::NotFound;
        }

        if path.file == CONFIG_ARCHIVE_NAME {
            return match self.archives.open(&host.archive_path) {
                Ok(file) => {
                    debug!(host = %host.name, "serving archive");
                    Reply::Archive(file)
                }
                Err(err) => {
                    warn!(host = %host.name, path = %host.archive_path.display(), error = %err, "failed to open archive");
                    Reply::InternalError(READ_CONFIG_FAILED)
                }
            };
        }

        let Some(script) = self.registry.script(path.file) else {
            return Reply::NotFound;
        };

        let source = match fs::read(&script.source_path) {
            Ok(source) => source,
            Err(err) => {
                warn!(script = %script.name, path = %script.source_path.display(), error = %err, "failed to read script");
                return Reply::InternalError(READ_SCRIPT_FAILED);
            }
        };

        if !script.is_template {
            debug!(host = %host.name, script = %script.name, "serving script");
            return Reply::Script(source);
        }

        let source = match String::from_utf8(source) {
            Ok(source) => source,
            Err(err) => {
                warn!(script = %script.name, error = %err, "script template is not valid UTF-8");
                return Reply::InternalError(RENDER_SCRIPT_FAILED);
            }
        };

        let config_url = capability_url(
            &self.url_prefix,
            &host.name,
            &host.capability_key,
            CONFIG_ARCHIVE_NAME,
        );

        match self.renderer.render(&script.name, &source, host, &config_url) {
            Ok(rendered) => {
                debug!(host = %host.name, script = %script.name, "serving rendered script");
                Reply::Script(rendered.into_bytes())
            }
            Err(err) => {
                warn!(host = %host.name, script = %script.name, error = %err, "failed to render script");
                Reply::InternalError(RENDER_SCRIPT_FAILED)
            }
        }
    }
}
