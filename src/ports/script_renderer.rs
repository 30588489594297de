use crate::domain::{AppError, HostConfig};

/// Trait for rendering bootstrap script templates.
///
/// A template sees exactly two bindings: the requesting host and the
/// capability URL of its archive.
pub trait ScriptRenderer {
    /// Render `source` for `host`.
    ///
    /// # Arguments
    /// * `name` - Script name (for error reporting).
    /// * `source` - The template body.
    /// * `host` - The requesting host.
    /// * `config_url` - Capability URL of the host's `config.tar`.
    fn render(
        &self,
        name: &str,
        source: &str,
        host: &HostConfig,
        config_url: &str,
    ) -> Result<String, AppError>;
}
