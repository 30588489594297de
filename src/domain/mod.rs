pub mod bundle;
pub mod capability;
pub mod error;
pub mod host;
pub mod playbook;
pub mod registry;

pub use bundle::{BundleArchive, BundleEntry, DEFAULT_ENTRY_MODE, RoleFileEntry};
pub use capability::{CONFIG_ARCHIVE_NAME, CapabilityPath, capability_url, keys_match};
pub use error::AppError;
pub use host::{HostConfig, HostView, ScriptConfig, TEMPLATE_SUFFIX};
pub use playbook::PlaybookSpec;
pub use registry::Registry;
