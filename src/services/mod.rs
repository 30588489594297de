pub mod bundle_builder;
pub mod capability_router;
pub mod http_server;
mod role_files_filesystem;
mod script_renderer_minijinja;
mod tar_archive_store;

pub use bundle_builder::build_bundle;
pub use capability_router::{CapabilityRouter, Reply};
pub use http_server::{HEADER_READ_TIMEOUT, HttpServer, ShutdownHandle, TlsMaterial};
pub use role_files_filesystem::FilesystemRoleFileSource;
pub use script_renderer_minijinja::MinijinjaScriptRenderer;
pub use tar_archive_store::TarArchiveStore;
