mod archive_store;
mod role_file_source;
mod script_renderer;

pub use archive_store::ArchiveStore;
pub use role_file_source::RoleFileSource;
pub use script_renderer::ScriptRenderer;
