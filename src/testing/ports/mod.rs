mod mock_role_file_source;
mod recording_archive_store;

pub use mock_role_file_source::MockRoleFileSource;
pub use recording_archive_store::RecordingArchiveStore;
