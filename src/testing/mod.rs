pub mod ports;

#[allow(unused_imports)]
pub use ports::MockRoleFileSource;
#[allow(unused_imports)]
pub use ports::RecordingArchiveStore;
