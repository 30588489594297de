use crate::domain::{AppError, RoleFileEntry};

/// Port for reading the files of a role.
pub trait RoleFileSource {
    /// Collect every file of `role`, ordered by relative path.
    ///
    /// Fails with [`AppError::RoleUnreadable`] if the role directory is missing
    /// or any file cannot be read.
    fn collect(&self, role: &str) -> Result<Vec<RoleFileEntry>, AppError>;
}
