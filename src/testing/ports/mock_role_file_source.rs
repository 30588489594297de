use std::collections::BTreeMap;

use crate::domain::{AppError, RoleFileEntry};
use crate::ports::RoleFileSource;

/// In-memory role tree for testing.
///
/// Roles exist once a file or an empty role is registered for them.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockRoleFileSource {
    roles: BTreeMap<String, Vec<RoleFileEntry>>,
}

#[allow(dead_code)]
impl MockRoleFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file at `relative_path`; its first segment names the role.
    pub fn with_file(mut self, relative_path: &str, contents: &str, mode: u32) -> Self {
        let role = relative_path.split('/').next().unwrap_or(relative_path).to_string();
        self.roles.entry(role).or_default().push(RoleFileEntry {
            relative_path: relative_path.to_string(),
            contents: contents.as_bytes().to_vec(),
            mode,
        });
        self
    }

    pub fn with_empty_role(mut self, role: &str) -> Self {
        self.roles.entry(role.to_string()).or_default();
        self
    }
}

impl RoleFileSource for MockRoleFileSource {
    fn collect(&self, role: &str) -> Result<Vec<RoleFileEntry>, AppError> {
        let mut entries = self.roles.get(role).cloned().ok_or_else(|| AppError::RoleUnreadable {
            role: role.to_string(),
            path: format!("mock://{}", role),
            details: "role not registered".to_string(),
        })?;
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(entries)
    }
}
