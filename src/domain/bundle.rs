/// Mode for synthesized entries that carry no source permissions.
pub const DEFAULT_ENTRY_MODE: u32 = 0o600;

pub const HOST_VARS_FILE: &str = "playbook_vars.yml";
pub const GLOBAL_VARS_FILE: &str = "global_vars.yml";
pub const INVENTORY_FILE: &str = "hosts.ini";
pub const PLAYBOOK_FILE: &str = "playbook.yml";

/// Static inventory: one local target with a quiet interpreter lookup.
pub const INVENTORY: &str = "localhost ansible_python_interpreter=auto_silent\n";

/// A file found under a role directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFileEntry {
    /// Path relative to the roles root, starting with the role name.
    pub relative_path: String,
    pub contents: Vec<u8>,
    pub mode: u32,
}

/// One named entry of a bundle archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub path: String,
    pub contents: Vec<u8>,
    /// Explicit permission bits; `None` falls back to [`DEFAULT_ENTRY_MODE`].
    pub mode: Option<u32>,
}

impl BundleEntry {
    pub fn synthesized(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self { path: path.into(), contents: contents.into(), mode: None }
    }

    pub fn effective_mode(&self) -> u32 {
        self.mode.unwrap_or(DEFAULT_ENTRY_MODE)
    }
}

impl From<RoleFileEntry> for BundleEntry {
    fn from(entry: RoleFileEntry) -> Self {
        Self { path: entry.relative_path, contents: entry.contents, mode: Some(entry.mode) }
    }
}

/// Ordered entries making up a host's bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleArchive {
    entries: Vec<BundleEntry>,
}

impl BundleArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: BundleEntry) {
        self.entries.push(entry);
    }

    pub fn extend<I: IntoIterator<Item = BundleEntry>>(&mut self, entries: I) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn entry(&self, path: &str) -> Option<&BundleEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.path.as_str()).collect()
    }
}
