//! Shared testing utilities for ansible-config-manager integration tests.

use assert_cmd::Command;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const URL_PREFIX: &str = "http://cfg.example";

/// An isolated configuration directory with one host, `alpha`.
///
/// Layout:
/// - `config/ansible-config-manager.yaml`
/// - `config/roles/{basic,nginx,projects}`
/// - `config/hosts/alpha.yml` (key `secret123`, service `nginx`)
/// - `config/scripts/{bootstrap.sh.tpl,plain.sh}`
/// - `generated/` as the archive directory
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let ctx = Self { root };

        ctx.write_config(&format!(
            "url_prefix: {}/\ngenerated_config_dir_path: {}\nglobal_vars:\n  ntp_server: pool.ntp.org\n",
            URL_PREFIX,
            ctx.generated_dir().display()
        ));

        ctx.write_role_file("basic/tasks/main.yml", "- name: baseline\n  ping:\n", 0o644);
        ctx.write_role_file("nginx/tasks/main.yml", "- name: nginx\n  apt: name=nginx\n", 0o644);
        ctx.write_role_file("nginx/files/reload.sh", "#!/bin/sh\nnginx -s reload\n", 0o755);
        ctx.write_role_file("projects/tasks/main.yml", "- name: projects\n", 0o644);

        ctx.write_host("alpha", "config_key: secret123\nservices:\n  nginx: {}\n");

        ctx.write_script(
            "bootstrap.sh.tpl",
            "#!/bin/sh\n# {{ host.name }}\ncurl -sf {{ config_url }} | tar -x\n",
        );
        ctx.write_script("plain.sh", "#!/bin/sh\necho {{ untouched }}\n");

        fs::create_dir_all(ctx.generated_dir()).expect("Failed to create generated dir");
        ctx
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.root.path().join("generated")
    }

    pub fn archive_path(&self, host: &str) -> PathBuf {
        self.generated_dir().join(format!("{}.tar", host))
    }

    pub fn write_config(&self, yaml: &str) {
        let dir = self.config_dir();
        fs::create_dir_all(&dir).expect("Failed to create config dir");
        fs::write(dir.join("ansible-config-manager.yaml"), yaml).expect("Failed to write config");
    }

    pub fn write_host(&self, name: &str, yaml: &str) {
        let dir = self.config_dir().join("hosts");
        fs::create_dir_all(&dir).expect("Failed to create hosts dir");
        fs::write(dir.join(format!("{}.yml", name)), yaml).expect("Failed to write host file");
    }

    pub fn write_script(&self, name: &str, content: &str) {
        let dir = self.config_dir().join("scripts");
        fs::create_dir_all(&dir).expect("Failed to create scripts dir");
        fs::write(dir.join(name), content).expect("Failed to write script");
    }

    /// Write `roles/{rel_path}` with the given permission bits.
    pub fn write_role_file(&self, rel_path: &str, content: &str, mode: u32) {
        let path = self.config_dir().join("roles").join(rel_path);
        fs::create_dir_all(path.parent().expect("role file has a parent"))
            .expect("Failed to create role dir");
        fs::write(&path, content).expect("Failed to write role file");
        set_mode(&path, mode);
    }

    /// Build a command for the compiled binary pointed at this config dir.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("ansible-config-manager")
            .expect("Failed to locate ansible-config-manager binary");
        cmd.arg("--config-dir").arg(self.config_dir()).env_remove("RUST_LOG");
        cmd
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("Failed to set mode");
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}

/// One extracted tar member.
#[allow(dead_code)]
pub struct ArchiveMember {
    pub path: String,
    pub mode: u32,
    pub contents: Vec<u8>,
}

/// Read every member of the tar at `bytes`, in archive order.
#[allow(dead_code)]
pub fn read_archive(bytes: &[u8]) -> Vec<ArchiveMember> {
    let mut archive = tar::Archive::new(bytes);
    let mut members = Vec::new();
    for entry in archive.entries().expect("Failed to read tar entries") {
        let mut entry = entry.expect("Failed to read tar entry");
        let path = entry.path().expect("tar path").to_string_lossy().into_owned();
        let mode = entry.header().mode().expect("tar mode");
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).expect("Failed to read tar member");
        members.push(ArchiveMember { path, mode, contents });
    }
    members
}

#[allow(dead_code)]
pub fn member<'a>(members: &'a [ArchiveMember], path: &str) -> &'a ArchiveMember {
    members
        .iter()
        .find(|m| m.path == path)
        .unwrap_or_else(|| panic!("archive has no member {}", path))
}
