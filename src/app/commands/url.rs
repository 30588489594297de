//! Human-facing listing of capability URLs.

use std::fmt::Write;

use crate::domain::{AppError, CONFIG_ARCHIVE_NAME, Registry, capability_url};

/// Render the URL listing for `hosts`, or every host when empty.
///
/// Hosts and scripts appear in name order; host blocks are separated by a
/// blank line.
pub fn listing(registry: &Registry, url_prefix: &str, hosts: &[String]) -> Result<String, AppError> {
    let mut out = String::new();

    for (index, host) in registry.select_hosts(hosts)?.into_iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }

        let url = |file: &str| capability_url(url_prefix, &host.name, &host.capability_key, file);

        let _ = writeln!(out, "{}", host.name);
        let _ = writeln!(out, "config: {}", url(CONFIG_ARCHIVE_NAME));
        for script in registry.scripts() {
            let _ = writeln!(out, "script {}: curl -o- {} | bash", script.name, url(&script.name));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HostConfig, ScriptConfig};
    use std::path::{Path, PathBuf};

    fn registry() -> Registry {
        let gen_dir = Path::new("/gen");
        Registry::new()
            .with_host(HostConfig::new("beta", "k2", gen_dir))
            .with_host(HostConfig::new("alpha", "secret123", gen_dir))
            .with_script(ScriptConfig::from_file_name("z.sh", PathBuf::from("/s/z.sh")))
            .with_script(ScriptConfig::from_file_name("bootstrap.sh.tpl", PathBuf::from("/s/b")))
    }

    #[test]
    fn lists_all_hosts_in_order() {
        let out = listing(&registry(), "http://cfg.example", &[]).unwrap();
        assert_eq!(
            out,
            "alpha\n\
             config: http://cfg.example/alpha/secret123/config.tar\n\
             script bootstrap.sh: curl -o- http://cfg.example/alpha/secret123/bootstrap.sh | bash\n\
             script z.sh: curl -o- http://cfg.example/alpha/secret123/z.sh | bash\n\
             \n\
             beta\n\
             config: http://cfg.example/beta/k2/config.tar\n\
             script bootstrap.sh: curl -o- http://cfg.example/beta/k2/bootstrap.sh | bash\n\
             script z.sh: curl -o- http://cfg.example/beta/k2/z.sh | bash\n"
        );
    }

    #[test]
    fn filter_selects_hosts() {
        let out = listing(&registry(), "http://cfg.example", &["beta".to_string()]).unwrap();
        assert!(out.starts_with("beta\n"));
        assert!(!out.contains("alpha"));
    }

    #[test]
    fn unknown_host_is_an_error() {
        assert!(listing(&registry(), "http://cfg.example", &["ghost".to_string()]).is_err());
    }
}
