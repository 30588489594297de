use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::{AppError, HostConfig};
use crate::ports::ScriptRenderer;

/// minijinja-backed script renderer.
///
/// No loader is registered, so templates cannot include or import other
/// files. Unknown variables fail the render.
pub struct MinijinjaScriptRenderer {
    env: Environment<'static>,
}

impl MinijinjaScriptRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        Self { env }
    }
}

impl Default for MinijinjaScriptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRenderer for MinijinjaScriptRenderer {
    fn render(
        &self,
        name: &str,
        source: &str,
        host: &HostConfig,
        config_url: &str,
    ) -> Result<String, AppError> {
        let ctx = context! {
            host => host.template_view(),
            config_url => config_url,
        };

        self.env.render_named_str(name, source, ctx).map_err(|err| AppError::TemplateRender {
            template: name.to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn host() -> HostConfig {
        HostConfig::new("alpha", "secret123", Path::new("/gen"))
            .with_services(["nginx", "db"])
            .with_variables("secret_password: hunter2\n")
    }

    fn render(source: &str) -> Result<String, AppError> {
        MinijinjaScriptRenderer::new().render(
            "bootstrap.sh",
            source,
            &host(),
            "http://cfg.example/alpha/secret123/config.tar",
        )
    }

    #[test]
    fn url_only_template_renders_url() {
        assert_eq!(
            render("{{ config_url }}").unwrap(),
            "http://cfg.example/alpha/secret123/config.tar"
        );
    }

    #[test]
    fn host_fields_are_exposed() {
        let out = render(
            "#!/bin/bash\n# {{ host.name }}\n{% for s in host.service_names %}{{ s }} {% endfor %}\n",
        )
        .unwrap();
        assert_eq!(out, "#!/bin/bash\n# alpha\nnginx db \n");
    }

    #[test]
    fn trailing_newline_is_kept() {
        assert_eq!(render("curl -o config.tar {{ config_url }}\n").unwrap().chars().last(), Some('\n'));
    }

    #[test]
    fn variables_and_paths_are_not_exposed() {
        assert!(render("{{ host.variables }}").is_err());
        assert!(render("{{ host.archive_path }}").is_err());
    }

    #[test]
    fn unknown_binding_fails() {
        let err = render("{{ config_ur }}").unwrap_err();
        assert!(matches!(err, AppError::TemplateRender { template, .. } if template == "bootstrap.sh"));
    }

    #[test]
    fn syntax_error_fails() {
        assert!(render("{% if %}").is_err());
    }

    #[test]
    fn include_has_no_loader() {
        assert!(render("{% include 'other.sh' %}").is_err());
    }
}
