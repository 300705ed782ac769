use minijinja::{AutoEscape, Environment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::services::{RepositoryServices, probe_services};
use crate::error::ToasterError;
use crate::github::{RawContent, RepositoryRef};
use crate::patch::read_content;

const WITH_SERVICES: &str = "services";
const WITHOUT_SERVICES: &str = "serviceless";

/// Template tree for a repository: `services/` when it needs any backing service.
pub fn template_variant(services: &RepositoryServices) -> &'static str {
    if services.any() {
        WITH_SERVICES
    } else {
        WITHOUT_SERVICES
    }
}

/// Render `{variant}/{template}` with the detected services as context.
pub fn render_template(
    templates_dir: &Path,
    template: &str,
    services: &RepositoryServices,
) -> Result<String, ToasterError> {
    let name = format!("{}/{template}", template_variant(services));
    let source_path = templates_dir.join(&name);
    let Some(source) = read_content(&source_path)? else {
        return Err(ToasterError::NotFound(format!(
            "template {}",
            source_path.display()
        )));
    };
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    Ok(env.render_named_str(&name, &source, services)?)
}

/// Render `template` into `destination/{template}`, creating parent directories.
pub fn write_template(
    templates_dir: &Path,
    template: &str,
    services: &RepositoryServices,
    destination: &Path,
) -> Result<PathBuf, ToasterError> {
    let content = render_template(templates_dir, template, services)?;
    let target = destination.join(template);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, content)?;
    info!(
        template,
        variant = template_variant(services),
        path = %target.display(),
        "template written"
    );
    Ok(target)
}

/// Probe the services of `repository` and write the matching `template` under `destination`.
pub async fn build_template(
    raw: &RawContent,
    templates_dir: &Path,
    repository: &RepositoryRef,
    branch: &str,
    template: &str,
    destination: &Path,
) -> Result<PathBuf, ToasterError> {
    let services = probe_services(raw, repository, branch).await?;
    write_template(templates_dir, template, &services, destination)
}
