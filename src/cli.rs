use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::error::{ScriptError, ToasterError};
use crate::github::{GithubClient, HostingApi, RawContent, RepositoryRef, build_http_client};
use crate::patch::list_local_repository_names;
use crate::repository::{LocalRepository, clone_all};
use crate::scripts::{ci_migration, resolver_audit, services, templates, test_patcher};

#[derive(Debug, Parser)]
#[command(
    name = "toaster",
    version,
    about = "Bulk maintenance scripts for the repositories of a GitHub organization"
)]
pub struct Cli {
    /// TOML configuration file; `toaster.toml` is used when present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Migrate checkouts from Travis CI to GitHub Actions.
    #[command(name = "ci-migrate")]
    CiMigrate(CiMigrateArgs),
    /// Detect the services a repository's tests start.
    Services(ServicesArgs),
    /// Render a workflow template matching a repository's services.
    #[command(name = "build-template")]
    BuildTemplate(BuildTemplateArgs),
    /// Install every module with pip and report resolver errors.
    #[command(name = "resolver-audit")]
    ResolverAudit,
    /// Replace `python setup.py test` with `python -m pytest` in cached clones.
    #[command(name = "test-patch")]
    TestPatch(TestPatchArgs),
    /// List the organization's repositories.
    #[command(name = "list-repos")]
    ListRepos(ModulesArgs),
    /// Clone the organization's repositories into the cache.
    Clone(ModulesArgs),
    /// Create an empty repository in the organization.
    #[command(name = "create-repo")]
    CreateRepo {
        name: String,
    },
    /// Point the remote of a cached clone at another URL.
    #[command(name = "set-origin")]
    SetOrigin {
        name: String,
        url: String,
    },
}

#[derive(Debug, Args)]
pub struct CiMigrateArgs {
    /// Target repo directory path.
    #[arg(long, value_name = "PATH", conflicts_with = "repository")]
    pub targetpath: Option<PathBuf>,
    /// Clone this repository into the cache and migrate it on a new branch.
    #[arg(long, value_name = "NAME")]
    pub repository: Option<String>,
    /// Commit, push and open a pull request after migrating `--repository`.
    #[arg(long, requires = "repository")]
    pub publish: bool,
}

#[derive(Debug, Args)]
pub struct ServicesArgs {
    pub name: String,
    #[arg(long, default_value = "master")]
    pub branch: String,
}

#[derive(Debug, Args)]
pub struct BuildTemplateArgs {
    pub name: String,
    /// Template path relative to the `services/` and `serviceless/` trees.
    pub template: String,
    /// Checkout the rendered file is written into.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub path: PathBuf,
    #[arg(long, default_value = "master")]
    pub branch: String,
}

#[derive(Debug, Args)]
pub struct TestPatchArgs {
    /// Only consider this cached clone.
    #[arg(long, value_name = "NAME")]
    pub repository: Option<String>,
}

#[derive(Debug, Args)]
pub struct ModulesArgs {
    /// Only repositories whose name carries the module prefix.
    #[arg(long)]
    pub modules: bool,
}

async fn repository_names(
    cfg: &Config,
    hosting: &dyn HostingApi,
    modules_only: bool,
) -> Result<Vec<String>, ToasterError> {
    let organization = &cfg.github.organization;
    if modules_only {
        hosting
            .list_modules(organization, &cfg.github.module_prefix)
            .await
    } else {
        hosting.list_organization_repositories(organization).await
    }
}

/// Run one subcommand against an already loaded configuration.
pub async fn execute(command: Command, cfg: &Config) -> Result<(), ScriptError> {
    let http = build_http_client(&cfg.github)?;
    let github = GithubClient::new(&cfg.github, http.clone());

    match command {
        Command::CiMigrate(args) => {
            if let Some(name) = args.repository.as_deref() {
                let pr = ci_migration::migrate_repository(cfg, &http, &github, name, args.publish)
                    .await?;
                if let Some(pr) = pr {
                    println!("{}", pr.html_url);
                }
            } else if let Some(path) = args.targetpath.as_deref() {
                ci_migration::migrate_repo(&http, &cfg.migration, path).await?;
            } else {
                let reports =
                    ci_migration::migrate_all(&http, &cfg.migration, &cfg.migration.repo_paths)
                        .await?;
                info!(count = reports.len(), "migration finished");
            }
        }
        Command::Services(args) => {
            let raw = RawContent::new(http, cfg.github.raw_base_url.clone());
            let repository = RepositoryRef::new(cfg.github.organization.clone(), args.name);
            let found = services::probe_services(&raw, &repository, &args.branch).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&found).map_err(ToasterError::from)?
            );
        }
        Command::BuildTemplate(args) => {
            let raw = RawContent::new(http, cfg.github.raw_base_url.clone());
            let repository = RepositoryRef::new(cfg.github.organization.clone(), args.name);
            let written = templates::build_template(
                &raw,
                &cfg.migration.templates_dir,
                &repository,
                &args.branch,
                &args.template,
                &args.path,
            )
            .await?;
            println!("{}", written.display());
        }
        Command::ResolverAudit => {
            let modules = repository_names(cfg, &github, true).await?;
            if cfg.resolver_audit.download_locally {
                clone_all(&cfg.github, &modules, &cfg.basic.cache_path)?;
            }
            let report = resolver_audit::audit(&cfg.resolver_audit, &cfg.basic.cache_path, &modules)?;
            print!("{report}");
        }
        Command::TestPatch(args) => {
            let names = match args.repository {
                Some(name) => vec![name],
                None => list_local_repository_names(&cfg.basic.cache_path)?,
            };
            test_patcher::run(
                cfg,
                &github,
                &names,
                &mut io::stdin().lock(),
                &mut io::stdout().lock(),
            )
            .await?;
        }
        Command::ListRepos(args) => {
            for name in repository_names(cfg, &github, args.modules).await? {
                println!("{name}");
            }
        }
        Command::Clone(args) => {
            let names = repository_names(cfg, &github, args.modules).await?;
            let cloned = clone_all(&cfg.github, &names, &cfg.basic.cache_path)?;
            info!(count = cloned.len(), cache = %cfg.basic.cache_path.display(), "cloned");
        }
        Command::CreateRepo { name } => {
            let created = github
                .create_repository(&cfg.github.organization, &name)
                .await?;
            println!("{}", created.full_name);
        }
        Command::SetOrigin { name, url } => {
            let repo = LocalRepository::open(&cfg.basic.cache_path, &name)?;
            repo.set_origin(&cfg.github.remote, &url)?;
            info!(repository = %name, url = %url, "remote updated");
        }
    }
    Ok(())
}
