use async_trait::async_trait;
use axum::{Router, http::StatusCode, routing::get};
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;
use tokio::net::TcpListener;
use toaster::config::{Config, MigrationConfig};
use toaster::error::ToasterError;
use toaster::github::{HostingApi, RawContent, RepositoryRef};
use toaster::patch::download_file;
use toaster::scripts::ci_migration::{migrate_repo, migrate_repository};
use toaster::scripts::services::{RepositoryServices, probe_services};
use toaster::scripts::templates::build_template;
use toaster_schema::{CreatePullRequest, GithubRepository, PullRequest};
use url::Url;

async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{}", addr)).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

async fn template_server() -> Url {
    let app = Router::new()
        .route("/templates/tests.yml", get(|| async { "name: CI\n" }))
        .route("/templates/pypi-release.yml", get(|| async { "name: Publish\n" }))
        .route(
            "/templates/gone.yml",
            get(|| async { (StatusCode::NOT_FOUND, "404: Not Found") }),
        )
        .route(
            "/inveniosoftware/invenio-legacy/master/.travis.yml",
            get(|| async { "services:\n  - postgresql\n  - redis\n" }),
        )
        .route(
            "/inveniosoftware/invenio-i18n/master/run-tests.sh",
            get(|| async {
                "eval \"$(docker-services-cli up --db ${DB:-postgresql} --search ${SEARCH:-opensearch} --mq ${MQ:-rabbitmq} --env)\"\n"
            }),
        );
    spawn_test_server(app).await
}

fn migration_config(base: &Url) -> MigrationConfig {
    MigrationConfig {
        tests_yaml_url: base.join("/templates/tests.yml").unwrap(),
        pypi_publish_yaml_url: base.join("/templates/pypi-release.yml").unwrap(),
        ..MigrationConfig::default()
    }
}

const TRAVIS: &str = "language: python\ndeploy:\n  provider: pypi\n  user: inveniosoftware\n";
const README: &str = ".. image:: https://img.shields.io/travis/inveniosoftware/invenio-formatter.svg\n        :target: https://travis-ci.org/inveniosoftware/invenio-formatter\n";
const RUN_TESTS: &str = "pydocstyle invenio_i18n tests docs && \\\nisort invenio_i18n tests --check-only --diff && \\\ncheck-manifest --ignore \".travis-*\" && \\\npython -m pytest\n";
const SETUP_PY: &str = "tests_require = [\n    'check-manifest>=0.25',\n    'coverage>=4.0',\n    'pytest-invenio>=1.4.0',\n    'Babel>=2.8',\n]\n\nsetup(tests_require=tests_require)\n";

fn write_fixture(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join(".travis.yml"), TRAVIS).unwrap();
    fs::write(
        root.join(".editorconfig"),
        "[*.{py,rst}]\nindent_style = space\n\n[.travis.yml]\nindent_size = 2\n",
    )
    .unwrap();
    fs::write(root.join("README.rst"), README).unwrap();
    fs::write(
        root.join("CONTRIBUTING.rst"),
        "Check https://travis-ci.com/inveniosoftware/invenio-formatter/pull_requests\n",
    )
    .unwrap();
    fs::write(root.join("run-tests.sh"), RUN_TESTS).unwrap();
    fs::write(
        root.join("pytest.ini"),
        "[pytest]\npep8ignore = docs/conf.py ALL\naddopts = --pep8 --cov=invenio_i18n\n",
    )
    .unwrap();
    fs::write(root.join("MANIFEST.in"), "include *.rst\n").unwrap();
    fs::write(root.join("setup.py"), SETUP_PY).unwrap();
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap_or_else(|e| panic!("{file}: {e}"))
}

fn assert_migrated(root: &Path) {
    assert_eq!(read(root, ".github/workflows/tests.yml"), "name: CI\n");
    assert_eq!(read(root, ".github/workflows/pypi-publish.yml"), "name: Publish\n");
    assert!(!root.join(".travis.yml").exists());
    assert!(read(root, ".editorconfig").contains("[.github/workflows/*.yml]\n"));
    assert_eq!(
        read(root, "README.rst"),
        ".. image:: https://github.com/inveniosoftware/invenio-formatter/workflows/CI/badge.svg\n        :target: https://github.com/inveniosoftware/invenio-formatter/actions?query=workflow%3ACI\n"
    );
    assert_eq!(
        read(root, "CONTRIBUTING.rst"),
        "Check https://github.com/inveniosoftware/invenio-formatter/actions?query=event%3Apull_request\n"
    );
    assert_eq!(
        read(root, "run-tests.sh"),
        "pydocstyle invenio_i18n tests docs && \\\ncheck-manifest --ignore \".*-requirements.txt\" && \\\npython -m pytest\n"
    );
    assert_eq!(
        read(root, "pytest.ini"),
        "[pytest]\naddopts = --isort --pydocstyle --pycodestyle --doctest-glob=\"*.rst\" --doctest-modules --cov=invenio_i18n --cov-report=term-missing\ntestpaths = tests invenio_i18n\n"
    );
    assert_eq!(
        read(root, "MANIFEST.in"),
        "include *.rst\nrecursive-include .github/workflows *.yml"
    );
    assert_eq!(
        read(root, "setup.py"),
        "tests_require = [\n    \"pytest-invenio>=1.4.0\",\n    \"Babel>=2.8\"\n]\n\nsetup(tests_require=tests_require)\n"
    );
}

#[tokio::test]
async fn download_creates_missing_parent_directories() {
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let destination = dir.path().join("a/.github/workflows/tests.yml");

    let written = download_file(
        &reqwest::Client::new(),
        &base.join("/templates/tests.yml").unwrap(),
        &destination,
    )
    .await
    .expect("download");

    assert_eq!(written, "name: CI\n".len());
    assert_eq!(fs::read_to_string(&destination).unwrap(), "name: CI\n");
}

#[tokio::test]
async fn download_writes_error_bodies_as_is() {
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let destination = dir.path().join("gone.yml");

    download_file(
        &reqwest::Client::new(),
        &base.join("/templates/gone.yml").unwrap(),
        &destination,
    )
    .await
    .expect("status is not checked");

    assert_eq!(fs::read_to_string(&destination).unwrap(), "404: Not Found");
}

#[tokio::test]
async fn migration_rewrites_a_travis_checkout() {
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("invenio-i18n");
    write_fixture(&root);

    let report = migrate_repo(&reqwest::Client::new(), &migration_config(&base), &root)
        .await
        .expect("migration");

    assert_eq!(report.repository, "invenio-i18n");
    assert!(report.pypi_publish);
    // .travis.yml plus five backups
    assert_eq!(report.deleted_files, 6);
    assert_migrated(&root);
    let leftovers: Vec<_> = glob::glob(&format!("{}/*.bak", root.display()))
        .unwrap()
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn migration_without_pypi_deploy_skips_publish_workflow() {
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("invenio-theme");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join(".travis.yml"), "language: python\n").unwrap();
    fs::write(root.join("pytest.ini"), "[pytest]\naddopts = --pep8\ntestpaths = tests\n").unwrap();

    let report = migrate_repo(&reqwest::Client::new(), &migration_config(&base), &root)
        .await
        .expect("missing files are skipped");

    assert!(!report.pypi_publish);
    assert!(!root.join(".github/workflows/pypi-publish.yml").exists());
    assert_eq!(read(&root, ".github/workflows/tests.yml"), "name: CI\n");
    assert_eq!(
        read(&root, "pytest.ini"),
        "[pytest]\naddopts = --isort --pydocstyle --pycodestyle --doctest-glob=\"*.rst\" --doctest-modules --cov=invenio_theme --cov-report=term-missing\ntestpaths = tests\n"
    );
}

#[tokio::test]
async fn parent_reference_targetpath_uses_the_resolved_name() {
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("invenio-i18n");
    write_fixture(&root);
    fs::create_dir_all(root.join("docs")).unwrap();

    let report = migrate_repo(
        &reqwest::Client::new(),
        &migration_config(&base),
        &root.join("docs").join(".."),
    )
    .await
    .expect("migration");

    assert_eq!(report.repository, "invenio-i18n");
    assert_migrated(&root);
}

#[tokio::test]
async fn unnamed_targetpath_is_rejected_before_patching() {
    let base = template_server().await;
    let err = migrate_repo(
        &reqwest::Client::new(),
        &migration_config(&base),
        Path::new("/"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ToasterError::PreconditionFailed(_)));
}

#[tokio::test]
async fn appended_lines_start_on_a_fresh_line() {
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("invenio-theme");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("pytest.ini"), "[pytest]\naddopts = --pep8").unwrap();
    fs::write(root.join("MANIFEST.in"), "include *.rst").unwrap();

    migrate_repo(&reqwest::Client::new(), &migration_config(&base), &root)
        .await
        .expect("migration");

    assert_eq!(
        read(&root, "pytest.ini"),
        "[pytest]\naddopts = --isort --pydocstyle --pycodestyle --doctest-glob=\"*.rst\" --doctest-modules --cov=invenio_theme --cov-report=term-missing\ntestpaths = tests invenio_theme\n"
    );
    assert_eq!(
        read(&root, "MANIFEST.in"),
        "include *.rst\nrecursive-include .github/workflows *.yml"
    );
}

#[tokio::test]
async fn raw_file_exists_follows_the_status() {
    let base = template_server().await;
    let raw = RawContent::new(reqwest::Client::new(), base.clone());
    assert!(raw.file_exists(&base.join("/templates/tests.yml").unwrap()).await.unwrap());
    assert!(!raw.file_exists(&base.join("/templates/gone.yml").unwrap()).await.unwrap());
}

const SERVICES_TEMPLATE: &str = "services:\n{% if db %}  db: postgresql\n{% endif %}{% if cache %}  cache: redis\n{% endif %}{% if search %}  search: opensearch\n{% endif %}";

fn write_templates(root: &Path) {
    let services = root.join("services/.github/workflows");
    let serviceless = root.join("serviceless/.github/workflows");
    fs::create_dir_all(&services).unwrap();
    fs::create_dir_all(&serviceless).unwrap();
    fs::write(services.join("tests.yml"), SERVICES_TEMPLATE).unwrap();
    fs::write(serviceless.join("tests.yml"), "name: CI").unwrap();
}

#[tokio::test]
async fn template_with_services_renders_detected_services() {
    let base = template_server().await;
    let raw = RawContent::new(reqwest::Client::new(), base);
    let templates = tempfile::tempdir().expect("tempdir");
    write_templates(templates.path());
    let checkout = tempfile::tempdir().expect("tempdir");

    let written = build_template(
        &raw,
        templates.path(),
        &RepositoryRef::new("inveniosoftware", "invenio-legacy"),
        "master",
        ".github/workflows/tests.yml",
        checkout.path(),
    )
    .await
    .expect("build template");

    assert_eq!(written, checkout.path().join(".github/workflows/tests.yml"));
    assert_eq!(
        fs::read_to_string(&written).unwrap(),
        "services:\n  db: postgresql\n  cache: redis\n"
    );
}

#[tokio::test]
async fn template_without_services_uses_the_serviceless_tree() {
    let base = template_server().await;
    let raw = RawContent::new(reqwest::Client::new(), base);
    let templates = tempfile::tempdir().expect("tempdir");
    write_templates(templates.path());
    let checkout = tempfile::tempdir().expect("tempdir");

    let written = build_template(
        &raw,
        templates.path(),
        &RepositoryRef::new("inveniosoftware", "invenio-nothing"),
        "master",
        ".github/workflows/tests.yml",
        checkout.path(),
    )
    .await
    .expect("build template");

    assert_eq!(fs::read_to_string(&written).unwrap(), "name: CI");
}

#[tokio::test]
async fn services_come_from_travis_or_run_tests() {
    let base = template_server().await;
    let raw = RawContent::new(reqwest::Client::new(), base);

    let legacy = probe_services(
        &raw,
        &RepositoryRef::new("inveniosoftware", "invenio-legacy"),
        "master",
    )
    .await
    .expect("probe");
    assert_eq!(
        legacy,
        RepositoryServices {
            db: true,
            cache: true,
            search: false,
            mq: false,
        }
    );

    let migrated = probe_services(
        &raw,
        &RepositoryRef::new("inveniosoftware", "invenio-i18n"),
        "master",
    )
    .await
    .expect("probe");
    assert_eq!(
        migrated,
        RepositoryServices {
            db: true,
            cache: false,
            search: true,
            mq: true,
        }
    );

    let unknown = probe_services(
        &raw,
        &RepositoryRef::new("inveniosoftware", "invenio-nothing"),
        "master",
    )
    .await
    .expect("probe");
    assert_eq!(unknown, RepositoryServices::default());
}

#[derive(Default)]
struct RecordingHosting {
    opened: Mutex<Vec<CreatePullRequest>>,
}

#[async_trait]
impl HostingApi for RecordingHosting {
    async fn list_organization_repositories(
        &self,
        _organization: &str,
    ) -> Result<Vec<String>, ToasterError> {
        Ok(vec!["invenio-i18n".to_string()])
    }

    async fn open_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &CreatePullRequest,
    ) -> Result<PullRequest, ToasterError> {
        self.opened.lock().unwrap().push(request.clone());
        Ok(PullRequest {
            number: 1,
            html_url: format!("https://github.com/{}/pull/1", repository.full_name()),
            state: "open".to_string(),
            created_at: None,
        })
    }

    async fn create_repository(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<GithubRepository, ToasterError> {
        Ok(GithubRepository {
            name: name.to_string(),
            full_name: format!("{organization}/{name}"),
            default_branch: None,
            archived: false,
            fork: false,
        })
    }
}

const GIT_IDENTITY: [&str; 6] = [
    "-c",
    "user.name=invenio-toaster",
    "-c",
    "user.email=toaster@example.org",
    "-c",
    "commit.gpgsign=false",
];

fn git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .status()
        .expect("git runs");
    assert!(status.success(), "git {args:?} failed");
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

#[tokio::test]
async fn cloned_repository_is_migrated_and_published() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let base = template_server().await;
    let dir = tempfile::tempdir().expect("tempdir");

    let origin_root = dir.path().join("origin");
    let origin = origin_root.join("inveniosoftware/invenio-i18n");
    write_fixture(&origin);
    git(&origin, &["init", "--quiet"]);
    git(&origin, &["add", "."]);
    let mut commit = GIT_IDENTITY.to_vec();
    commit.extend(["commit", "--quiet", "-m", "initial"]);
    git(&origin, &commit);

    let mut cfg = Config::default();
    cfg.basic.cache_path = dir.path().join("cache");
    cfg.github.clone_base_url = Url::from_directory_path(&origin_root).expect("file url");
    cfg.migration = migration_config(&base);
    cfg.migration.publish.commit_extra_before = GIT_IDENTITY.map(str::to_string).to_vec();

    let hosting = RecordingHosting::default();
    let pr = migrate_repository(
        &cfg,
        &reqwest::Client::new(),
        &hosting,
        "invenio-i18n",
        true,
    )
    .await
    .expect("migrated and published")
    .expect("PR mode");

    assert_eq!(pr.html_url, "https://github.com/inveniosoftware/invenio-i18n/pull/1");
    assert_migrated(&cfg.repository_path("invenio-i18n"));

    let opened = hosting.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].head, "ga-migration");
    assert_eq!(opened[0].title, "global: migrate CI to gh-actions");

    git(&origin, &["rev-parse", "--verify", "--quiet", "refs/heads/ga-migration"]);
}

#[tokio::test]
async fn existing_clone_target_is_a_precondition_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cfg = Config::default();
    cfg.basic.cache_path = dir.path().to_path_buf();
    fs::create_dir_all(cfg.repository_path("invenio-i18n")).unwrap();

    let err = migrate_repository(
        &cfg,
        &reqwest::Client::new(),
        &RecordingHosting::default(),
        "invenio-i18n",
        false,
    )
    .await
    .unwrap_err();

    assert!(
        matches!(
            err,
            toaster::ScriptError::Toaster(ToasterError::PreconditionFailed(_))
        ),
        "got {err:?}"
    );
}
