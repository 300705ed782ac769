use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use toaster_patch_core::{index_of, join_lines, split_lines};
use toaster_schema::PullRequest;
use tracing::{info, warn};

use crate::config::{Config, TestPatcherConfig};
use crate::error::{ScriptError, ToasterError};
use crate::github::{HostingApi, RepositoryRef};
use crate::patch::{file_path, read_content};
use crate::repository::{LocalRepository, PublishRequest};

const ALIASES_HEADER: &str = "[aliases]";
const TEST_ALIASES: [&str; 2] = ["test = pytest", "test=pytest"];

/// Replace every line that exactly matches a key of `replacements`.
pub fn substitute_lines(content: &str, replacements: &BTreeMap<String, String>) -> String {
    let lines: Vec<&str> = split_lines(content)
        .into_iter()
        .map(|line| replacements.get(line).map_or(line, String::as_str))
        .collect();
    join_lines(&lines)
}

fn uses_pytest(line: &str) -> bool {
    line == "pytest" || line.starts_with("pytest ") || line.starts_with("py.test ")
}

/// `[aliases]` directly followed by a lone `test = pytest` and a blank line.
pub fn has_single_test_alias<S: AsRef<str>>(lines: &[S]) -> bool {
    let Some(idx) = TEST_ALIASES
        .iter()
        .find_map(|alias| index_of(alias, lines))
    else {
        return false;
    };
    idx >= 1
        && lines[idx - 1].as_ref() == ALIASES_HEADER
        && lines
            .get(idx + 1)
            .is_some_and(|line| line.as_ref().is_empty())
}

/// Drop the three-line `[aliases]` / `test = pytest` / blank block.
///
/// Content without an `[aliases]` section is returned unchanged; an aliases
/// section holding anything else is refused.
pub fn remove_test_alias(content: &str) -> Result<String, ToasterError> {
    let mut lines = split_lines(content);
    if let Some(idx) = index_of(ALIASES_HEADER, &lines) {
        let single = lines
            .get(idx + 1)
            .is_some_and(|line| TEST_ALIASES.contains(line))
            && lines.get(idx + 2) == Some(&"");
        if !single {
            return Err(ToasterError::PreconditionFailed(
                "[aliases] section defines more than the test alias".to_string(),
            ));
        }
        lines.drain(idx..idx + 3);
    }
    Ok(join_lines(&lines))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepositorySurvey {
    pub has_run_tests: bool,
    /// `run-tests.sh` has a line with a known substitution.
    pub substitutable: bool,
    /// Substitutable, or not calling pytest directly.
    pub uses_test_command: bool,
    pub single_test_alias: bool,
}

/// Inspect one cached clone.
pub fn survey_repository(
    cfg: &TestPatcherConfig,
    cache: &Path,
    repository: &str,
) -> Result<RepositorySurvey, ToasterError> {
    let Some(script) = read_content(&file_path(cache, repository, &cfg.run_tests_sh))?
        .filter(|content| !content.is_empty())
    else {
        return Ok(RepositorySurvey::default());
    };

    let lines = split_lines(&script);
    let substitutable = lines
        .iter()
        .any(|line| cfg.replacements.contains_key(*line));
    let has_pytest = lines.iter().any(|line| uses_pytest(line));

    let mut survey = RepositorySurvey {
        has_run_tests: true,
        substitutable,
        uses_test_command: substitutable || !has_pytest,
        single_test_alias: false,
    };
    if !substitutable {
        return Ok(survey);
    }

    let setup_cfg = read_content(&file_path(cache, repository, &cfg.setup_cfg))?;
    if let Some(setup_cfg) = setup_cfg.filter(|content| !content.is_empty())
        && has_single_test_alias(&split_lines(&setup_cfg))
    {
        let setup_py = read_content(&file_path(cache, repository, &cfg.setup_py))?;
        if setup_py.is_some_and(|content| content.contains("cmdclass")) {
            warn!(repository, "setup.py declares cmdclass; not patchable");
        } else {
            survey.single_test_alias = true;
        }
    }
    Ok(survey)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurveySummary {
    pub total: usize,
    pub with_run_tests: usize,
    pub with_test_command: usize,
    pub substitutable: usize,
    pub single_test_alias: usize,
    pub to_patch: Vec<String>,
}

impl SurveySummary {
    fn add(&mut self, repository: &str, survey: RepositorySurvey, cfg: &TestPatcherConfig) {
        self.total += 1;
        self.with_run_tests += usize::from(survey.has_run_tests);
        self.with_test_command += usize::from(survey.uses_test_command);
        self.substitutable += usize::from(survey.substitutable);
        if survey.single_test_alias {
            self.single_test_alias += 1;
            if cfg.should_apply_changes(repository) {
                self.to_patch.push(repository.to_string());
            }
        }
    }
}

impl fmt::Display for SurveySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total repositories:\t\t\t\t{}", self.total)?;
        writeln!(f, "With file `run-tests.sh`:\t\t\t{}", self.with_run_tests)?;
        writeln!(
            f,
            "Uses a `test` command or related:\t\t{}",
            self.with_test_command
        )?;
        writeln!(
            f,
            "Uses a command with a known substitution:\t{}",
            self.substitutable
        )?;
        writeln!(f, "Defines one alias `test`:\t\t\t{}", self.single_test_alias)?;
        writeln!(
            f,
            "Will be patched:\t\t\t\t{} out of {} patchable",
            self.to_patch.len(),
            self.single_test_alias
        )
    }
}

pub fn survey(
    cfg: &TestPatcherConfig,
    cache: &Path,
    repositories: &[String],
) -> Result<SurveySummary, ToasterError> {
    let mut summary = SurveySummary::default();
    for repository in repositories {
        let survey = survey_repository(cfg, cache, repository)?;
        summary.add(repository, survey, cfg);
    }
    Ok(summary)
}

/// Ask for `passcode` before patching `count` repositories.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    count: usize,
    passcode: &str,
) -> std::io::Result<bool> {
    writeln!(
        output,
        "{count} repositories will be patched. Type \"{passcode}\" to confirm."
    )?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']) == passcode)
}

fn read_required(path: &Path) -> Result<String, ToasterError> {
    read_content(path)?
        .ok_or_else(|| ToasterError::NotFound(format!("{} is missing", path.display())))
}

/// Rewrite `run-tests.sh` and `setup.cfg` of one cached clone.
pub fn apply_changes(
    cfg: &TestPatcherConfig,
    cache: &Path,
    repository: &str,
) -> Result<(), ToasterError> {
    let run_tests = file_path(cache, repository, &cfg.run_tests_sh);
    let script = read_required(&run_tests)?;
    fs::write(&run_tests, substitute_lines(&script, &cfg.replacements))?;

    let setup_cfg = file_path(cache, repository, &cfg.setup_cfg);
    let content = read_required(&setup_cfg)?;
    fs::write(&setup_cfg, remove_test_alias(&content)?)?;

    info!(repository, "test command patched");
    Ok(())
}

/// Patch one cached clone and publish it with the patcher settings.
pub async fn patch_repository(
    cfg: &Config,
    hosting: &dyn HostingApi,
    repository: &str,
) -> Result<Option<PullRequest>, ScriptError> {
    let cache = &cfg.basic.cache_path;
    apply_changes(&cfg.test_patcher, cache, repository)?;

    let repo = LocalRepository::open(cache, repository)?;
    let request = PublishRequest::from_settings(
        RepositoryRef::new(cfg.github.organization.clone(), repository),
        &cfg.github.remote,
        &cfg.test_patcher.publish,
    );
    Ok(repo.publish(hosting, &request).await?)
}

/// Survey `repositories`, ask for confirmation and patch the eligible ones.
///
/// Returns the patched repositories; empty when nothing was eligible or the
/// confirmation was refused.
pub async fn run<R: BufRead, W: Write>(
    cfg: &Config,
    hosting: &dyn HostingApi,
    repositories: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>, ScriptError> {
    let summary = survey(&cfg.test_patcher, &cfg.basic.cache_path, repositories)?;
    writeln!(output, "{summary}").map_err(ToasterError::from)?;

    if summary.to_patch.is_empty() {
        writeln!(output, "No modification was made.").map_err(ToasterError::from)?;
        return Ok(Vec::new());
    }

    let confirmed = confirm(
        input,
        output,
        summary.to_patch.len(),
        &cfg.test_patcher.passcode,
    )
    .map_err(ToasterError::from)?;
    if !confirmed {
        writeln!(output, "Aborting.").map_err(ToasterError::from)?;
        return Ok(Vec::new());
    }

    for repository in &summary.to_patch {
        writeln!(output, "Patching {repository}...").map_err(ToasterError::from)?;
        patch_repository(cfg, hosting, repository).await?;
    }
    writeln!(output, "Done.").map_err(ToasterError::from)?;
    Ok(summary.to_patch)
}
