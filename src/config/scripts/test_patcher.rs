use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PublishSettings;

/// Settings of the `python setup.py test` → `python -m pytest` patcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TestPatcherConfig {
    /// Whole-line substitutions applied to `run-tests.sh`.
    pub replacements: BTreeMap<String, String>,
    pub run_tests_sh: String,
    pub setup_cfg: String,
    pub setup_py: String,
    /// Repositories never patched even when eligible.
    pub exclude: Vec<String>,
    /// Literal answer required at the confirmation prompt.
    pub passcode: String,
    pub publish: PublishSettings,
}

impl Default for TestPatcherConfig {
    fn default() -> Self {
        let replacements = [
            ("python setup.py test", "python -m pytest"),
            ("python setup.py test && \\", "python -m pytest && \\"),
            ("python setup.py test # && \\", "python -m pytest # && \\"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        let message = "tests: bypass setuptools and use pytest".to_string();
        Self {
            replacements,
            run_tests_sh: "run-tests.sh".to_string(),
            setup_cfg: "setup.cfg".to_string(),
            setup_py: "setup.py".to_string(),
            exclude: Vec::new(),
            passcode: "Yes".to_string(),
            publish: PublishSettings {
                open_pr: true,
                local_branch: "master".to_string(),
                remote_branch: "test-command".to_string(),
                base: "master".to_string(),
                title: message.clone(),
                message,
                body: "Modification of the repository to use pytest instead of setuptools"
                    .to_string(),
                expected: vec!["M run-tests.sh".to_string(), "M setup.cfg".to_string()],
                ..PublishSettings::default()
            },
        }
    }
}

impl TestPatcherConfig {
    pub fn should_apply_changes(&self, repository: &str) -> bool {
        !self.exclude.iter().any(|excluded| excluded == repository)
    }
}
