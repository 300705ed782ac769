//! The slice of `.travis.yml` the CI migration reads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TravisConfig {
    #[serde(default)]
    pub deploy: Option<TravisDeploy>,
}

/// `deploy` is either a single mapping or a list of mappings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TravisDeploy {
    Single(TravisProvider),
    Many(Vec<TravisProvider>),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TravisProvider {
    #[serde(default)]
    pub provider: Option<String>,
}

impl TravisConfig {
    /// Whether any deploy section targets `provider`.
    pub fn deploys_to(&self, provider: &str) -> bool {
        match &self.deploy {
            Some(TravisDeploy::Single(single)) => single.provider.as_deref() == Some(provider),
            Some(TravisDeploy::Many(many)) => many
                .iter()
                .any(|entry| entry.provider.as_deref() == Some(provider)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_single_pypi_deploy() {
        let raw = "language: python\ndeploy:\n  provider: pypi\n  user: inveniosoftware\n";
        let cfg: TravisConfig = serde_yaml::from_str(raw).expect("parse travis");
        assert!(cfg.deploys_to("pypi"));
    }

    #[test]
    fn detects_pypi_in_deploy_list() {
        let raw = "deploy:\n  - provider: pages\n  - provider: pypi\n";
        let cfg: TravisConfig = serde_yaml::from_str(raw).expect("parse travis");
        assert!(cfg.deploys_to("pypi"));
        assert!(!cfg.deploys_to("heroku"));
    }

    #[test]
    fn missing_deploy_section_is_not_pypi() {
        let cfg: TravisConfig = serde_yaml::from_str("language: python\n").expect("parse travis");
        assert!(!cfg.deploys_to("pypi"));
    }
}
