//! Runtime configuration: optional YAML file, then environment overrides.
//!
//! `.env` is loaded first (via `dotenvy`), so every variable below can live
//! there as well.
//!
//! | Variable                   | Setting                          |
//! |----------------------------|----------------------------------|
//! | `DEVLENS_CONFIG`           | path of a YAML config file       |
//! | `DEVLENS_HOME`             | project store root               |
//! | `GITHUB_TOKEN`             | default GitHub token             |
//! | `DEVLENS_BRANCHES`         | comma-separated branch fallbacks |
//! | `DEVLENS_MEDIUM_THRESHOLD` | medium complexity threshold      |
//! | `DEVLENS_HIGH_THRESHOLD`   | high complexity threshold        |
//! | `DEVLENS_LLM_MODEL`        | model for analysis prompts       |
//! | `DEVLENS_LLM_MAX_TOKENS`   | completion token budget          |
//! | `ANTHROPIC_API_KEY`        | LLM API key                      |

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::hierarchy::HierarchyConfig;

/// Default location of the project store, relative to the working directory.
const DEFAULT_STORE_ROOT: &str = ".devlens";

/// LLM settings for the analysis prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier.
    pub model: String,
    /// Maximum completion tokens per request.
    pub max_tokens: u32,
    /// API key; never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self { model: "claude-sonnet-4-20250514".to_string(), max_tokens: 2048, api_key: None }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LensConfig {
    /// Directory holding the project store.
    pub store_root: PathBuf,
    /// Token used when a project has none of its own.
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    /// Branches tried in order when fetching a repository tree.
    pub branches: Vec<String>,
    /// Hierarchy builder policy.
    pub hierarchy: HierarchyConfig,
    /// LLM settings.
    pub llm: LlmConfig,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from(DEFAULT_STORE_ROOT),
            github_token: None,
            branches: vec!["main".to_string(), "master".to_string()],
            hierarchy: HierarchyConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl LensConfig {
    /// Loads `.env`, the optional `DEVLENS_CONFIG` file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if a
    /// numeric override or the resulting thresholds are invalid.
    pub fn load() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let file = match env::var("DEVLENS_CONFIG") {
            Ok(path) => Some(
                std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read config file {path}: {e}"))?,
            ),
            Err(_) => None,
        };
        Self::from_sources(file.as_deref(), |key| env::var(key).ok())
    }

    /// Builds a config from YAML text (if any) and an environment lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid, a numeric variable does not
    /// parse, or the thresholds are not ascending.
    pub fn from_sources(
        yaml: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let mut config: Self = match yaml {
            Some(text) if !text.trim().is_empty() => {
                serde_yaml::from_str(text).map_err(|e| format!("failed to parse config: {e}"))?
            }
            _ => Self::default(),
        };

        if let Some(home) = lookup("DEVLENS_HOME") {
            config.store_root = PathBuf::from(home);
        }
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            config.github_token = Some(token);
        }
        if let Some(branches) = lookup("DEVLENS_BRANCHES") {
            config.branches = branches
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(value) = lookup("DEVLENS_MEDIUM_THRESHOLD") {
            config.hierarchy.thresholds.medium_above = parse_number("DEVLENS_MEDIUM_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("DEVLENS_HIGH_THRESHOLD") {
            config.hierarchy.thresholds.high_above = parse_number("DEVLENS_HIGH_THRESHOLD", &value)?;
        }
        if let Some(model) = lookup("DEVLENS_LLM_MODEL") {
            config.llm.model = model;
        }
        if let Some(value) = lookup("DEVLENS_LLM_MAX_TOKENS") {
            config.llm.max_tokens = parse_number("DEVLENS_LLM_MAX_TOKENS", &value)?;
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|k| !k.is_empty()) {
            config.llm.api_key = Some(key);
        }

        config.hierarchy.thresholds.validate().map_err(|e| e.to_string())?;
        if config.branches.is_empty() {
            return Err("at least one branch must be configured".to_string());
        }
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| format!("invalid {key}={value:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::hierarchy::ComplexityThresholds;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_sources() {
        let config = LensConfig::from_sources(None, env_of(&[])).unwrap();
        assert_eq!(config, LensConfig::default());
        assert_eq!(config.branches, vec!["main", "master"]);
        assert_eq!(config.hierarchy.thresholds, ComplexityThresholds::default());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let yaml = "store_root: /tmp/lens\nhierarchy:\n  thresholds:\n    medium_above: 30000\n    high_above: 100000\n";
        let config = LensConfig::from_sources(Some(yaml), env_of(&[])).unwrap();
        assert_eq!(config.store_root, PathBuf::from("/tmp/lens"));
        assert_eq!(config.hierarchy.thresholds.high_above, 100_000);
        assert!(config.hierarchy.is_ignored("node_modules"));
    }

    #[test]
    fn environment_beats_file() {
        let yaml = "branches: [develop]\n";
        let config = LensConfig::from_sources(
            Some(yaml),
            env_of(&[
                ("DEVLENS_BRANCHES", "trunk, main"),
                ("DEVLENS_HIGH_THRESHOLD", "80000"),
                ("GITHUB_TOKEN", "ghp_x"),
                ("ANTHROPIC_API_KEY", "sk-test"),
            ]),
        )
        .unwrap();
        assert_eq!(config.branches, vec!["trunk", "main"]);
        assert_eq!(config.hierarchy.thresholds.high_above, 80_000);
        assert_eq!(config.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let err = LensConfig::from_sources(None, env_of(&[("DEVLENS_MEDIUM_THRESHOLD", "90000")]))
            .unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn bad_number_rejected() {
        let err = LensConfig::from_sources(None, env_of(&[("DEVLENS_HIGH_THRESHOLD", "lots")]))
            .unwrap_err();
        assert!(err.contains("DEVLENS_HIGH_THRESHOLD"));
    }

    #[test]
    fn secrets_are_not_serialized() {
        let mut config = LensConfig::default();
        config.github_token = Some("ghp_secret".into());
        config.llm.api_key = Some("sk-secret".into());
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
    }
}
