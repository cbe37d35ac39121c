// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration.
//!
//! Loaded from `planrun.toml` in the user config directory, or from an
//! explicit `--config` path. Everything has a sensible default; a missing
//! file at the default location is not an error.

use anyhow::Context;
use pr_recovery::ClassifierConfig;
use pr_resilience::BreakerConfig;
use pr_rollback::ServiceSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ledger file. Defaults to `<data dir>/planrun/ledger.jsonl`.
    pub state_path: Option<PathBuf>,
    /// Backup snapshot directory. Defaults to `<data dir>/planrun/backups`.
    pub backup_dir: Option<PathBuf>,
    /// File captured into every backup point, when set.
    pub config_snapshot: Option<PathBuf>,
    pub services: Vec<ServiceEntry>,
    pub classifier: ClassifierSection,
    pub breaker: BreakerSection,
}

/// One managed service, as configured.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    pub name: String,
    pub data_dir: PathBuf,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierSection {
    /// The classifier is opt-in; without it analysis is pattern-table only.
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key. The key
    /// itself never lives in the config file.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        let defaults = ClassifierConfig::default();
        Self {
            enabled: false,
            endpoint: defaults.endpoint,
            model: defaults.model,
            api_key_env: "PLANRUN_API_KEY".to_string(),
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakerSection {
    pub failure_threshold: u32,
    pub recovery_timeout_secs: u64,
    pub half_open_max_calls: u32,
}

impl Default for BreakerSection {
    fn default() -> Self {
        let defaults = BreakerConfig::default();
        Self {
            failure_threshold: defaults.failure_threshold,
            recovery_timeout_secs: defaults.recovery_timeout.as_secs(),
            half_open_max_calls: defaults.half_open_max_calls,
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "planrun.toml";

    /// Load from an explicit path, or from the default location. A missing
    /// file is only an error when the path was explicit.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let Some(path) = Self::default_path() else {
                    return Ok(Self::default());
                };
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("planrun").join(Self::FILE_NAME))
    }

    fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("planrun")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("ledger.jsonl"))
    }

    pub fn backups_path(&self) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("backups"))
    }

    pub fn service_specs(&self) -> Vec<ServiceSpec> {
        self.services
            .iter()
            .map(|entry| ServiceSpec {
                name: entry.name.clone(),
                data_dir: entry.data_dir.clone(),
                container: entry.container.clone(),
                unit: entry.unit.clone(),
            })
            .collect()
    }

    pub fn breaker_config(&self) -> BreakerConfig {
        BreakerConfig {
            failure_threshold: self.breaker.failure_threshold,
            recovery_timeout: Duration::from_secs(self.breaker.recovery_timeout_secs),
            half_open_max_calls: self.breaker.half_open_max_calls,
        }
    }

    /// Classifier settings, when enabled. The API key is read from the
    /// configured environment variable at call time.
    pub fn classifier_config(&self) -> Option<ClassifierConfig> {
        if !self.classifier.enabled {
            return None;
        }
        Some(ClassifierConfig {
            endpoint: self.classifier.endpoint.clone(),
            api_key: std::env::var(&self.classifier.api_key_env).ok(),
            model: self.classifier.model.clone(),
            timeout: Duration::from_secs(self.classifier.timeout_secs),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
