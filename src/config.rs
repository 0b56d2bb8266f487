use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{EtlError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    pub database: DatabaseConfig,
}

/// Location of each source feed. Unset feeds are treated as empty.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    pub athletes: Option<PathBuf>,
    pub forcedecks_athletes: Option<PathBuf>,
    pub forcedecks_tests: Option<PathBuf>,
    pub periods: Option<PathBuf>,
    pub activities: Option<PathBuf>,
    pub medical: Option<PathBuf>,
    pub academic: Option<PathBuf>,
    pub consent: Option<PathBuf>,
}

impl InputsConfig {
    pub fn path_for(&self, feed: &str) -> Option<&Path> {
        let path = match feed {
            constants::ATHLETES_FEED => &self.athletes,
            constants::FORCEDECKS_ATHLETES_FEED => &self.forcedecks_athletes,
            constants::FORCEDECKS_TESTS_FEED => &self.forcedecks_tests,
            constants::PERIODS_FEED => &self.periods,
            constants::ACTIVITIES_FEED => &self.activities,
            constants::MEDICAL_FEED => &self.medical,
            constants::ACADEMIC_FEED => &self.academic,
            constants::CONSENT_FEED => &self.consent,
            _ => return None,
        };
        path.as_deref()
    }

    /// Resolve relative feed paths against `base`
    fn rebase(&mut self, base: &Path) {
        for path in [
            &mut self.athletes,
            &mut self.forcedecks_athletes,
            &mut self.forcedecks_tests,
            &mut self.periods,
            &mut self.activities,
            &mut self.medical,
            &mut self.academic,
            &mut self.consent,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_DATABASE_PATH),
        }
    }
}

impl Config {
    /// Load a config file. Relative feed paths are resolved against the file's directory.
    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let mut config: Config = toml::from_str(&config_content)?;
        if let Some(base) = config_path.parent() {
            config.inputs.rebase(base);
        }
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        if config_path.as_ref().exists() {
            Self::load_from(config_path)
        } else {
            Ok(Self::default())
        }
    }
}
