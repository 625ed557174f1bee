//! User configuration
//!
//! Read from `<config dir>/semitools/config.yaml`. Every field is optional
//! in the file; missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::period_frequency::{FrequencyUnit, TimeUnit};

const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "SEMITOOLS_DATA_DIR";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(semitools::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    #[diagnostic(
        code(semitools::config::parse),
        help("fields are data_dir, decimals, time_unit, frequency_unit, seed_default_bins")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where collections are stored; platform data dir when unset
    pub data_dir: Option<PathBuf>,

    /// Decimal places in table output
    pub decimals: usize,

    /// Default unit for period input
    pub time_unit: TimeUnit,

    /// Default unit for frequency output
    pub frequency_unit: FrequencyUnit,

    /// Seed Good/Fail/Marginal when no bins are stored
    pub seed_default_bins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            decimals: 4,
            time_unit: TimeUnit::default(),
            frequency_unit: FrequencyUnit::default(),
            seed_default_bins: true,
        }
    }
}

impl Config {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "semitools")
    }

    /// Default location of the config file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location. A missing file gives defaults; an
    /// unreadable or malformed one is logged and also gives defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::debug!("no config directory on this platform, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Load from `path`. A missing file gives defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, serde_yml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(content)
    }

    /// Directory holding the stored collections.
    ///
    /// Precedence: `override_dir` (flag or environment), then `data_dir`
    /// from the file, then the platform data directory, then `./.semitools`.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".semitools"))
    }
}
