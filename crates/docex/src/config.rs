use crate::error::{DocexError, Result};
use crate::run::RunOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xdg::BaseDirectories;

pub const CONFIG_ENV: &str = "DOCEX_CONFIG";
pub const PASSWORD_ENV: &str = "DOCEX_PASSWORD";
const CONFIG_FILE_NAME: &str = "docex.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub run: RunConfig,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding the database file.
    pub server: Option<String>,
    pub database: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub parallel: bool,
    pub query_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            query_timeout_secs: RunOptions::default().query_timeout.as_secs(),
        }
    }
}

impl RunConfig {
    pub fn options(&self) -> RunOptions {
        RunOptions {
            parallel: self.parallel,
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }
}

impl Config {
    /// Loads from `path_override`, then `DOCEX_CONFIG`, then the XDG config
    /// directory. No file at all yields the defaults.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path_override {
            return Self::from_file(&path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&env_path));
        }

        let found = BaseDirectories::with_prefix("docex")
            .ok()
            .and_then(|xdg| xdg.find_config_file(CONFIG_FILE_NAME));

        match found {
            Some(path) => Self::from_file(&path),
            None => {
                log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Reads one TOML file. An explicitly named file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DocexError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let mut config: Config = toml::from_str(&text)?;
        config.loaded_from = Some(path.to_path_buf());
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
