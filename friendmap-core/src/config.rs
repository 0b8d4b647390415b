// Run configuration, loaded from a JSON file and overridden by CLI flags

use crate::error::{CoreError, Result};
use friendmap_scanner::fetch::DEFAULT_USER_AGENT;
use friendmap_scanner::result::DEFAULT_BASE_URL;
use friendmap_scanner::{AbsentContainerPolicy, Selectors};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/friendmap/";
pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Maximum concurrent friend fetches; unset means unbounded.
    pub concurrency: Option<usize>,
    pub user_agent: String,
    pub absent_container: AbsentContainerPolicy,
    pub selectors: Selectors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            concurrency: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            absent_container: AbsentContainerPolicy::Private,
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    debug!("No config at {}, using defaults", default_path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(CoreError::Config(format!(
                "base_url '{}' is not a valid URL",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

pub fn expand_dir(dir: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(dir).as_ref())
}

pub fn default_config_path() -> PathBuf {
    expand_dir(DEFAULT_CONFIG_DIR).join(CONFIG_FILE_NAME)
}
