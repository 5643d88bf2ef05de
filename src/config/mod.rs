mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::session::RestorePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::{is_true, CONFIG_FILE_STEM, DEFAULT_API_BASE_URL};
pub use validation::{expand_env_var_in_string, validate_base_url};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore: Option<RestorePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_timeout: Option<Duration>,
    pub storage_dir: Option<PathBuf>,
    pub restore_policy: RestorePolicy,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self, String> {
        // An unreadable config file falls back to defaults
        let json_config = JsonConfig::load().unwrap_or_default();
        Self::resolve(args, json_config)
    }

    /// Merge sources: CLI args > env vars > config file > defaults
    pub fn resolve(args: &Args, json_config: JsonConfig) -> Result<Self, String> {
        Self::resolve_with(args, json_config, |key| env::var(key).ok())
    }

    /// Same as `resolve`, reading environment variables through `var`.
    pub fn resolve_with(
        args: &Args,
        json_config: JsonConfig,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let api_base_url = args
            .api_url
            .clone()
            .or_else(|| var("CLINIC_API_URL"))
            .or(json_config.api.base_url.map(|url| expand_env_var_in_string(&url)))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = validate_base_url(&api_base_url)?;

        let api_timeout = match var("CLINIC_API_TIMEOUT") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| format!("CLINIC_API_TIMEOUT must be a number of seconds (got '{}')", raw))?,
            ),
            None => json_config.api.timeout_secs,
        }
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

        let storage_dir = var("CLINIC_SESSION_DIR")
            .map(PathBuf::from)
            .or(json_config.session.storage_dir);

        let restore_policy = match var("CLINIC_SESSION_RESTORE") {
            Some(raw) => raw.parse::<RestorePolicy>()?,
            None => json_config.session.restore.unwrap_or_default(),
        };

        let verbose = args.verbose
            || var("CLINIC_VERBOSE")
                .map(|v| is_true(&v))
                .or(json_config.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_base_url,
            api_timeout,
            storage_dir,
            restore_policy,
            verbose,
        })
    }
}

impl JsonConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(JsonConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Local override first
        for ext in ["yaml", "yml", "json"] {
            paths.push(PathBuf::from(format!(".{}.{}", CONFIG_FILE_STEM, ext)));
        }

        if let Some(dir) = Self::user_config_dir() {
            for ext in ["yaml", "yml", "json"] {
                paths.push(dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext)));
            }
        }

        paths
    }

    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join(CONFIG_FILE_STEM))
    }

    pub fn example() -> Self {
        JsonConfig {
            api: ApiConfig {
                base_url: Some(DEFAULT_API_BASE_URL.to_string()),
                timeout_secs: None,
            },
            session: SessionConfig {
                storage_dir: None,
                restore: Some(RestorePolicy::Trust),
                verbose: Some(false),
            },
        }
    }

    pub fn to_yaml(&self) -> crate::error::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the example config unless a file is already there. Returns its path.
    pub fn init_user_config() -> Result<PathBuf> {
        let dir = Self::user_config_dir().context("Failed to determine home directory")?;
        let path = dir.join(format!("{}.yaml", CONFIG_FILE_STEM));
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        let yaml = Self::example().to_yaml()?;
        fs::write(&path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }
}
