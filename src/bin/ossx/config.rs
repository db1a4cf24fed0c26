// Configuration loading for ossx

use anyhow::{Context, Result};
use ossx::log::LoggerConfig;
use ossx::oss::ObjectStorageConfig;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// ossx configuration
#[derive(Debug, Deserialize)]
pub struct OssxConfig {
    /// Bucket and credentials
    pub storage: ObjectStorageConfig,

    /// Logger configuration (default: text to stderr)
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl OssxConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default path is used when
    /// present, otherwise the storage settings come from the environment.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = match config_path {
            Some(p) => {
                let path = PathBuf::from(shellexpand::tilde(p).to_string());
                if !path.exists() {
                    return Err(anyhow::anyhow!(
                        "Config file not found: {}",
                        path.display()
                    ));
                }
                path
            }
            None => {
                let path = Self::default_config_path()?;
                if !path.exists() {
                    return Self::from_env();
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content, |name| std::env::var(name).ok())
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Storage settings from KEY_ID, SECRET, ENDPOINT, CONTAINER with the default logger
    pub fn from_env() -> Result<Self> {
        let storage = ObjectStorageConfig::from_env()
            .context("No config file found and environment is incomplete")?;

        Ok(Self {
            storage,
            logger: LoggerConfig::default(),
        })
    }

    /// Get default config path (~/.ossx/config.yaml)
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".ossx").join("config.yaml"))
    }

    fn parse<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand_env_vars(content, lookup)?;
        let config: Self = serde_yaml::from_str(&expanded)?;
        Ok(config)
    }
}

/// Expand variables in the format ${VAR_NAME}, unknown variables are left as is
fn expand_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")?;
    let expanded = re.replace_all(content, |caps: &regex_lite::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    Ok(expanded.into_owned())
}
