//! Configuration file loading and parsing.

use crate::env::{EnvError, Environment};
use crate::types::ToolstreamConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR: &str = ".toolstream";
const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the config file this loader reads.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.toolstream/config.yaml`, then apply
    /// environment overrides.
    pub fn load(&self) -> Result<ToolstreamConfig, ConfigError> {
        let config_path = self.config_path();

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::parse(&contents)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            ToolstreamConfig::default()
        };

        Environment::apply_overrides(&mut config)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Parse YAML text, expanding environment variables first.
    pub fn parse(contents: &str) -> Result<ToolstreamConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    pub fn validate(config: &ToolstreamConfig) -> Result<(), ConfigError> {
        if config.parser.max_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "parser.max_depth must be greater than 0".to_string(),
            });
        }

        if config.store.max_streams == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "store.max_streams must be greater than 0".to_string(),
            });
        }

        if config.store.max_argument_bytes == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "store.max_argument_bytes must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, config: &ToolstreamConfig) -> Result<(), ConfigError> {
        std::fs::create_dir_all(self.base_path.join(CONFIG_DIR))?;

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(self.config_path(), yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
        ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        }
    })?;

    let mut result = String::with_capacity(content.len());
    let mut last = 0;
    for cap in re.captures_iter(content) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];
        let value = match (Environment::get(var_name), cap.get(2)) {
            (Some(v), _) => v,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        };

        result.push_str(&content[last..full_match.start()]);
        result.push_str(&value);
        last = full_match.end();
    }
    result.push_str(&content[last..]);

    Ok(result)
}
