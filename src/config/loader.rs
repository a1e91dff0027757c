// src/config/loader.rs
//! Layered configuration loader
//!
//! Sources are merged in order, later ones overriding earlier ones:
//! built-in defaults, then each file in `config_paths`, then
//! `NEUROALERT__`-prefixed environment variables such as
//! `NEUROALERT__SIMULATION__TICK_INTERVAL_MS=100`.
//!
//! Files are always parsed as TOML, whatever their extension. Missing files
//! are skipped unless the loader was built with [`ConfigLoader::from_file`].

use crate::config::{constants::paths, NeuroAlertConfig};
use crate::utils::validation::ValidationError;
use ::config::{Config, Environment, File, FileFormat};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Configuration source error: {0}")]
    Source(#[from] ::config::ConfigError),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loader holding the last successfully loaded configuration
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    require_files: bool,
    env_prefix: String,
    current_config: Arc<RwLock<NeuroAlertConfig>>,
}

impl ConfigLoader {
    /// Loader reading `neuroalert.toml` from the working directory
    pub fn new() -> Self {
        Self::with_paths(Self::discover_config_paths())
    }

    /// Create loader with custom paths; missing files are skipped
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            require_files: false,
            env_prefix: paths::ENV_PREFIX.to_string(),
            current_config: Arc::new(RwLock::new(NeuroAlertConfig::default())),
        }
    }

    /// Loader for one explicitly named file, which must exist
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            require_files: true,
            ..Self::with_paths(vec![path.into()])
        }
    }

    /// Use a different environment prefix; mainly for isolating tests
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Merge all sources, validate, and remember the result
    pub fn load(&self) -> Result<NeuroAlertConfig, ConfigError> {
        let config = self.load_and_merge_configs()?;
        config.validate()?;

        info!(
            tick_interval_ms = config.simulation.tick_interval_ms,
            prediction_cadence_ticks = config.simulation.prediction_cadence_ticks,
            history_capacity = config.simulation.history_capacity,
            "Configuration loaded"
        );

        *self.current_config.write() = config.clone();
        Ok(config)
    }

    /// Get current configuration
    pub fn current(&self) -> NeuroAlertConfig {
        self.current_config.read().clone()
    }

    /// Parse and validate a single TOML document, without other sources
    pub fn from_toml_str(content: &str) -> Result<NeuroAlertConfig, ConfigError> {
        let config: NeuroAlertConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a configuration file without loading it
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)?;
        Ok(())
    }

    /// Export current configuration to file
    pub fn export_config<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(&self.current())?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_and_merge_configs(&self) -> Result<NeuroAlertConfig, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&NeuroAlertConfig::default())?);

        for path in &self.config_paths {
            if !path.exists() {
                if self.require_files {
                    return Err(ConfigError::FileNotFound(path.clone()));
                }
                continue;
            }

            debug!(path = %path.display(), "Merging configuration file");
            let content = std::fs::read_to_string(path)?;
            builder = builder.add_source(File::from_str(&content, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator(paths::ENV_SEPARATOR)
                .separator(paths::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        vec![PathBuf::from(paths::DEFAULT_CONFIG_FILE)]
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
