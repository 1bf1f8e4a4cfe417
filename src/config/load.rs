//! Configuration loading from files.
//!
//! The YAML file is layered with `KILN_*` environment variables, so
//! `KILN_SITE__OUTPUT=public` overrides `site.output`.

use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// Default config file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kiln.yaml";

impl Config {
    /// Load the config from a file path, then apply `KILN_*` overrides
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_environment(path, environment())
    }

    fn load_with_environment(
        path: &Path,
        environment: config::Environment,
    ) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let config = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml))
            .add_source(environment)
            .build()?
            .try_deserialize::<Config>()?;

        config.validate()?;
        log::debug!("loaded config from {}", path.display());

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.per_page == 0 {
            return Err(ConfigError::Validation(
                "pagination.per_page must be at least 1".to_string(),
            ));
        }
        if !self.pagination.path.contains(":num") {
            return Err(ConfigError::Validation(format!(
                "pagination.path '{}' must contain ':num'",
                self.pagination.path
            )));
        }
        Ok(())
    }
}

/// `KILN_SITE__OUTPUT` -> `site.output`
fn environment() -> config::Environment {
    config::Environment::with_prefix("KILN")
        .prefix_separator("_")
        .separator("__")
}

/// Make a config path absolute against the working directory.
pub fn resolve_config_path(config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if config_file.is_relative() {
        Ok(std::env::current_dir()
            .map_err(ConfigError::CwdFailure)?
            .join(config_file))
    } else {
        Ok(config_file.to_path_buf())
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
