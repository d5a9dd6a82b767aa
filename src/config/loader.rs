//! Configuration Loader
//!
//! Environment-aware configuration loading built on the `config` crate.
//! Sources are merged in order: defaults, optional file, environment.

use super::StoreConfig;
use crate::error::Result;
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Default location of the optional configuration file
const DEFAULT_CONFIG_FILE: &str = "config/usability.toml";

/// Environment variable prefix, e.g. `USABILITY__CASCADE_MODE=concurrent`
const ENV_PREFIX: &str = "USABILITY";
const ENV_SEPARATOR: &str = "__";

/// Builder that resolves a [`StoreConfig`] from layered sources
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    file_required: bool,
    env_overrides: Option<HashMap<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the default file (if present) and the process environment
    pub fn new() -> Self {
        Self {
            file: Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
            file_required: false,
            env_overrides: None,
        }
    }

    /// Read configuration from an explicit file, which must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.file_required = true;
        self
    }

    /// Skip the file layer entirely
    pub fn without_file(mut self) -> Self {
        self.file = None;
        self.file_required = false;
        self
    }

    /// Replace the process environment with an explicit variable map
    ///
    /// Keys use the same `USABILITY__SECTION__KEY` form as real variables.
    pub fn with_env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    pub fn load(&self) -> Result<StoreConfig> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&StoreConfig::default())?);

        if let Some(path) = &self.file {
            debug!(
                path = %path.display(),
                required = self.file_required,
                "Adding configuration file source"
            );
            builder = builder.add_source(File::from(path.clone()).required(self.file_required));
        }

        let mut environment = Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true);
        if let Some(vars) = &self.env_overrides {
            environment = environment.source(Some(
                vars.clone().into_iter().collect::<config::Map<String, String>>(),
            ));
        }

        let config: StoreConfig = builder.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %config.environment,
            tests_collection = %config.collections.tests,
            cascade_mode = ?config.cascade_mode,
            "Configuration loaded successfully"
        );

        Ok(config)
    }
}
