//! # Store Configuration
//!
//! Layered configuration for the test lifecycle coordinator: built-in
//! defaults, an optional TOML file, then `USABILITY__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use usability_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//! println!("tests live in {}", config.collections.tests);
//! # Ok(())
//! # }
//! ```

pub mod loader;

use crate::constants::{collections, DEFAULT_EVENT_CHANNEL_CAPACITY};
use crate::error::{Result, StoreError};
use crate::validation::validate_collection_name;
use serde::{Deserialize, Serialize};

pub use loader::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Deployment environment (development, test, production)
    pub environment: String,

    /// Collection names in the document database
    pub collections: CollectionsConfig,

    /// How the cascading delete dispatches its dependent steps
    pub cascade_mode: CascadeMode,

    /// Buffer size of the state change broadcast channel
    pub event_channel_capacity: usize,
}

/// Names of every collection the coordinator touches
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionsConfig {
    pub tests: String,
    pub reports: String,
    pub answers: String,
    pub cooperators: String,
    pub users: String,
}

/// Dispatch strategy for the dependent steps of a cascading delete
///
/// Both modes await every step before the test list is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Steps run one after another in a fixed order
    #[default]
    Sequential,
    /// Report, answer, cooperator-reference and cooperator-list deletes are
    /// dispatched together and complete in any order
    Concurrent,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            collections: CollectionsConfig::default(),
            cascade_mode: CascadeMode::default(),
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            tests: collections::TESTS.to_string(),
            reports: collections::REPORTS.to_string(),
            answers: collections::ANSWERS.to_string(),
            cooperators: collections::COOPERATORS.to_string(),
            users: collections::USERS.to_string(),
        }
    }
}

impl StoreConfig {
    /// Defaults overlaid with `USABILITY__*` environment variables, no file
    pub fn from_env() -> Result<Self> {
        ConfigLoader::new().without_file().load()
    }

    pub fn validate(&self) -> Result<()> {
        let names = [
            ("tests", &self.collections.tests),
            ("reports", &self.collections.reports),
            ("answers", &self.collections.answers),
            ("cooperators", &self.collections.cooperators),
            ("users", &self.collections.users),
        ];
        for (key, name) in names {
            validate_collection_name(name).map_err(|e| {
                StoreError::configuration(format!("collections.{key}: {e}"))
            })?;
        }

        if self.event_channel_capacity == 0 {
            return Err(StoreError::configuration(
                "event_channel_capacity must be greater than zero",
            ));
        }

        Ok(())
    }
}
