// astra_sim/src/error.rs

use astra_core::error::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a scenario from loading or running.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to load or parse configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("prefab '{0}' not found in catalog")]
    PrefabNotFound(String),

    #[error("prefab '{0}' must resolve to a table to be merged")]
    PrefabNotATable(String),

    #[error("prefab '{0}' inherits from itself")]
    PrefabCycle(String),

    #[error("invalid configuration for sensor '{sensor}': {source}")]
    Sensor {
        sensor: String,
        #[source]
        source: ConfigError,
    },

    #[error("invalid scenario: {0}")]
    Scenario(String),

    #[error("scenario file not found at {0:?}")]
    MissingScenario(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<figment::Error> for SimError {
    fn from(err: figment::Error) -> Self {
        SimError::Figment(Box::new(err))
    }
}

impl SimError {
    pub fn sensor(name: impl Into<String>, source: ConfigError) -> Self {
        SimError::Sensor {
            sensor: name.into(),
            source,
        }
    }
}
