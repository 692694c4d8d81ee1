//! Pipeline configuration

use serde::{Deserialize, Serialize};
use sqmc_diagnostics::{Result, SqmError, SQM0400, SQM0401};
use sqmc_model::QueryOptions;
use sqmc_sql::RenderOptions;
use sqmc_types::StandardDialect;
use std::path::Path;

/// Configuration file contents; every section is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqmcConfig {
    pub dialect: StandardDialect,
    pub render: RenderOptions,
    pub query_options: QueryOptions,
}

impl SqmcConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            SqmError::system(SQM0401, "Invalid configuration").with_context(e.to_string())
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SqmError::system(SQM0400, format!("Cannot read {}", path.display()))
                .with_context(e.to_string())
        })?;
        let config = Self::from_json(&json)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }
}
