use std::path::Path;

use anyhow::{anyhow, Context};
use config::{Config, Environment, File};
use dbaccess_core::{DocumentStoreConfig, GraphStoreConfig, RelationalStoreConfig};
use serde::Deserialize;

/// Environment variable prefix, e.g. `DBACCESS__MONGO__HOST`
const ENV_PREFIX: &str = "DBACCESS";

/// Connection settings for every store, each section optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub mongo: Option<DocumentStoreConfig>,
    pub mysql: Option<RelationalStoreConfig>,
    pub neo4j: Option<GraphStoreConfig>,
}

impl Settings {
    /// Load settings from `path` (if it exists) overlaid with environment variables
    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("failed to read settings from {}", path.display()))?
            .try_deserialize()
            .context("invalid settings")
    }

    pub fn mongo(&self) -> Result<&DocumentStoreConfig, anyhow::Error> {
        self.mongo
            .as_ref()
            .ok_or_else(|| missing_section("mongo"))
    }

    pub fn mysql(&self) -> Result<&RelationalStoreConfig, anyhow::Error> {
        self.mysql
            .as_ref()
            .ok_or_else(|| missing_section("mysql"))
    }

    pub fn neo4j(&self) -> Result<&GraphStoreConfig, anyhow::Error> {
        self.neo4j
            .as_ref()
            .ok_or_else(|| missing_section("neo4j"))
    }
}

fn missing_section(name: &str) -> anyhow::Error {
    anyhow!(
        "no [{}] settings; add them to the config file or set {}__{}__* variables",
        name,
        ENV_PREFIX,
        name.to_uppercase()
    )
}
