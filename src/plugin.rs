//! Tenable assets inventory plugin
//!
//! Runs the whole pipeline once: resolve configuration, fetch the asset
//! list, register one host per asset.

use crate::config::{Config, ConfigReader, Environment, ProcessEnv, YamlConfigReader};
use crate::error::Result;
use crate::inventory::HostSink;
use crate::tenable::{self, TenableHttpClient, ASSETS_PATH};
use std::path::Path;

/// Name reported in configuration errors
pub const PLUGIN_NAME: &str = "jpclipffel.tenable.assets";

/// Inventory plugin built on the Tenable assets API
#[derive(Debug, Clone, Default)]
pub struct AssetsPlugin<R = YamlConfigReader, E = ProcessEnv> {
    reader: R,
    env: E,
}

impl AssetsPlugin {
    /// Plugin reading YAML config files and the process environment
    pub fn from_process() -> Self {
        Self::new(YamlConfigReader, ProcessEnv)
    }
}

impl<R: ConfigReader, E: Environment> AssetsPlugin<R, E> {
    pub fn new(reader: R, env: E) -> Self {
        Self { reader, env }
    }

    /// Every config file is accepted
    pub fn verify_file(&self, _path: &Path) -> bool {
        true
    }

    /// Resolve and validate the configuration for `path`
    pub fn load_config(&self, path: &Path) -> Result<Config> {
        Config::resolve(path, &self.reader, &self.env, PLUGIN_NAME)
    }

    /// Populate `sink` with one host per Tenable asset.
    ///
    /// Configuration and API failures leave the sink untouched. Returns the
    /// number of assets projected; a deduplicating sink may hold fewer hosts.
    pub async fn parse(&self, sink: &mut dyn HostSink, path: &Path) -> Result<usize> {
        let config = self.load_config(path)?;
        let client = TenableHttpClient::new(config)?;

        let response = client.get(ASSETS_PATH).await?;
        let count = tenable::project(&response, sink)?;

        tracing::info!("Projected {} Tenable assets", count);
        Ok(count)
    }
}
