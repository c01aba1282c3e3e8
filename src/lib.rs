//! Ansible dynamic inventory backed by the Tenable assets API.
//!
//! The pipeline resolves a [`Config`], fetches `GET {endpoint}/assets` with
//! [`TenableHttpClient`] and registers the first hostname of every asset
//! into a [`HostSink`].

pub mod config;
pub mod error;
pub mod inventory;
pub mod plugin;
pub mod tenable;

pub use config::{Config, ConfigReader, Environment, ProcessEnv, YamlConfigReader};
pub use error::{InventoryError, Result};
pub use inventory::{HostSink, Inventory};
pub use plugin::{AssetsPlugin, PLUGIN_NAME};
pub use tenable::TenableHttpClient;
