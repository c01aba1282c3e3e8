//! Tenable API interaction module
//!
//! - [`http`] - authenticated HTTP client for the Tenable REST API
//! - [`assets`] - projection of the asset list into inventory hosts

pub mod assets;
pub mod http;

pub use assets::{project, ASSETS_PATH};
pub use http::{TenableHttpClient, API_NAME};
