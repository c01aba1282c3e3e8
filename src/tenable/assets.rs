//! Tenable Assets
//!
//! Projection of the `assets` API response into inventory hosts.

use crate::error::{InventoryError, Result};
use crate::inventory::HostSink;
use serde_json::Value;

/// Path of the asset list, relative to the API endpoint
pub const ASSETS_PATH: &str = "assets";

/// First hostname of an asset record
fn first_hostname(asset: &Value) -> std::result::Result<&str, String> {
    let hostnames = asset
        .get("hostname")
        .ok_or_else(|| "missing \"hostname\"".to_string())?
        .as_array()
        .ok_or_else(|| "\"hostname\" is not a list".to_string())?;

    match hostnames.first() {
        Some(Value::String(name)) => Ok(name.as_str()),
        Some(_) => Err("first hostname is not a string".to_string()),
        None => Err("\"hostname\" is empty".to_string()),
    }
}

/// Register one host per asset, using the asset's first hostname.
///
/// Hosts are added in response order. A malformed asset stops the
/// projection; hosts added before it stay in the sink.
pub fn project(response: &Value, sink: &mut dyn HostSink) -> Result<usize> {
    let assets = match response.get("assets") {
        None | Some(Value::Null) if response.is_object() => return Ok(0),
        Some(Value::Array(assets)) => assets,
        _ => {
            return Err(InventoryError::MalformedResponse {
                path: ASSETS_PATH.to_string(),
                reason: "expected an object with an \"assets\" list".to_string(),
            })
        }
    };

    for (index, asset) in assets.iter().enumerate() {
        let name = first_hostname(asset)
            .map_err(|reason| InventoryError::MalformedAsset { index, reason })?;
        tracing::trace!("Adding host {}", name);
        sink.add_host(name);
    }

    Ok(assets.len())
}
