//! Inventory sink and the Ansible inventory script output

use serde_json::{json, Value};

/// Destination for projected hosts
pub trait HostSink {
    fn add_host(&mut self, name: &str);
}

impl HostSink for Vec<String> {
    fn add_host(&mut self, name: &str) {
        self.push(name.to_string());
    }
}

/// Ordered set of inventory hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    hosts: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hosts in registration order
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hosts.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Document printed for `--list`
    pub fn to_list_json(&self) -> Value {
        json!({
            "_meta": { "hostvars": {} },
            "all": { "hosts": self.hosts },
        })
    }

    /// Document printed for `--host <name>`. No host variables are attached.
    pub fn host_vars(&self, _name: &str) -> Value {
        json!({})
    }
}

impl HostSink for Inventory {
    /// Hosts are keyed by name; adding a known host is a no-op.
    fn add_host(&mut self, name: &str) {
        if !self.contains(name) {
            self.hosts.push(name.to_string());
        }
    }
}
