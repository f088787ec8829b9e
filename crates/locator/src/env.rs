//! Environment Snapshot
//!
//! Process properties and environment variables consulted by the resolver.
//! Captured once so resolution never reads hidden global state.

use std::collections::{BTreeMap, HashMap};
use std::ffi::{OsStr, OsString};

use tracing::debug;

/// Properties and environment variables visible to the resolver
#[derive(Debug, Clone, Default)]
pub struct Environment {
    properties: HashMap<String, String>,
    vars: HashMap<String, OsString>,
}

impl Environment {
    /// Empty environment, nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment together with a property table
    pub fn from_process(properties: BTreeMap<String, String>) -> Self {
        let vars: HashMap<String, OsString> = std::env::vars_os()
            .filter_map(|(key, value)| key.into_string().ok().map(|key| (key, value)))
            .collect();

        debug!(
            "Captured {} environment variables and {} properties",
            vars.len(),
            properties.len()
        );

        Self {
            properties: properties.into_iter().collect(),
            vars,
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Builder-style environment variable setter
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn var(&self, name: &str) -> Option<&OsStr> {
        self.vars.get(name).map(OsString::as_os_str)
    }
}
