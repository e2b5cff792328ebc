//! Configuration for Lingua
//!
//! Owns everything the conversion core deliberately does not: reading the
//! TOML config file, expanding `{{ env.VAR }}` placeholders and falling back
//! to per-provider environment variables for credentials.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod provider;

use indexmap::IndexMap;
use serde::Deserialize;

pub use env::ExpandError;
pub use provider::*;

/// Top-level Lingua configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider configurations keyed by name, in file order
    #[serde(default)]
    pub providers: IndexMap<String, ProviderConfig>,
}

impl Config {
    /// Look up a provider by its configured name
    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }
}
