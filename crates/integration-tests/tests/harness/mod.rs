//! Shared fixtures for adapter integration tests

#![allow(dead_code)]

pub mod mock_backend;

use lingua_config::{ProviderConfig, ProviderType};
use url::Url;

/// Provider configuration pointed at a mock backend
pub fn provider_config(provider_type: ProviderType, base_url: Url) -> ProviderConfig {
    ProviderConfig::new(provider_type)
        .with_api_key("test-key")
        .with_base_url(base_url)
}
