// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Loading and saving the node cache's [`CacheConfig`].

use jcr_cache::CacheConfig;

use crate::store::{ConfigError, ConfigService, ConfigStore};

/// Key under which the cache config is stored.
pub const CACHE_CONFIG_KEY: &str = "node-cache";

/// Loads the cache config, falling back to [`CacheConfig::default`] when the
/// key is missing. Fields absent from the stored document take their defaults.
pub fn load_cache_config<S: ConfigStore>(
    service: &ConfigService<S>,
) -> Result<CacheConfig, ConfigError> {
    if let Some(config) = service.load::<CacheConfig>(CACHE_CONFIG_KEY)? {
        tracing::debug!(?config, "loaded node cache config");
        Ok(config)
    } else {
        tracing::debug!("no stored node cache config; using defaults");
        Ok(CacheConfig::default())
    }
}

/// Persists the cache config under [`CACHE_CONFIG_KEY`].
pub fn save_cache_config<S: ConfigStore>(
    service: &ConfigService<S>,
    config: &CacheConfig,
) -> Result<(), ConfigError> {
    service.save(CACHE_CONFIG_KEY, config)
}
