// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Configuration loading for the JCR node cache.
//!
//! [`ConfigService`] serializes values as JSON and hands raw blobs to a
//! [`ConfigStore`]. [`FsConfigStore`] is the filesystem adapter; tests use an
//! in-memory store instead. [`load_cache_config`] reads the cache's
//! [`jcr_cache::CacheConfig`] from the `node-cache` key.
#![forbid(unsafe_code)]

pub mod cache;
pub mod fs;
pub mod store;

pub use cache::{load_cache_config, save_cache_config, CACHE_CONFIG_KEY};
pub use fs::FsConfigStore;
pub use store::{ConfigError, ConfigService, ConfigStore};
