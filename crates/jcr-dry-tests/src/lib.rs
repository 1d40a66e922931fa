// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for the JCR node cache crates.
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`nodes`] - `NodeSnapshot` fixture builder
//! - [`properties`] - `PropertyEntry` helpers
//! - [`sns`] - Same-name-sibling contiguity checks
//! - [`logging`] - Test tracing subscriber
#![forbid(unsafe_code)]
#![allow(clippy::expect_used)]

pub mod config;
pub mod logging;
pub mod nodes;
pub mod properties;
pub mod sns;

pub use config::InMemoryConfigStore;
pub use logging::init_test_tracing;
pub use nodes::NodeFixture;
pub use properties::{mixin_types_property, name_property, string_property};
pub use sns::{assert_sns_contiguous, sns_violations};
