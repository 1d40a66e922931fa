// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cache configuration and the per-delta settings derived from it.
use crate::ident::{Name, NodeId};
use crate::segment::Segment;

/// Name of the property that lists a node's mixin types.
pub const MIXIN_TYPES_PROPERTY: &str = "jcr:mixinTypes";

/// How a [`crate::ChildDelta`] reports a removal it ignored because the
/// caller's captured SNS index is past the end of the sibling list.
///
/// The removal is a no-op either way; the policy only picks the log level.
/// Such a reference was captured before an earlier removal renumbered its
/// siblings, and acting on it silently can hide a double removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StaleRemovalPolicy {
    /// Emit a `WARN` event.
    #[default]
    Warn,
    /// Emit a `DEBUG` event.
    Quiet,
}

impl StaleRemovalPolicy {
    pub(crate) fn report(self, child: NodeId, recorded: &Segment, present: usize) {
        match self {
            Self::Warn => tracing::warn!(
                child = %child,
                recorded = %recorded,
                present,
                "ignoring removal with stale same-name-sibling index"
            ),
            Self::Quiet => tracing::debug!(
                child = %child,
                recorded = %recorded,
                present,
                "ignoring removal with stale same-name-sibling index"
            ),
        }
    }
}

/// Node cache configuration.
///
/// Loaded by the host (see the `jcr-config` crate); missing fields take their
/// defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Log level for ignored stale child removals.
    pub stale_removal: StaleRemovalPolicy,
    /// Keep a delta's mixin set in sync with its mixin-types property.
    pub track_mixin_types: bool,
    /// Name of the mixin-types property.
    pub mixin_types_property: Name,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_removal: StaleRemovalPolicy::default(),
            track_mixin_types: true,
            mixin_types_property: Name::from(MIXIN_TYPES_PROPERTY),
        }
    }
}

impl CacheConfig {
    /// Settings to hand to each [`crate::NodeDelta`] built under this config.
    #[must_use]
    pub fn settings(&self) -> DeltaSettings {
        DeltaSettings {
            stale_removal: self.stale_removal,
            mixin_property: self
                .track_mixin_types
                .then(|| self.mixin_types_property.clone()),
        }
    }
}

/// Behavior knobs carried by one [`crate::NodeDelta`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaSettings {
    pub(crate) stale_removal: StaleRemovalPolicy,
    /// `None` disables mixin tracking.
    pub(crate) mixin_property: Option<Name>,
}

impl Default for DeltaSettings {
    fn default() -> Self {
        CacheConfig::default().settings()
    }
}

impl DeltaSettings {
    /// Policy applied to stale child removals.
    #[must_use]
    pub const fn stale_removal(&self) -> StaleRemovalPolicy {
        self.stale_removal
    }

    /// Property whose value drives the mixin set, if tracking is on.
    #[must_use]
    pub const fn mixin_property(&self) -> Option<&Name> {
        self.mixin_property.as_ref()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn defaults_track_jcr_mixin_types() {
        let settings = CacheConfig::default().settings();
        assert_eq!(settings.stale_removal(), StaleRemovalPolicy::Warn);
        assert_eq!(
            settings.mixin_property().map(Name::as_str),
            Some(MIXIN_TYPES_PROPERTY)
        );
    }

    #[test]
    fn disabling_tracking_clears_mixin_property() {
        let config = CacheConfig {
            track_mixin_types: false,
            ..CacheConfig::default()
        };
        assert_eq!(config.settings().mixin_property(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{"stale_removal":"quiet"}"#).unwrap();
        assert_eq!(config.stale_removal, StaleRemovalPolicy::Quiet);
        assert!(config.track_mixin_types);
        assert_eq!(config.mixin_types_property.as_str(), MIXIN_TYPES_PROPERTY);
    }
}
