// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! jcr-cache: session-scoped node cache for a hierarchical content repository.
//!
//! Nodes are loaded once into immutable [`NodeSnapshot`] baselines that any
//! number of sessions read concurrently. A session that edits a node wraps
//! the shared baseline in a private [`NodeDelta`]; each overlay field is
//! created on first mutation, so reads of untouched fields fall straight
//! through to the baseline. Nodes created in a session use [`NewNodeDelta`].
//!
//! Children are ordered and may share names (same-name siblings, SNS). For
//! every name the SNS indices are always exactly `1..=k`: removing a child
//! renumbers its later same-named siblings in place without changing their
//! identity.
//!
//! Nothing here performs I/O or locking. Deltas belong to one session and must
//! stay on the task that drives it.
#![forbid(unsafe_code)]

mod child;
mod child_delta;
mod children;
mod config;
mod definition;
mod delta;
mod ident;
mod new_node;
mod node;
mod property;
mod segment;

/// Child references (identity plus positional segment).
pub use child::ChildReference;
/// Session-private child list.
pub use child_delta::ChildDelta;
/// Baseline child lists and the shared read interface.
pub use children::{ChildCollection, ChildList, ChildrenError, ChildrenView};
/// Configuration and per-delta settings.
pub use config::{CacheConfig, DeltaSettings, StaleRemovalPolicy, MIXIN_TYPES_PROPERTY};
/// Opaque definition references.
pub use definition::{NodeDefinitionId, PropertyDefinitionId};
/// Session overlay.
pub use delta::{NodeDelta, PropertyChange};
/// Identity primitives.
pub use ident::{make_node_id, Location, Name, NodeId};
/// New-node overlay.
pub use new_node::NewNodeDelta;
/// Node read interface and baseline snapshot.
pub use node::{NodeSnapshot, NodeSnapshotBuilder, NodeView};
/// Property model.
pub use property::{
    Property, PropertyEntry, PropertyEntryBuilder, PropertyEntryError, PropertyId, PropertyType,
    Value,
};
/// Path segments (`name[index]`).
pub use segment::{Segment, SegmentError};
