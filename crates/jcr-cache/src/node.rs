// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node read interface and the immutable baseline snapshot.
use std::collections::{BTreeMap, BTreeSet};

use crate::children::{ChildCollection, ChildrenView};
use crate::definition::NodeDefinitionId;
use crate::ident::{Location, Name, NodeId};
use crate::property::PropertyEntry;

/// Read access shared by baselines and session overlays.
///
/// Missing properties read as `None`; no accessor fails.
pub trait NodeView {
    /// Where the node was loaded from.
    fn original_location(&self) -> &Location;

    /// Node identifier.
    fn id(&self) -> NodeId {
        self.original_location().id()
    }

    /// Parent identifier; `None` for the root.
    fn parent(&self) -> Option<NodeId>;

    /// Primary node type.
    fn primary_type_name(&self) -> &Name;

    /// Mixin node types.
    fn mixin_type_names(&self) -> &BTreeSet<Name>;

    /// Definition the node was created under.
    fn definition_id(&self) -> &NodeDefinitionId;

    /// Current children.
    fn children(&self) -> ChildrenView<'_>;

    /// Returns `true` when at least one property exists.
    fn has_properties(&self) -> bool;

    /// Number of properties.
    fn property_count(&self) -> usize;

    /// Names of all properties.
    fn property_names(&self) -> BTreeSet<Name>;

    /// Looks a property up by name.
    fn property(&self, name: &Name) -> Option<&PropertyEntry>;

    /// Created in this session and not yet saved.
    fn is_new(&self) -> bool;

    /// Changed in this session.
    fn is_modified(&self) -> bool;
}

/// Immutable baseline state of one node.
///
/// Built once from backing-store data and shared (behind an `Arc`) by every
/// session that reads the node. Sessions never mutate it; edits go through a
/// [`crate::NodeDelta`] wrapping it.
#[derive(Clone, Debug)]
pub struct NodeSnapshot {
    location: Location,
    parent: Option<NodeId>,
    primary_type: Name,
    mixin_types: BTreeSet<Name>,
    definition: NodeDefinitionId,
    children: ChildCollection,
    properties: BTreeMap<Name, PropertyEntry>,
}

impl NodeSnapshot {
    /// Starts building a snapshot for the node at `location`.
    pub fn builder(
        location: Location,
        primary_type: Name,
        definition: NodeDefinitionId,
    ) -> NodeSnapshotBuilder {
        let id = location.id();
        NodeSnapshotBuilder {
            snapshot: Self {
                location,
                parent: None,
                primary_type,
                mixin_types: BTreeSet::new(),
                definition,
                children: ChildCollection::empty(id),
                properties: BTreeMap::new(),
            },
        }
    }

    /// Baseline children.
    #[must_use]
    pub const fn child_collection(&self) -> &ChildCollection {
        &self.children
    }

    /// Iterates `(name, entry)` over the baseline properties in name order.
    pub fn properties(&self) -> impl Iterator<Item = (&Name, &PropertyEntry)> {
        self.properties.iter()
    }
}

impl NodeView for NodeSnapshot {
    fn original_location(&self) -> &Location {
        &self.location
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn primary_type_name(&self) -> &Name {
        &self.primary_type
    }

    fn mixin_type_names(&self) -> &BTreeSet<Name> {
        &self.mixin_types
    }

    fn definition_id(&self) -> &NodeDefinitionId {
        &self.definition
    }

    fn children(&self) -> ChildrenView<'_> {
        ChildrenView::Baseline(&self.children)
    }

    fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    fn property_count(&self) -> usize {
        self.properties.len()
    }

    fn property_names(&self) -> BTreeSet<Name> {
        self.properties.keys().cloned().collect()
    }

    fn property(&self, name: &Name) -> Option<&PropertyEntry> {
        self.properties.get(name)
    }

    fn is_new(&self) -> bool {
        false
    }

    fn is_modified(&self) -> bool {
        false
    }
}

/// Builder for [`NodeSnapshot`].
#[derive(Clone, Debug)]
#[must_use]
pub struct NodeSnapshotBuilder {
    snapshot: NodeSnapshot,
}

impl NodeSnapshotBuilder {
    /// Sets the parent identifier (leave unset for the root).
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.snapshot.parent = Some(parent);
        self
    }

    /// Sets the parent identifier from an option.
    pub fn parent_opt(mut self, parent: Option<NodeId>) -> Self {
        self.snapshot.parent = parent;
        self
    }

    /// Adds mixin types.
    pub fn mixins(mut self, mixins: impl IntoIterator<Item = Name>) -> Self {
        self.snapshot.mixin_types.extend(mixins);
        self
    }

    /// Replaces the children.
    pub fn children(mut self, children: ChildCollection) -> Self {
        debug_assert_eq!(
            crate::children::ChildList::parent_id(&children),
            self.snapshot.location.id(),
            "children belong to another node"
        );
        self.snapshot.children = children;
        self
    }

    /// Adds (or replaces) a property, keyed by its name.
    pub fn property(mut self, entry: PropertyEntry) -> Self {
        debug_assert_eq!(
            entry.id().node(),
            self.snapshot.location.id(),
            "property belongs to another node"
        );
        self.snapshot.properties.insert(entry.name().clone(), entry);
        self
    }

    /// Adds several properties.
    pub fn properties(self, entries: impl IntoIterator<Item = PropertyEntry>) -> Self {
        entries.into_iter().fold(self, Self::property)
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> NodeSnapshot {
        self.snapshot
    }
}
