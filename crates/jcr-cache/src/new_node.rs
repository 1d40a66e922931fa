// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Overlay for a node created in the current session.
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::children::ChildrenView;
use crate::config::DeltaSettings;
use crate::definition::NodeDefinitionId;
use crate::delta::NodeDelta;
use crate::ident::{Location, Name, NodeId};
use crate::node::{NodeSnapshot, NodeView};
use crate::property::PropertyEntry;

/// A [`NodeDelta`] over a synthetic, empty baseline.
///
/// The node has no persisted state: its baseline carries only location,
/// parent, type and definition, and every property lives in the overlay.
/// [`NodeView::is_new`] is always `true` and [`NodeView::is_modified`] always
/// `false`, whatever mutations follow.
///
/// Mutation goes through the wrapped [`NodeDelta`] via `Deref`/`DerefMut`.
#[derive(Clone, Debug)]
pub struct NewNodeDelta {
    inner: NodeDelta,
}

impl NewNodeDelta {
    /// Creates the overlay for a new node with default settings.
    pub fn new(
        location: Location,
        parent: NodeId,
        primary_type: Name,
        definition: NodeDefinitionId,
        properties: impl IntoIterator<Item = PropertyEntry>,
    ) -> Self {
        Self::with_settings(
            location,
            parent,
            primary_type,
            definition,
            properties,
            DeltaSettings::default(),
        )
    }

    /// Creates the overlay for a new node with explicit settings.
    pub fn with_settings(
        location: Location,
        parent: NodeId,
        primary_type: Name,
        definition: NodeDefinitionId,
        properties: impl IntoIterator<Item = PropertyEntry>,
        settings: DeltaSettings,
    ) -> Self {
        let baseline = NodeSnapshot::builder(location, primary_type, definition)
            .parent(parent)
            .build();
        let mut inner = NodeDelta::created(Arc::new(baseline), settings);
        for entry in properties {
            inner.set_property(entry);
        }
        tracing::trace!(node = %inner.id(), parent = %parent, "created new node overlay");
        Self { inner }
    }

    /// Unwraps the underlying overlay.
    #[must_use]
    pub fn into_delta(self) -> NodeDelta {
        self.inner
    }
}

impl Deref for NewNodeDelta {
    type Target = NodeDelta;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for NewNodeDelta {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl NodeView for NewNodeDelta {
    fn original_location(&self) -> &Location {
        self.inner.original_location()
    }

    fn parent(&self) -> Option<NodeId> {
        self.inner.parent()
    }

    fn primary_type_name(&self) -> &Name {
        self.inner.primary_type_name()
    }

    fn mixin_type_names(&self) -> &BTreeSet<Name> {
        self.inner.mixin_type_names()
    }

    fn definition_id(&self) -> &NodeDefinitionId {
        self.inner.definition_id()
    }

    fn children(&self) -> ChildrenView<'_> {
        self.inner.children()
    }

    fn has_properties(&self) -> bool {
        self.inner.has_properties()
    }

    fn property_count(&self) -> usize {
        self.inner.property_count()
    }

    fn property_names(&self) -> BTreeSet<Name> {
        self.inner.property_names()
    }

    fn property(&self, name: &Name) -> Option<&PropertyEntry> {
        self.inner.property(name)
    }

    fn is_new(&self) -> bool {
        true
    }

    fn is_modified(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::children::ChildList;
    use crate::definition::PropertyDefinitionId;
    use crate::ident::make_node_id;
    use crate::property::{Property, PropertyId, PropertyType, Value};

    fn title(node: NodeId) -> PropertyEntry {
        PropertyEntry::builder(
            PropertyId::new(node, "title".into()),
            PropertyDefinitionId::new("nt:base".into(), "*".into(), PropertyType::String, false),
            Property::new("title".into(), [Value::from("draft")]),
        )
        .new_property(true)
        .build()
        .unwrap()
    }

    fn fresh() -> NewNodeDelta {
        let id = make_node_id("new");
        NewNodeDelta::new(
            Location::new(id),
            make_node_id("parent"),
            "nt:unstructured".into(),
            NodeDefinitionId::new("nt:folder".into(), "*".into(), []),
            [title(id)],
        )
    }

    #[test]
    fn initial_properties_live_in_the_overlay() {
        let node = fresh();
        assert_eq!(node.original().property_count(), 0);
        assert_eq!(node.property_count(), 1);
        assert_eq!(node.changed_property_names(), BTreeSet::from([Name::from("title")]));
        assert_eq!(node.parent(), Some(make_node_id("parent")));
        assert!(node.children().is_empty());
    }

    #[test]
    fn flags_stay_fixed_under_mutation() {
        let mut node = fresh();
        assert!(node.is_new() && !node.is_modified());
        node.add_child("kid".into(), make_node_id("kid"));
        node.remove_property(&"title".into());
        node.set_parent(make_node_id("elsewhere"));
        assert!(node.is_new());
        assert!(!node.is_modified());
        assert!(node.has_changes());
    }

    #[test]
    fn removing_a_new_property_leaves_nothing() {
        let mut node = fresh();
        assert!(node.remove_property(&"title".into()).is_some());
        assert!(!node.has_properties());
        assert!(node.property_names().is_empty());
    }
}
