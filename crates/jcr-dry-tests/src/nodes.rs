// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `NodeSnapshot` fixture builder.

use std::sync::Arc;

use jcr_cache::{
    make_node_id, ChildCollection, Location, Name, NodeDefinitionId, NodeDelta, NodeId,
    NodeSnapshot, PropertyEntry,
};

use crate::properties::string_property;

/// Builds baseline nodes from labels; every identifier is
/// `make_node_id(label)`.
///
/// # Example
///
/// ```
/// use jcr_cache::{make_node_id, ChildList, NodeView};
/// use jcr_dry_tests::NodeFixture;
///
/// let node = NodeFixture::new("parent")
///     .child("foo", "A")
///     .child("foo", "B")
///     .string_property("title", "hello")
///     .build();
///
/// assert_eq!(node.children().count_named(&"foo".into()), 2);
/// let second = node.children().child_by_id(&make_node_id("B")).unwrap().segment().to_string();
/// assert_eq!(second, "foo[2]");
/// assert_eq!(node.property_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct NodeFixture {
    id: NodeId,
    path: Option<String>,
    parent: Option<NodeId>,
    primary_type: Name,
    mixins: Vec<Name>,
    children: Vec<(Name, NodeId)>,
    properties: Vec<PropertyEntry>,
}

impl NodeFixture {
    /// Starts a `nt:unstructured` node whose id derives from `label`.
    pub fn new(label: &str) -> Self {
        Self {
            id: make_node_id(label),
            path: None,
            parent: None,
            primary_type: "nt:unstructured".into(),
            mixins: Vec::new(),
            children: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Identifier of the node being built.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Records a path on the location.
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_owned());
        self
    }

    /// Sets the parent to `make_node_id(label)`.
    pub fn parent(mut self, label: &str) -> Self {
        self.parent = Some(make_node_id(label));
        self
    }

    /// Sets the primary type.
    pub fn primary_type(mut self, name: &str) -> Self {
        self.primary_type = name.into();
        self
    }

    /// Adds a mixin type.
    pub fn mixin(mut self, name: &str) -> Self {
        self.mixins.push(name.into());
        self
    }

    /// Appends a child named `name` with id `make_node_id(label)`.
    pub fn child(mut self, name: &str, label: &str) -> Self {
        self.children.push((name.into(), make_node_id(label)));
        self
    }

    /// Adds a single-valued string property.
    pub fn string_property(self, name: &str, value: &str) -> Self {
        let entry = string_property(self.id, name, value);
        self.property(entry)
    }

    /// Adds a prepared property entry.
    pub fn property(mut self, entry: PropertyEntry) -> Self {
        self.properties.push(entry);
        self
    }

    /// Definition every fixture node uses.
    pub fn definition() -> NodeDefinitionId {
        NodeDefinitionId::new("nt:unstructured".into(), "*".into(), [])
    }

    /// Builds the snapshot.
    pub fn build(self) -> NodeSnapshot {
        let location = match self.path {
            Some(path) => Location::at(path, self.id),
            None => Location::new(self.id),
        };
        let children = self
            .children
            .into_iter()
            .fold(ChildCollection::empty(self.id), |acc, (name, id)| acc.with(name, id));
        NodeSnapshot::builder(location, self.primary_type, Self::definition())
            .parent_opt(self.parent)
            .mixins(self.mixins)
            .children(children)
            .properties(self.properties)
            .build()
    }

    /// Builds the snapshot behind an `Arc`, as sessions share it.
    pub fn shared(self) -> Arc<NodeSnapshot> {
        Arc::new(self.build())
    }

    /// Builds the snapshot and wraps it in a fresh delta.
    pub fn delta(self) -> NodeDelta {
        NodeDelta::new(self.shared())
    }
}
