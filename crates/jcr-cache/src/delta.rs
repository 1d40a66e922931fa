// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session-private overlay on a shared [`NodeSnapshot`].
//!
//! Each overlay field (parent, children, properties, mixins) starts absent and
//! is created on the first mutation of its kind. Reads consult the overlay
//! first and fall back to the wrapped snapshot, which is never mutated.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::child::ChildReference;
use crate::child_delta::ChildDelta;
use crate::children::{ChildList, ChildrenView};
use crate::config::DeltaSettings;
use crate::definition::NodeDefinitionId;
use crate::ident::{Location, Name, NodeId};
use crate::node::{NodeSnapshot, NodeView};
use crate::property::{PropertyEntry, Value};
use crate::segment::Segment;

/// Overlay entry for one property name.
///
/// A name missing from the overlay map means "unchanged from the baseline".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyChange {
    /// Added or replaced in this session.
    Set(PropertyEntry),
    /// Removed relative to the baseline (tombstone).
    Removed,
}

impl PropertyChange {
    /// The live entry, or `None` for a tombstone.
    #[must_use]
    pub const fn entry(&self) -> Option<&PropertyEntry> {
        match self {
            Self::Set(entry) => Some(entry),
            Self::Removed => None,
        }
    }

    fn into_entry(self) -> Option<PropertyEntry> {
        match self {
            Self::Set(entry) => Some(entry),
            Self::Removed => None,
        }
    }
}

/// Mutable overlay of one node, owned by a single session.
///
/// Not `Sync`-safe to share for mutation and performs no locking: confine a
/// `NodeDelta` to the task that handles its session.
#[derive(Clone, Debug)]
pub struct NodeDelta {
    original: Arc<NodeSnapshot>,
    settings: DeltaSettings,
    created: bool,
    new_parent: Option<NodeId>,
    changed_children: Option<ChildDelta>,
    changed_properties: Option<BTreeMap<Name, PropertyChange>>,
    changed_mixins: Option<BTreeSet<Name>>,
}

impl NodeDelta {
    /// Wraps `original` with default settings.
    #[must_use]
    pub fn new(original: Arc<NodeSnapshot>) -> Self {
        Self::with_settings(original, DeltaSettings::default())
    }

    /// Wraps `original` with explicit settings.
    #[must_use]
    pub fn with_settings(original: Arc<NodeSnapshot>, settings: DeltaSettings) -> Self {
        Self {
            original,
            settings,
            created: false,
            new_parent: None,
            changed_children: None,
            changed_properties: None,
            changed_mixins: None,
        }
    }

    pub(crate) fn created(original: Arc<NodeSnapshot>, settings: DeltaSettings) -> Self {
        Self {
            created: true,
            ..Self::with_settings(original, settings)
        }
    }

    /// The wrapped baseline.
    #[must_use]
    pub const fn original(&self) -> &Arc<NodeSnapshot> {
        &self.original
    }

    /// Settings this delta was built with.
    #[must_use]
    pub const fn settings(&self) -> &DeltaSettings {
        &self.settings
    }

    // --- parent -------------------------------------------------------------

    /// Records `parent` as the new parent and returns the parent that was in
    /// effect just before this call (the previous override if any, else the
    /// baseline's parent).
    pub fn set_parent(&mut self, parent: NodeId) -> Option<NodeId> {
        let previous = self.parent();
        if self.new_parent.is_none() {
            tracing::trace!(node = %self.id(), "recording parent override");
        }
        self.new_parent = Some(parent);
        previous
    }

    /// The parent override, if one was recorded.
    #[must_use]
    pub const fn parent_override(&self) -> Option<NodeId> {
        self.new_parent
    }

    // --- children -----------------------------------------------------------

    /// The children delta, if children were changed.
    #[must_use]
    pub const fn changed_children(&self) -> Option<&ChildDelta> {
        self.changed_children.as_ref()
    }

    fn children_delta(&mut self) -> &mut ChildDelta {
        let stale = self.settings.stale_removal();
        let original = &self.original;
        self.changed_children.get_or_insert_with(|| {
            tracing::trace!(node = %original.id(), "copying baseline children into delta");
            ChildDelta::from_baseline(original.child_collection(), stale)
        })
    }

    /// Appends child `id` named `name` and returns its reference (SNS index
    /// `count_named(name) + 1`). If `id` is already a child, returns the
    /// existing reference unchanged.
    pub fn add_child(&mut self, name: Name, id: NodeId) -> ChildReference {
        let delta = self.children_delta();
        delta.add_child(name.clone(), id);
        delta
            .child_by_id(&id)
            .cloned()
            .unwrap_or_else(|| ChildReference::new(id, Segment::first(name)))
    }

    /// Removes child `id` and returns the resulting children.
    ///
    /// When no children delta exists yet, a missing `id` (or an empty
    /// baseline) leaves the baseline in place without allocating a delta; a
    /// baseline whose only child is `id` becomes an empty delta.
    pub fn remove_child(&mut self, id: &NodeId) -> ChildrenView<'_> {
        if self.changed_children.is_none() {
            let baseline = self.original.child_collection();
            if baseline.is_empty() || !baseline.contains(id) {
                return self.children();
            }
            if baseline.len() == 1 {
                tracing::trace!(node = %self.id(), child = %id, "removing sole baseline child");
                self.changed_children = Some(ChildDelta::empty(
                    baseline.parent_id(),
                    self.settings.stale_removal(),
                ));
                return self.children();
            }
        }
        let delta = self.children_delta();
        if let Some(current) = delta.child_by_id(id).cloned() {
            delta.remove_child(&current);
        }
        self.children()
    }

    /// Moves existing child `child` directly before sibling `before`, or to
    /// the end when `before` is `None`, renumbering same-name siblings.
    ///
    /// Returns `false` and changes nothing when `child` or `before` is not a
    /// current child, or when `child == before`.
    pub fn order_child_before(&mut self, child: &NodeId, before: Option<&NodeId>) -> bool {
        let current = self.children();
        let Some(moving) = current.child_by_id(child).cloned() else {
            return false;
        };
        if let Some(before) = before {
            if before == child || !current.contains(before) {
                return false;
            }
        }
        let delta = self.children_delta();
        delta.remove_child(&moving);
        let name = moving.name().clone();
        match before {
            Some(before) => delta.insert_child_before(name, *child, before),
            None => {
                delta.add_child(name, *child);
                true
            }
        }
    }

    // --- properties ---------------------------------------------------------

    /// The property overlay entry for `name`, if the property was touched.
    #[must_use]
    pub fn property_change(&self, name: &Name) -> Option<&PropertyChange> {
        self.changed_properties.as_ref()?.get(name)
    }

    /// Names of the properties set or removed in this session.
    #[must_use]
    pub fn changed_property_names(&self) -> BTreeSet<Name> {
        self.changed_properties
            .as_ref()
            .map(|changes| changes.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Iterates the property overlay in name order.
    pub fn property_changes(&self) -> impl Iterator<Item = (&Name, &PropertyChange)> {
        self.changed_properties.iter().flatten()
    }

    fn property_overlay(&mut self) -> &mut BTreeMap<Name, PropertyChange> {
        let node = self.original.id();
        self.changed_properties.get_or_insert_with(|| {
            tracing::trace!(node = %node, "creating property overlay");
            BTreeMap::new()
        })
    }

    fn record(&mut self, name: Name, change: PropertyChange) -> Option<PropertyEntry> {
        self.track_mixins(&name, change.entry());
        let baseline = self.original.property(&name).cloned();
        match self.property_overlay().insert(name, change) {
            Some(previous) => previous.into_entry(),
            None => baseline,
        }
    }

    /// Sets (adds or replaces) a property and returns the entry visible just
    /// before: the previous overlay value if the name was already touched,
    /// otherwise the baseline entry.
    pub fn set_property(&mut self, entry: PropertyEntry) -> Option<PropertyEntry> {
        debug_assert_eq!(entry.id().node(), self.id(), "property belongs to another node");
        self.record(entry.name().clone(), PropertyChange::Set(entry))
    }

    /// Removes a property and returns the entry visible just before.
    ///
    /// A name present in neither the overlay nor the baseline is left alone:
    /// no tombstone is recorded and `None` is returned.
    pub fn remove_property(&mut self, name: &Name) -> Option<PropertyEntry> {
        let overlaid = self
            .changed_properties
            .as_ref()
            .is_some_and(|changes| changes.contains_key(name));
        if !overlaid && self.original.property(name).is_none() {
            return None;
        }
        self.record(name.clone(), PropertyChange::Removed)
    }

    fn track_mixins(&mut self, name: &Name, entry: Option<&PropertyEntry>) {
        if self.settings.mixin_property() != Some(name) {
            return;
        }
        let mixins: BTreeSet<Name> = entry
            .map(|entry| {
                entry
                    .property()
                    .values()
                    .iter()
                    .filter_map(Value::as_name)
                    .collect()
            })
            .unwrap_or_default();
        self.changed_mixins = Some(mixins);
    }

    // --- status -------------------------------------------------------------

    /// Returns `true` once any overlay field has been created.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.new_parent.is_some()
            || self.changed_children.is_some()
            || self.changed_properties.is_some()
            || self.changed_mixins.is_some()
    }

    /// Builds a fresh baseline holding this node's effective state: parent,
    /// children in current order and numbering, live properties with their
    /// new/modified flags cleared, and mixins.
    #[must_use]
    pub fn materialize(&self) -> NodeSnapshot {
        let children = match self.children() {
            ChildrenView::Baseline(children) => children.clone(),
            ChildrenView::Delta(delta) => delta.to_collection(),
        };
        let properties = self
            .property_names()
            .into_iter()
            .filter_map(|name| self.property(&name).map(PropertyEntry::persisted))
            .collect::<Vec<_>>();
        NodeSnapshot::builder(
            self.original_location().clone(),
            self.primary_type_name().clone(),
            self.definition_id().clone(),
        )
        .parent_opt(self.parent())
        .mixins(self.mixin_type_names().iter().cloned())
        .children(children)
        .properties(properties)
        .build()
    }
}

impl NodeView for NodeDelta {
    fn original_location(&self) -> &Location {
        self.original.original_location()
    }

    fn parent(&self) -> Option<NodeId> {
        self.new_parent.or_else(|| self.original.parent())
    }

    fn primary_type_name(&self) -> &Name {
        self.original.primary_type_name()
    }

    fn mixin_type_names(&self) -> &BTreeSet<Name> {
        self.changed_mixins
            .as_ref()
            .unwrap_or_else(|| self.original.mixin_type_names())
    }

    fn definition_id(&self) -> &NodeDefinitionId {
        self.original.definition_id()
    }

    fn children(&self) -> ChildrenView<'_> {
        match &self.changed_children {
            Some(delta) => ChildrenView::Delta(delta),
            None => self.original.children(),
        }
    }

    fn has_properties(&self) -> bool {
        let Some(changes) = &self.changed_properties else {
            return self.original.has_properties();
        };
        // More baseline entries than overlay entries: at least one baseline
        // property is untouched.
        if self.original.property_count() > changes.len() {
            return true;
        }
        self.property_count() > 0
    }

    fn property_count(&self) -> usize {
        let Some(changes) = &self.changed_properties else {
            return self.original.property_count();
        };
        changes
            .iter()
            .fold(self.original.property_count(), |count, (name, change)| {
                match (change, self.original.property(name).is_some()) {
                    (PropertyChange::Set(_), false) => count + 1,
                    (PropertyChange::Removed, true) => count - 1,
                    _ => count,
                }
            })
    }

    fn property_names(&self) -> BTreeSet<Name> {
        let mut names = self.original.property_names();
        for (name, change) in self.property_changes() {
            match change {
                PropertyChange::Set(_) => {
                    names.insert(name.clone());
                }
                PropertyChange::Removed => {
                    names.remove(name);
                }
            }
        }
        names
    }

    fn property(&self, name: &Name) -> Option<&PropertyEntry> {
        match self.property_change(name) {
            Some(change) => change.entry(),
            None => self.original.property(name),
        }
    }

    fn is_new(&self) -> bool {
        self.created
    }

    fn is_modified(&self) -> bool {
        !self.created && self.has_changes()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::children::ChildCollection;
    use crate::definition::PropertyDefinitionId;
    use crate::ident::make_node_id;
    use crate::property::{Property, PropertyId, PropertyType};

    fn definition() -> NodeDefinitionId {
        NodeDefinitionId::new("acme:container".into(), "acme:geniuses".into(), [])
    }

    fn entry(node: NodeId, name: &str, value: &str) -> PropertyEntry {
        PropertyEntry::builder(
            PropertyId::new(node, name.into()),
            PropertyDefinitionId::new("nt:base".into(), "*".into(), PropertyType::String, false),
            Property::new(name.into(), [Value::from(value)]),
        )
        .build()
        .unwrap()
    }

    fn snapshot(children: &[(&str, NodeId)], props: &[&str]) -> Arc<NodeSnapshot> {
        let id = make_node_id("node");
        let children = ChildCollection::from_names(
            id,
            children.iter().map(|(name, child)| (Name::from(*name), *child)),
        )
        .unwrap();
        Arc::new(
            NodeSnapshot::builder(Location::new(id), "acme:geniusType".into(), definition())
                .parent(make_node_id("P0"))
                .children(children)
                .properties(props.iter().map(|p| entry(id, p, "base")))
                .build(),
        )
    }

    #[test]
    fn set_parent_returns_the_parent_visible_just_before() {
        let mut delta = NodeDelta::new(snapshot(&[], &[]));
        let [p0, p1, p2] = [make_node_id("P0"), make_node_id("P1"), make_node_id("P2")];
        assert_eq!(delta.parent_override(), None);
        assert_eq!(delta.set_parent(p1), Some(p0));
        assert_eq!(delta.set_parent(p2), Some(p1));
        assert_eq!(delta.parent(), Some(p2));
        assert_eq!(delta.parent_override(), Some(p2));
        assert_eq!(delta.original().parent(), Some(p0));
    }

    #[test]
    fn removing_absent_child_keeps_baseline_view() {
        let a = make_node_id("A");
        let mut delta = NodeDelta::new(snapshot(&[("foo", a)], &[]));
        let view = delta.remove_child(&make_node_id("ghost"));
        assert!(!view.is_delta());
        assert_eq!(view.len(), 1);
        assert!(delta.changed_children().is_none());
    }

    #[test]
    fn removing_sole_child_creates_empty_delta() {
        let a = make_node_id("A");
        let mut delta = NodeDelta::new(snapshot(&[("foo", a)], &[]));
        let view = delta.remove_child(&a);
        assert!(view.is_delta());
        assert!(view.is_empty());
        let b = make_node_id("B");
        let added = delta.add_child("foo".into(), b);
        assert_eq!(added.segment(), &Segment::parse("foo[1]").unwrap());
        assert_eq!(delta.original().children().len(), 1);
    }

    #[test]
    fn adding_existing_child_returns_current_reference() {
        let a = make_node_id("A");
        let mut delta = NodeDelta::new(snapshot(&[("foo", a)], &[]));
        let again = delta.add_child("bar".into(), a);
        assert_eq!(again.segment(), &Segment::parse("foo[1]").unwrap());
        assert_eq!(delta.children().len(), 1);
    }

    #[test]
    fn tombstone_hides_baseline_property() {
        let mut delta = NodeDelta::new(snapshot(&[], &["test"]));
        let base = delta.original().property(&"test".into()).cloned();
        assert_eq!(delta.remove_property(&"test".into()), base);
        assert_eq!(delta.property(&"test".into()), None);
        assert_eq!(delta.property_change(&"test".into()), Some(&PropertyChange::Removed));
        assert!(!delta.has_properties());
        assert_eq!(delta.property_count(), 0);
    }

    #[test]
    fn removing_unknown_property_records_nothing() {
        let mut delta = NodeDelta::new(snapshot(&[], &["a"]));
        assert_eq!(delta.remove_property(&"nope".into()), None);
        assert!(!delta.has_changes());
        assert!(delta.changed_property_names().is_empty());

        delta.set_property(entry(delta.id(), "b", "x"));
        assert_eq!(delta.remove_property(&"nope".into()), None);
        assert_eq!(delta.property_change(&"nope".into()), None);
    }

    #[test]
    fn set_then_remove_then_set_chain_previous_values() {
        let mut delta = NodeDelta::new(snapshot(&[], &["p"]));
        let id = delta.id();
        let base = delta.original().property(&"p".into()).cloned();
        let first = entry(id, "p", "one");
        assert_eq!(delta.set_property(first), base);
        let prev = delta.remove_property(&"p".into()).unwrap();
        assert_eq!(prev.property().first(), Some(&Value::from("one")));
        assert_eq!(delta.set_property(entry(id, "p", "two")), None);
        assert_eq!(
            delta.property(&"p".into()).and_then(|p| p.property().first()),
            Some(&Value::from("two"))
        );
    }

    #[test]
    fn mixin_property_drives_mixin_set() {
        let mut delta = NodeDelta::new(snapshot(&[], &[]));
        let id = delta.id();
        let mixins = PropertyEntry::builder(
            PropertyId::new(id, "jcr:mixinTypes".into()),
            PropertyDefinitionId::new(
                "nt:base".into(),
                "jcr:mixinTypes".into(),
                PropertyType::Name,
                true,
            ),
            Property::new(
                "jcr:mixinTypes".into(),
                [Value::from(Name::from("dna:type1")), Value::from(Name::from("dna:type2"))],
            ),
        )
        .build()
        .unwrap();
        assert_eq!(delta.set_property(mixins.clone()), None);
        assert_eq!(delta.property(&"jcr:mixinTypes".into()), Some(&mixins));
        let names: Vec<_> = delta.mixin_type_names().iter().map(Name::as_str).collect();
        assert_eq!(names, vec!["dna:type1", "dna:type2"]);

        delta.remove_property(&"jcr:mixinTypes".into());
        assert!(delta.mixin_type_names().is_empty());
    }

    #[test]
    fn untracked_mixins_follow_baseline() {
        let config = crate::config::CacheConfig {
            track_mixin_types: false,
            ..crate::config::CacheConfig::default()
        };
        let mut delta = NodeDelta::with_settings(snapshot(&[], &[]), config.settings());
        let id = delta.id();
        delta.set_property(entry(id, "jcr:mixinTypes", "mix:x"));
        assert!(delta.mixin_type_names().is_empty());
        assert!(delta.changed_mixins.is_none());
    }

    #[test]
    fn status_reflects_changes() {
        let mut delta = NodeDelta::new(snapshot(&[], &[]));
        assert!(!delta.is_new());
        assert!(!delta.is_modified());
        delta.set_parent(make_node_id("elsewhere"));
        assert!(delta.is_modified());
    }
}
