// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Child references: a node identifier paired with its current segment.
use std::hash::{Hash, Hasher};

use crate::ident::{Name, NodeId};
use crate::segment::Segment;

/// Immutable reference from a parent to one of its children.
///
/// Equality and hashing use **only** the identifier. The segment is positional
/// display state that changes when a same-named sibling before this child is
/// removed; two references with the same id are the same child regardless of
/// the index they were captured with. This keeps hash-based indices valid
/// across renumbering.
#[derive(Clone, Debug)]
pub struct ChildReference {
    id: NodeId,
    segment: Segment,
}

impl ChildReference {
    /// Creates a reference to child `id` at `segment`.
    #[must_use]
    pub const fn new(id: NodeId, segment: Segment) -> Self {
        Self { id, segment }
    }

    /// Identifier of the child node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Segment (name and SNS index) the child had when this reference was made.
    #[must_use]
    pub const fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Child name, shorthand for `segment().name()`.
    #[must_use]
    pub const fn name(&self) -> &Name {
        self.segment.name()
    }

    /// Same child, new segment. Used when renumbering same-name siblings.
    #[must_use]
    pub fn with_segment(&self, segment: Segment) -> Self {
        Self::new(self.id, segment)
    }
}

impl PartialEq for ChildReference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ChildReference {}

impl Hash for ChildReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use std::collections::HashSet;

    use super::*;
    use crate::ident::make_node_id;

    #[test]
    fn equality_ignores_segment() {
        let id = make_node_id("child");
        let first = ChildReference::new(id, Segment::parse("foo[2]").unwrap());
        let renumbered = first.with_segment(Segment::parse("foo[1]").unwrap());
        assert_eq!(first, renumbered);
        assert_eq!(renumbered.id(), id);
        assert_eq!(renumbered.segment().index().get(), 1);

        let mut set = HashSet::new();
        set.insert(first);
        assert!(set.contains(&renumbered));
    }

    #[test]
    fn different_ids_are_different_children() {
        let seg = Segment::parse("foo").unwrap();
        let a = ChildReference::new(make_node_id("a"), seg.clone());
        let b = ChildReference::new(make_node_id("b"), seg);
        assert_ne!(a, b);
    }
}
