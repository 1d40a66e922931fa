// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ordered, indexed child lists.
//!
//! [`ChildCollection`] is the immutable baseline shared by every session that
//! read the node. [`crate::ChildDelta`] is a session's private, mutable copy.
//! Both keep their state in a [`ChildIndex`] and expose reads through the
//! sealed [`ChildList`] trait; [`ChildrenView`] is the two-variant borrow
//! returned by node accessors.
//!
//! Invariant (SNS contiguity): for every child name, the SNS indices of the
//! children with that name are exactly `1..=k`, in the same relative order as
//! those children appear in the overall order.
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use thiserror::Error;

use crate::child::ChildReference;
use crate::child_delta::ChildDelta;
use crate::config::StaleRemovalPolicy;
use crate::ident::{Name, NodeId};
use crate::segment::Segment;

/// Error returned when building a [`ChildCollection`] from explicit segments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChildrenError {
    /// The same identifier appears twice.
    #[error("child {0} appears more than once")]
    DuplicateChild(NodeId),
    /// A segment's SNS index does not continue its name's `1..k` sequence.
    #[error("child `{name}` has SNS index {found}, expected {expected}")]
    NonContiguousSns {
        /// Child name whose numbering is broken.
        name: Name,
        /// Index the next child with this name must carry.
        expected: usize,
        /// Index actually supplied.
        found: usize,
    },
}

/// Result of a removal against a [`ChildIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Removal {
    /// The child was removed; carries the reference as it was just before.
    Removed(ChildReference),
    /// No child with that identifier exists.
    Absent,
    /// The identifier exists but the captured SNS index is past the end of
    /// its name's sibling list; nothing was changed.
    Stale,
}

/// Storage shared by baseline and delta child lists.
///
/// `by_id` holds every child in overall order; `by_name` holds, per name, the
/// identifiers of that name's children in overall order, so position `i` in a
/// name list is SNS index `i + 1`.
#[derive(Clone, Debug, Default)]
pub struct ChildIndex {
    by_id: IndexMap<NodeId, ChildReference, FxBuildHasher>,
    by_name: FxHashMap<Name, Vec<NodeId>>,
}

impl ChildIndex {
    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn get(&self, id: &NodeId) -> Option<&ChildReference> {
        self.by_id.get(id)
    }

    pub(crate) fn by_segment(&self, segment: &Segment) -> Option<&ChildReference> {
        let id = self.by_name.get(segment.name())?.get(segment.position())?;
        self.by_id.get(id)
    }

    pub(crate) fn named<'a>(&'a self, name: &Name) -> impl Iterator<Item = &'a ChildReference> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.by_id.get(id))
    }

    pub(crate) fn count_named(&self, name: &Name) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ChildReference> {
        self.by_id.values()
    }

    /// Appends `id` as the last child named `name`. Returns `false` (and
    /// changes nothing) when `id` is already present.
    pub(crate) fn push(&mut self, name: Name, id: NodeId) -> bool {
        if self.by_id.contains_key(&id) {
            return false;
        }
        let siblings = self.by_name.entry(name.clone()).or_default();
        let segment = Segment::after(name, siblings.len());
        siblings.push(id);
        self.by_id.insert(id, ChildReference::new(id, segment));
        true
    }

    /// Inserts `id` named `name` immediately before the existing child
    /// `before`, shifting the SNS index of every later same-named sibling up
    /// by one. Returns `false` when `id` is already present or `before` is not.
    pub(crate) fn insert_before(&mut self, name: Name, id: NodeId, before: &NodeId) -> bool {
        if self.by_id.contains_key(&id) {
            return false;
        }
        let Some(at) = self.by_id.get_index_of(before) else {
            return false;
        };
        let by_id = &mut self.by_id;
        let siblings = self.by_name.entry(name.clone()).or_default();
        // Name lists follow overall order, so siblings ahead of `at` form a prefix.
        let rank = siblings.partition_point(|sib| by_id.get_index_of(sib).is_some_and(|i| i < at));
        siblings.insert(rank, id);
        Self::renumber(by_id, &name, siblings, rank + 1);
        by_id.shift_insert(at, id, ChildReference::new(id, Segment::after(name, rank)));
        true
    }

    /// Removes the child identified by `child.id()`, locating it through the
    /// SNS index recorded in `child`, then renumbers the same-named siblings
    /// that followed it.
    pub(crate) fn remove(&mut self, child: &ChildReference, policy: StaleRemovalPolicy) -> Removal {
        let id = child.id();
        let recorded = child.segment();
        let Some(current) = self.by_id.get(&id) else {
            return Removal::Absent;
        };
        let count = self.count_named(recorded.name());
        if recorded.index().get() > count {
            policy.report(id, recorded, count);
            return Removal::Stale;
        }

        let name = current.name().clone();
        let Some(siblings) = self.by_name.get_mut(&name) else {
            debug_assert!(false, "child {id} missing from name index `{name}`");
            return Removal::Absent;
        };
        let position = if name == *recorded.name() && siblings.get(recorded.position()) == Some(&id)
        {
            recorded.position()
        } else {
            let Some(actual) = siblings.iter().position(|sib| *sib == id) else {
                debug_assert!(false, "child {id} missing from name index `{name}`");
                return Removal::Absent;
            };
            tracing::debug!(
                child = %id,
                recorded = %recorded,
                actual = actual + 1,
                "captured SNS index points at another sibling; removing by identity"
            );
            actual
        };

        siblings.remove(position);
        Self::renumber(&mut self.by_id, &name, siblings, position);
        if siblings.is_empty() {
            self.by_name.remove(&name);
        }
        self.by_id
            .shift_remove(&id)
            .map_or(Removal::Absent, Removal::Removed)
    }

    /// Rewrites the segments of `siblings[from..]` so each carries SNS index
    /// `position + 1`. Identity is kept; only the segment changes.
    fn renumber(
        by_id: &mut IndexMap<NodeId, ChildReference, FxBuildHasher>,
        name: &Name,
        siblings: &[NodeId],
        from: usize,
    ) {
        for (position, sib) in siblings.iter().enumerate().skip(from) {
            if let Some(child) = by_id.get_mut(sib) {
                *child = child.with_segment(Segment::after(name.clone(), position));
            }
        }
    }
}

pub(crate) mod sealed {
    use crate::ident::NodeId;

    /// Access to the backing index. Not implementable outside this crate.
    pub trait Indexed {
        /// Identifier of the node owning the children.
        fn owner(&self) -> NodeId;
        /// Backing storage.
        fn child_index(&self) -> &super::ChildIndex;
    }
}

/// Read access shared by every child-list representation.
///
/// Lookups that miss return `None` (or an empty iterator); they never fail.
pub trait ChildList: sealed::Indexed {
    /// Identifier of the node these children belong to.
    fn parent_id(&self) -> NodeId {
        self.owner()
    }

    /// Number of children.
    fn len(&self) -> usize {
        self.child_index().len()
    }

    /// Returns `true` when there are no children.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks a child up by identifier.
    fn child_by_id(&self, id: &NodeId) -> Option<&ChildReference> {
        self.child_index().get(id)
    }

    /// Returns `true` when a child with this identifier exists.
    fn contains(&self, id: &NodeId) -> bool {
        self.child_by_id(id).is_some()
    }

    /// Looks a child up by `name[index]`; `None` when the index is out of range.
    fn child_by_segment(&self, segment: &Segment) -> Option<&ChildReference> {
        self.child_index().by_segment(segment)
    }

    /// Children named `name`, in SNS order.
    fn children_named<'a>(
        &'a self,
        name: &Name,
    ) -> impl Iterator<Item = &'a ChildReference> + use<'a, Self> {
        self.child_index().named(name)
    }

    /// Number of children named `name`.
    fn count_named(&self, name: &Name) -> usize {
        self.child_index().count_named(name)
    }

    /// All children in order.
    fn iter(&self) -> impl Iterator<Item = &ChildReference> {
        self.child_index().iter()
    }
}

impl<T: sealed::Indexed + ?Sized> ChildList for T {}

/// Immutable baseline list of a node's children.
///
/// Shared read-only by all sessions. The only way to derive a different list
/// is [`ChildCollection::with`], which copies every entry; sessions edit
/// through a [`ChildDelta`] instead.
#[derive(Clone, Debug)]
pub struct ChildCollection {
    parent: NodeId,
    index: ChildIndex,
}

impl ChildCollection {
    /// A collection with no children. Allocates nothing.
    #[must_use]
    pub fn empty(parent: NodeId) -> Self {
        Self {
            parent,
            index: ChildIndex::default(),
        }
    }

    /// Builds a collection from children with explicit segments.
    ///
    /// The segments must already satisfy SNS contiguity, in order.
    pub fn new(
        parent: NodeId,
        children: impl IntoIterator<Item = (NodeId, Segment)>,
    ) -> Result<Self, ChildrenError> {
        let mut index = ChildIndex::default();
        for (id, segment) in children {
            if index.get(&id).is_some() {
                return Err(ChildrenError::DuplicateChild(id));
            }
            let expected = index.count_named(segment.name()) + 1;
            if segment.index().get() != expected {
                return Err(ChildrenError::NonContiguousSns {
                    name: segment.name().clone(),
                    expected,
                    found: segment.index().get(),
                });
            }
            index.push(segment.name().clone(), id);
        }
        Ok(Self { parent, index })
    }

    /// Builds a collection from `(name, id)` pairs, assigning SNS indices in order.
    pub fn from_names(
        parent: NodeId,
        children: impl IntoIterator<Item = (Name, NodeId)>,
    ) -> Result<Self, ChildrenError> {
        let mut index = ChildIndex::default();
        for (name, id) in children {
            if !index.push(name, id) {
                return Err(ChildrenError::DuplicateChild(id));
            }
        }
        Ok(Self { parent, index })
    }

    /// Returns a new collection holding every existing child plus `id`,
    /// appended as the last child named `name`.
    ///
    /// O(total children): the whole index is copied. Meant for rebuilding a
    /// baseline after a save, not for interactive edits. If `id` is already a
    /// child the copy is returned unchanged.
    #[must_use]
    pub fn with(&self, name: Name, id: NodeId) -> Self {
        let mut index = self.index.clone();
        index.push(name, id);
        Self {
            parent: self.parent,
            index,
        }
    }

    pub(crate) fn index(&self) -> &ChildIndex {
        &self.index
    }

    pub(crate) fn from_index(parent: NodeId, index: ChildIndex) -> Self {
        Self { parent, index }
    }
}

impl sealed::Indexed for ChildCollection {
    fn owner(&self) -> NodeId {
        self.parent
    }

    fn child_index(&self) -> &ChildIndex {
        &self.index
    }
}

/// Borrowed view of a node's current children: either the shared baseline or
/// the session's delta.
#[derive(Clone, Copy, Debug)]
pub enum ChildrenView<'a> {
    /// Unchanged baseline children.
    Baseline(&'a ChildCollection),
    /// Session-private changed children.
    Delta(&'a ChildDelta),
}

impl ChildrenView<'_> {
    /// Returns `true` when the view is backed by a session delta.
    #[must_use]
    pub const fn is_delta(&self) -> bool {
        matches!(self, Self::Delta(_))
    }
}

impl sealed::Indexed for ChildrenView<'_> {
    fn owner(&self) -> NodeId {
        match self {
            Self::Baseline(children) => children.owner(),
            Self::Delta(children) => children.owner(),
        }
    }

    fn child_index(&self) -> &ChildIndex {
        match self {
            Self::Baseline(children) => children.child_index(),
            Self::Delta(children) => children.child_index(),
        }
    }
}
