// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Session-private, mutable child list.
use crate::child::ChildReference;
use crate::children::{sealed, ChildCollection, ChildIndex, Removal};
use crate::config::StaleRemovalPolicy;
use crate::ident::{Name, NodeId};

/// Mutable overlay of a node's children, owned by one session.
///
/// Starts as a copy of the baseline [`ChildCollection`] (or empty) and is then
/// edited in place. The baseline it was copied from is never touched.
///
/// Only crate internals construct or mutate a `ChildDelta`; callers edit
/// children through [`crate::NodeDelta`], which decides when a delta is needed.
/// Reads go through [`crate::ChildList`].
#[derive(Clone, Debug)]
pub struct ChildDelta {
    parent: NodeId,
    index: ChildIndex,
    stale_removal: StaleRemovalPolicy,
}

impl ChildDelta {
    pub(crate) fn empty(parent: NodeId, stale_removal: StaleRemovalPolicy) -> Self {
        Self {
            parent,
            index: ChildIndex::default(),
            stale_removal,
        }
    }

    pub(crate) fn from_baseline(
        baseline: &ChildCollection,
        stale_removal: StaleRemovalPolicy,
    ) -> Self {
        Self {
            parent: sealed::Indexed::owner(baseline),
            index: baseline.index().clone(),
            stale_removal,
        }
    }

    /// Appends `id` as the last child named `name` with SNS index
    /// `count_named(name) + 1`. No-op when `id` is already a child.
    pub(crate) fn add_child(&mut self, name: Name, id: NodeId) -> &mut Self {
        self.index.push(name, id);
        self
    }

    /// Inserts `id` named `name` directly before child `before`, renumbering
    /// the later siblings named `name`. Returns `false` if nothing changed.
    pub(crate) fn insert_child_before(&mut self, name: Name, id: NodeId, before: &NodeId) -> bool {
        self.index.insert_before(name, id, before)
    }

    /// Removes `child`, located by the SNS index it carries, and shifts every
    /// later sibling with the same name down by one.
    ///
    /// Unknown identifiers are ignored. A reference whose recorded index is
    /// past the end of its name's siblings is treated as already gone and
    /// reported per the configured [`StaleRemovalPolicy`].
    pub(crate) fn remove_child(&mut self, child: &ChildReference) -> &mut Self {
        self.take_child(child);
        self
    }

    pub(crate) fn take_child(&mut self, child: &ChildReference) -> Removal {
        self.index.remove(child, self.stale_removal)
    }

    /// Freezes the current state into a new baseline collection.
    pub(crate) fn to_collection(&self) -> ChildCollection {
        ChildCollection::from_index(self.parent, self.index.clone())
    }
}

impl sealed::Indexed for ChildDelta {
    fn owner(&self) -> NodeId {
        self.parent
    }

    fn child_index(&self) -> &ChildIndex {
        &self.index
    }
}
