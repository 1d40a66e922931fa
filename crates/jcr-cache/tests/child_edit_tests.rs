// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use jcr_cache::{make_node_id, ChildList, ChildReference, NodeView, Segment};
use jcr_dry_tests::{assert_sns_contiguous, init_test_tracing, NodeFixture};

fn layout<L: ChildList + ?Sized>(children: &L) -> Vec<String> {
    children.iter().map(|c| c.segment().to_string()).collect()
}

fn ids<L: ChildList + ?Sized>(children: &L) -> Vec<jcr_cache::NodeId> {
    children.iter().map(ChildReference::id).collect()
}

#[test]
fn sole_child_removed_then_new_child_reuses_index_one() {
    init_test_tracing();
    let mut node = NodeFixture::new("parent").child("foo", "A").delta();

    let after = node.remove_child(&make_node_id("A"));
    assert_eq!(after.len(), 0);

    let added = node.add_child("foo".into(), make_node_id("B"));
    assert_eq!(added.segment(), &Segment::parse("foo[1]").unwrap());
    assert_eq!(added.id(), make_node_id("B"));
    // The shared baseline still holds A.
    assert!(node.original().children().contains(&make_node_id("A")));
}

#[test]
fn removing_first_of_three_renumbers_the_others() {
    init_test_tracing();
    let mut node = NodeFixture::new("parent")
        .child("foo", "A")
        .child("foo", "B")
        .child("foo", "C")
        .delta();

    let children = node.remove_child(&make_node_id("A"));
    assert_eq!(children.len(), 2);
    assert_eq!(layout(&children), ["foo[1]", "foo[2]"]);
    assert_eq!(ids(&children), [make_node_id("B"), make_node_id("C")]);
    assert_sns_contiguous(&children);
}

#[test]
fn removing_children_one_after_another() {
    init_test_tracing();
    let mut node = NodeFixture::new("parent")
        .child("childA", "childA1")
        .child("childB", "childB1")
        .child("childA", "childA2")
        .child("childA", "childA3")
        .delta();

    node.remove_child(&make_node_id("childA1"));
    node.remove_child(&make_node_id("childA2"));
    let children = node.children();

    assert_eq!(ids(&children), [make_node_id("childB1"), make_node_id("childA3")]);
    assert_eq!(layout(&children), ["childB[1]", "childA[1]"]);
    assert_sns_contiguous(&children);
}

#[test]
fn removing_unknown_child_does_not_allocate_a_delta() {
    let mut node = NodeFixture::new("parent").child("foo", "A").child("foo", "B").delta();
    let view = node.remove_child(&make_node_id("nobody"));
    assert!(!view.is_delta());
    assert!(node.changed_children().is_none());
    assert!(!node.has_changes());

    let mut empty = NodeFixture::new("leaf").delta();
    assert!(empty.remove_child(&make_node_id("nobody")).is_empty());
    assert!(empty.changed_children().is_none());
}

#[test]
fn adding_children_appends_in_name_order() {
    let mut node = NodeFixture::new("parent").child("a", "a1").delta();
    let b1 = node.add_child("b".into(), make_node_id("b1"));
    let a2 = node.add_child("a".into(), make_node_id("a2"));
    assert_eq!(b1.segment().to_string(), "b[1]");
    assert_eq!(a2.segment().to_string(), "a[2]");

    let children = node.children();
    assert!(children.is_delta());
    assert_eq!(children.count_named(&"a".into()), 2);
    assert_eq!(
        children.child_by_segment(&Segment::parse("a[2]").unwrap()).map(ChildReference::id),
        Some(make_node_id("a2"))
    );
    assert_sns_contiguous(&children);
    assert_eq!(node.original().children().len(), 1);
}

#[test]
fn ordering_before_a_sibling_renumbers_same_names() {
    init_test_tracing();
    let mut node = NodeFixture::new("parent")
        .child("x", "x1")
        .child("y", "y1")
        .child("x", "x2")
        .child("x", "x3")
        .delta();

    assert!(node.order_child_before(&make_node_id("x3"), Some(&make_node_id("x1"))));
    let children = node.children();
    assert_eq!(
        ids(&children),
        [make_node_id("x3"), make_node_id("x1"), make_node_id("y1"), make_node_id("x2")]
    );
    assert_eq!(layout(&children), ["x[1]", "x[2]", "y[1]", "x[3]"]);
    assert_sns_contiguous(&children);
}

#[test]
fn ordering_to_the_end() {
    let mut node = NodeFixture::new("parent")
        .child("x", "x1")
        .child("x", "x2")
        .child("y", "y1")
        .delta();

    assert!(node.order_child_before(&make_node_id("x1"), None));
    let children = node.children();
    assert_eq!(ids(&children), [make_node_id("x2"), make_node_id("y1"), make_node_id("x1")]);
    assert_eq!(layout(&children), ["x[1]", "y[1]", "x[2]"]);
}

#[test]
fn ordering_with_unknown_children_changes_nothing() {
    let mut node = NodeFixture::new("parent").child("x", "x1").child("x", "x2").delta();
    let x1 = make_node_id("x1");
    assert!(!node.order_child_before(&make_node_id("ghost"), Some(&x1)));
    assert!(!node.order_child_before(&x1, Some(&make_node_id("ghost"))));
    assert!(!node.order_child_before(&x1, Some(&x1)));
    assert!(node.changed_children().is_none());
    assert_eq!(layout(&node.children()), ["x[1]", "x[2]"]);
}

#[test]
fn other_sessions_keep_reading_the_baseline() {
    let shared = NodeFixture::new("parent").child("foo", "A").child("foo", "B").shared();
    let mut session_one = jcr_cache::NodeDelta::new(shared.clone());
    let session_two = jcr_cache::NodeDelta::new(shared.clone());

    session_one.remove_child(&make_node_id("A"));
    session_one.add_child("bar".into(), make_node_id("C"));

    assert_eq!(session_one.children().len(), 2);
    assert_eq!(layout(&session_two.children()), ["foo[1]", "foo[2]"]);
    assert_eq!(layout(&shared.children()), ["foo[1]", "foo[2]"]);
}
