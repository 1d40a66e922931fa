// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Same-name-sibling contiguity checks.

use std::collections::HashMap;

use jcr_cache::{ChildList, Name};

/// Lists every child whose SNS index is not the next one for its name, as
/// `(name, expected, found)`. Empty when numbering is exactly `1..=k` per
/// name in overall order.
pub fn sns_violations<L: ChildList + ?Sized>(children: &L) -> Vec<(Name, usize, usize)> {
    let mut seen: HashMap<Name, usize> = HashMap::new();
    let mut violations = Vec::new();
    for child in children.iter() {
        let count = seen.entry(child.name().clone()).or_default();
        *count += 1;
        let found = child.segment().index().get();
        if found != *count {
            violations.push((child.name().clone(), *count, found));
        }
    }
    violations
}

/// Asserts that `children` satisfy SNS contiguity and that the name and
/// segment lookups agree with the overall order.
pub fn assert_sns_contiguous<L: ChildList + ?Sized>(children: &L) {
    let violations = sns_violations(children);
    assert!(violations.is_empty(), "SNS numbering broken: {violations:?}");
    for child in children.iter() {
        let by_segment = children.child_by_segment(child.segment()).map(|c| c.id());
        assert_eq!(
            by_segment,
            Some(child.id()),
            "segment lookup disagrees for {}",
            child.segment()
        );
        assert_eq!(
            children.count_named(child.name()),
            children.iter().filter(|c| c.name() == child.name()).count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jcr_cache::{make_node_id, ChildCollection};

    #[test]
    fn interleaved_names_are_contiguous() {
        let parent = make_node_id("p");
        let children = ChildCollection::empty(parent)
            .with("a".into(), make_node_id("a1"))
            .with("b".into(), make_node_id("b1"))
            .with("a".into(), make_node_id("a2"));
        assert!(sns_violations(&children).is_empty());
        assert_sns_contiguous(&children);
    }
}
