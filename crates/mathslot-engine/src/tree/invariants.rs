//! Structural self-check used by tests and debug tooling.

use std::collections::HashSet;

use crate::tree::{Dir, Document};

/// Panic with a description of the first broken linkage invariant.
///
/// Checks every group in the arena, attached or not: end consistency, the
/// forward and backward sibling walks, parent back-links, and agreement
/// between owners and their child lists.
pub fn check(doc: &Document) {
    let mut linked = HashSet::new();

    for (group, data) in &doc.groups {
        let [left, right] = data.ends;
        assert_eq!(
            left.is_none(),
            right.is_none(),
            "group {group:?} has one open end: {:?}",
            data.ends
        );

        let mut previous = None;
        let mut next = left;
        let mut steps = 0;
        while let Some(node) = next {
            assert!(
                steps <= doc.nodes.len(),
                "sibling chain of {group:?} does not terminate"
            );
            let Some(node_data) = doc.nodes.get(node) else {
                panic!("group {group:?} links to freed node {node:?}");
            };
            assert_eq!(
                node_data.parent,
                Some(group),
                "node {node:?} is linked into {group:?} but names another parent"
            );
            assert_eq!(
                node_data.siblings[Dir::Left.index()],
                previous,
                "left sibling of {node:?} disagrees with the forward walk"
            );
            assert!(linked.insert(node), "node {node:?} is linked twice");
            previous = Some(node);
            next = node_data.siblings[Dir::Right.index()];
            steps += 1;
        }
        assert_eq!(previous, right, "forward walk of {group:?} ends away from its right end");

        if let Some(owner) = data.owner {
            let Some(owner_data) = doc.nodes.get(owner) else {
                panic!("group {group:?} is owned by freed node {owner:?}");
            };
            assert!(
                owner_data.children.contains(&group),
                "owner {owner:?} does not list {group:?} as a child"
            );
        }
    }

    for (node, data) in &doc.nodes {
        if data.parent.is_some() {
            assert!(linked.contains(&node), "node {node:?} has a parent but is not linked");
        }
        for &child in &data.children {
            assert_eq!(
                doc.owner(child),
                Some(node),
                "child group {child:?} of {node:?} names another owner"
            );
        }
    }
}
