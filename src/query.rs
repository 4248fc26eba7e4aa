//! Subtree traversal and queries.
//!
//! Traversal order is depth-first with each child visited before its
//! own descendants; the starting node itself is never a candidate.
//! Predicates see the node record, not the handle, so they can match on
//! kind, name, plugin data, or any other field.

use crate::node::{Node, NodeKind, NodeRef};
use crate::session::Session;
use std::collections::HashSet;

impl Session {
    /// All descendants of `root` matching `predicate`, in traversal
    /// order.
    pub fn find_all(&self, root: NodeRef, predicate: impl Fn(&Node) -> bool) -> Vec<NodeRef> {
        let mut matches = Vec::new();
        self.collect(root, &predicate, &mut matches);
        matches
    }

    /// The first descendant of `root` matching `predicate`.
    pub fn find_one(&self, root: NodeRef, predicate: impl Fn(&Node) -> bool) -> Option<NodeRef> {
        self.find_all(root, predicate).into_iter().next()
    }

    /// Direct children of `root` matching `predicate`.
    pub fn find_children(
        &self,
        root: NodeRef,
        predicate: impl Fn(&Node) -> bool,
    ) -> Vec<NodeRef> {
        self.node(root)
            .children
            .iter()
            .copied()
            .filter(|&child| predicate(self.node(child)))
            .collect()
    }

    /// The first direct child of `root` matching `predicate`.
    pub fn find_child(&self, root: NodeRef, predicate: impl Fn(&Node) -> bool) -> Option<NodeRef> {
        self.node(root)
            .children
            .iter()
            .copied()
            .find(|&child| predicate(self.node(child)))
    }

    /// All descendants of `root` whose kind is in `kinds`, in traversal
    /// order.
    pub fn find_all_with_criteria(&self, root: NodeRef, kinds: &[NodeKind]) -> Vec<NodeRef> {
        let wanted: HashSet<NodeKind> = kinds.iter().copied().collect();
        self.find_all(root, |node| wanted.contains(&node.kind))
    }

    fn collect(
        &self,
        node: NodeRef,
        predicate: &impl Fn(&Node) -> bool,
        matches: &mut Vec<NodeRef>,
    ) {
        for &child in &self.node(node).children {
            if predicate(self.node(child)) {
                matches.push(child);
            }
            self.collect(child, predicate, matches);
        }
    }
}
