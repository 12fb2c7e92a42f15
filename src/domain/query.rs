//! Read-only structural queries over a condition tree.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::instrument;

use crate::domain::entities::{CondNode, LeafKind, LeafNode, NodeId, TimeRange};

/// Pre-order, left-to-right traversal.
pub struct NodeIter<'a> {
    stack: Vec<&'a CondNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a CondNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children().iter().rev());
        Some(current)
    }
}

pub fn iter(root: &CondNode) -> NodeIter<'_> {
    NodeIter { stack: vec![root] }
}

pub fn leaves(root: &CondNode) -> impl Iterator<Item = &LeafNode> {
    iter(root).filter_map(CondNode::as_leaf)
}

/// True if any leaf in the subtree has `kind`. Groups never match directly.
#[instrument(level = "trace", skip(root))]
pub fn has_kind(root: &CondNode, kind: LeafKind) -> bool {
    leaves(root).any(|leaf| leaf.kind == kind)
}

pub fn find(root: &CondNode, id: NodeId) -> Option<&CondNode> {
    iter(root).find(|node| node.id() == id)
}

pub fn find_mut(node: &mut CondNode, id: NodeId) -> Option<&mut CondNode> {
    if node.id() == id {
        return Some(node);
    }
    match node {
        CondNode::Group(group) => group
            .children
            .iter_mut()
            .find_map(|child| find_mut(child, id)),
        CondNode::Leaf(_) => None,
    }
}

/// Equality ignoring node ids.
pub fn structural_eq(a: &CondNode, b: &CondNode) -> bool {
    match (a, b) {
        (CondNode::Group(x), CondNode::Group(y)) => {
            x.kind == y.kind
                && x.children.len() == y.children.len()
                && x
                    .children
                    .iter()
                    .zip(&y.children)
                    .all(|(l, r)| structural_eq(l, r))
        }
        (CondNode::Leaf(x), CondNode::Leaf(y)) => {
            x.kind == y.kind
                && x.time_range == y.time_range
                && x.aggregation == y.aggregation
                && x.threshold == y.threshold
                && x.gift_ref == y.gift_ref
                && x.guard_levels == y.guard_levels
        }
        _ => false,
    }
}

/// Latest leaf end time. The backend evaluates a campaign only after it.
pub fn latest_end_time(root: &CondNode) -> Option<NaiveDateTime> {
    leaves(root).map(|leaf| leaf.time_range.end).max()
}

/// Per condition kind, the window covering every leaf of that kind.
///
/// This is the span of activity history the backend has to scan.
pub fn kind_windows(root: &CondNode) -> BTreeMap<LeafKind, TimeRange> {
    let mut windows: BTreeMap<LeafKind, TimeRange> = BTreeMap::new();
    for leaf in leaves(root) {
        windows
            .entry(leaf.kind)
            .and_modify(|window| *window = window.union(&leaf.time_range))
            .or_insert(leaf.time_range);
    }
    windows
}

pub fn leaf_count(root: &CondNode) -> usize {
    leaves(root).count()
}

pub fn depth(node: &CondNode) -> usize {
    1 + node.children().iter().map(depth).max().unwrap_or(0)
}
