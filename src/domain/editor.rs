//! Mutation contract used by the interactive rule editor.
//!
//! [`TreeEditor`] applies edits, [`ReadOnlyEditor`] ignores them. Presentation
//! code is written once against [`ConditionEditor`] and handed whichever
//! variant fits the view.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::{
    Aggregation, CondNode, GiftId, GroupKind, GroupNode, GuardLevel, GuardLevels, LeafKind,
    LeafNode, NodeId, TimeRange,
};
use crate::domain::ids::IdAllocator;

/// Default look-back window of a new condition.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Edits applied in place. None of them fail.
pub trait ConditionEditor {
    /// Group only.
    fn set_group_kind(&self, node: &mut CondNode, kind: GroupKind);

    /// Remove the node with `id` from its parent. Deleting the root or an
    /// unknown id does nothing.
    fn delete_node(&self, root: &mut CondNode, id: NodeId);

    /// Group only. Appends an empty OR group.
    fn add_subgroup(&self, node: &mut CondNode);

    /// Group only. Appends a leaf with default fields.
    fn add_condition(&self, node: &mut CondNode, kind: LeafKind);

    fn set_time_range(&self, node: &mut CondNode, range: TimeRange);

    fn set_aggregation(&self, node: &mut CondNode, aggregation: Aggregation);

    fn set_threshold(&self, node: &mut CondNode, threshold: u64);

    fn set_guard_level(&self, node: &mut CondNode, level: GuardLevel, enabled: bool);

    fn set_gift_ref(&self, node: &mut CondNode, gift_ref: Option<GiftId>);
}

/// Editor that mutates the tree.
pub struct TreeEditor<'a> {
    ids: &'a IdAllocator,
    clock: Arc<dyn Clock>,
}

impl<'a> TreeEditor<'a> {
    pub fn new(ids: &'a IdAllocator) -> Self {
        Self::with_clock(ids, Arc::new(SystemClock))
    }

    pub fn with_clock(ids: &'a IdAllocator, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// A new leaf as `add_condition` would append it.
    pub fn new_condition(&self, kind: LeafKind) -> LeafNode {
        let now = self.clock.now();
        LeafNode {
            id: self.ids.next_id(),
            kind,
            time_range: TimeRange::new(now - Duration::days(DEFAULT_WINDOW_DAYS), now),
            aggregation: Aggregation::Total,
            threshold: kind.default_threshold(),
            gift_ref: None,
            guard_levels: GuardLevels::all(),
        }
    }

    /// An empty OR group, the shape of a brand new rule.
    pub fn new_group(&self) -> GroupNode {
        GroupNode {
            id: self.ids.next_id(),
            kind: GroupKind::Or,
            children: Vec::new(),
        }
    }
}

fn group_mut<'n>(node: &'n mut CondNode, op: &str) -> Option<&'n mut GroupNode> {
    match node {
        CondNode::Group(group) => Some(group),
        CondNode::Leaf(leaf) => {
            error!("{op} called on condition {}, which is not a group", leaf.id);
            debug_assert!(false, "{op} requires a group node");
            None
        }
    }
}

fn leaf_mut<'n>(node: &'n mut CondNode, op: &str) -> Option<&'n mut LeafNode> {
    match node {
        CondNode::Leaf(leaf) => Some(leaf),
        CondNode::Group(group) => {
            error!("{op} called on group {}, which is not a condition", group.id);
            debug_assert!(false, "{op} requires a leaf node");
            None
        }
    }
}

/// Depth-first search for the parent of `id`, removing that child.
fn remove_child(group: &mut GroupNode, id: NodeId) -> bool {
    if let Some(pos) = group.children.iter().position(|child| child.id() == id) {
        group.children.remove(pos);
        return true;
    }
    group
        .children
        .iter_mut()
        .filter_map(CondNode::as_group_mut)
        .any(|sub| remove_child(sub, id))
}

impl ConditionEditor for TreeEditor<'_> {
    fn set_group_kind(&self, node: &mut CondNode, kind: GroupKind) {
        if let Some(group) = group_mut(node, "set_group_kind") {
            group.kind = kind;
        }
    }

    fn delete_node(&self, root: &mut CondNode, id: NodeId) {
        if root.id() == id {
            debug!("delete_node: {} is the root, ignoring", id);
            return;
        }
        let removed = match root {
            CondNode::Group(group) => remove_child(group, id),
            CondNode::Leaf(_) => false,
        };
        debug!("delete_node: {} removed={}", id, removed);
    }

    fn add_subgroup(&self, node: &mut CondNode) {
        if let Some(group) = group_mut(node, "add_subgroup") {
            let sub = self.new_group();
            debug!("add_subgroup: {} under {}", sub.id, group.id);
            group.children.push(sub.into());
        }
    }

    fn add_condition(&self, node: &mut CondNode, kind: LeafKind) {
        if let Some(group) = group_mut(node, "add_condition") {
            let leaf = self.new_condition(kind);
            debug!("add_condition: {} {} under {}", kind, leaf.id, group.id);
            group.children.push(leaf.into());
        }
    }

    fn set_time_range(&self, node: &mut CondNode, range: TimeRange) {
        if let Some(leaf) = leaf_mut(node, "set_time_range") {
            leaf.time_range = TimeRange::new(range.start, range.end);
        }
    }

    fn set_aggregation(&self, node: &mut CondNode, aggregation: Aggregation) {
        if let Some(leaf) = leaf_mut(node, "set_aggregation") {
            leaf.aggregation = aggregation;
        }
    }

    fn set_threshold(&self, node: &mut CondNode, threshold: u64) {
        if let Some(leaf) = leaf_mut(node, "set_threshold") {
            leaf.threshold = threshold;
        }
    }

    fn set_guard_level(&self, node: &mut CondNode, level: GuardLevel, enabled: bool) {
        if let Some(leaf) = leaf_mut(node, "set_guard_level") {
            leaf.guard_levels.set(level, enabled);
        }
    }

    fn set_gift_ref(&self, node: &mut CondNode, gift_ref: Option<GiftId>) {
        if let Some(leaf) = leaf_mut(node, "set_gift_ref") {
            leaf.gift_ref = gift_ref;
        }
    }
}

/// Editor for display-only views: every edit is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadOnlyEditor;

impl ConditionEditor for ReadOnlyEditor {
    fn set_group_kind(&self, _node: &mut CondNode, _kind: GroupKind) {}

    fn delete_node(&self, _root: &mut CondNode, _id: NodeId) {}

    fn add_subgroup(&self, _node: &mut CondNode) {}

    fn add_condition(&self, _node: &mut CondNode, _kind: LeafKind) {}

    fn set_time_range(&self, _node: &mut CondNode, _range: TimeRange) {}

    fn set_aggregation(&self, _node: &mut CondNode, _aggregation: Aggregation) {}

    fn set_threshold(&self, _node: &mut CondNode, _threshold: u64) {}

    fn set_guard_level(&self, _node: &mut CondNode, _level: GuardLevel, _enabled: bool) {}

    fn set_gift_ref(&self, _node: &mut CondNode, _gift_ref: Option<GiftId>) {}
}
