//! Pre-save rule checks, matching what the backend rejects on campaign creation.

use crate::domain::entities::{CondNode, LeafKind, LeafNode};
use crate::domain::error::ValidationError;
use crate::domain::query;

/// First problem found in pre-order, if any.
pub fn validate(root: &CondNode) -> Result<(), ValidationError> {
    for node in query::iter(root) {
        match node {
            CondNode::Group(group) if group.children.is_empty() => {
                return Err(ValidationError::EmptyGroup(group.id));
            }
            CondNode::Group(_) => {}
            CondNode::Leaf(leaf) => validate_leaf(leaf)?,
        }
    }
    Ok(())
}

fn validate_leaf(leaf: &LeafNode) -> Result<(), ValidationError> {
    if leaf.time_range.start > leaf.time_range.end {
        return Err(ValidationError::InvertedTimeRange(leaf.id));
    }
    match leaf.kind {
        LeafKind::Gift => {
            if leaf.gift_ref.is_none() {
                return Err(ValidationError::GiftWithoutRef(leaf.id));
            }
            if leaf.threshold < 1 {
                return Err(ValidationError::ThresholdTooLow {
                    id: leaf.id,
                    kind: leaf.kind,
                });
            }
        }
        LeafKind::SuperChat => {
            if leaf.threshold < 1 {
                return Err(ValidationError::ThresholdTooLow {
                    id: leaf.id,
                    kind: leaf.kind,
                });
            }
        }
        LeafKind::Member => {
            if leaf.guard_levels.is_empty() {
                return Err(ValidationError::NoGuardLevels(leaf.id));
            }
        }
    }
    Ok(())
}
