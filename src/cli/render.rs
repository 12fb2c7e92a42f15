//! Tree rendering for terminal display

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{CondNode, GuardLevel, LeafKind, LeafNode};

pub fn to_tree(node: &CondNode) -> Tree<String> {
    match node {
        CondNode::Group(group) => Tree::new(format!("{} {}", group.id, group.kind))
            .with_leaves(group.children.iter().map(to_tree)),
        CondNode::Leaf(leaf) => Tree::new(describe_leaf(leaf)),
    }
}

/// One-line summary, e.g. `#2 gift once >= 1000 gift=5 [2023-08-19 00:00:00 .. 2023-08-20 05:00:00]`.
pub fn describe_leaf(leaf: &LeafNode) -> String {
    let mut line = format!(
        "{} {} {} >= {}",
        leaf.id, leaf.kind, leaf.aggregation, leaf.threshold
    );
    match leaf.kind {
        LeafKind::Gift => match leaf.gift_ref {
            Some(gift) => line.push_str(&format!(" gift={}", gift)),
            None => line.push_str(" gift=?"),
        },
        LeafKind::Member => {
            let levels = leaf
                .guard_levels
                .enabled()
                .iter()
                .map(GuardLevel::number)
                .join(",");
            line.push_str(&format!(" guards=[{}]", levels));
        }
        LeafKind::SuperChat => {}
    }
    line.push_str(&format!(
        " [{} .. {}]",
        leaf.time_range.start, leaf.time_range.end
    ));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{codec, IdAllocator};

    #[test]
    fn given_member_leaf_when_describing_then_lists_enabled_levels() {
        let ids = IdAllocator::new();
        let node = codec::decode_json(
            r#"{"kind":"member","start_time":"20230819000000","end_time":"20230820050000",
                "aggregation":"total","threshold":1,"gift_ref":0,"guard_levels":[1,3]}"#,
            &ids,
        )
        .unwrap();
        let leaf = node.as_leaf().unwrap();
        assert_eq!(
            describe_leaf(leaf),
            "#0 member total >= 1 guards=[1,3] [2023-08-19 00:00:00 .. 2023-08-20 05:00:00]"
        );
    }

    #[test]
    fn given_group_when_rendering_then_children_appear_in_order() {
        let ids = IdAllocator::new();
        let node = codec::decode_json(
            r#"{"kind":"or","sub_conditions":[
                {"kind":"sc","start_time":"20230819000000","end_time":"20230820050000",
                 "aggregation":"once","threshold":100},
                {"kind":"gift","start_time":"20230819000000","end_time":"20230820050000",
                 "aggregation":"total","threshold":10,"gift_ref":5}]}"#,
            &ids,
        )
        .unwrap();
        let rendered = to_tree(&node).to_string();
        let sc = rendered.find("#1 sc").unwrap();
        let gift = rendered.find("#2 gift").unwrap();
        assert!(rendered.starts_with("#0 OR"));
        assert!(sc < gift);
        assert!(rendered.contains("gift=5"));
    }
}
