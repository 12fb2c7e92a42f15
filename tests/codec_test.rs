//! Integration tests for decoding and encoding condition trees.

use chrono::NaiveDate;
use rstest::rstest;

use condtree::domain::codec::{self, decode_json, encode};
use condtree::domain::query::structural_eq;
use condtree::domain::{
    decode, Aggregation, CondNode, ConditionEditor, DecodeError, GiftId, GroupKind, GroupNode,
    GuardLevel, GuardLevels, IdAllocator, LeafKind, LeafNode, NodeId, TimeRange, TreeEditor,
    WireCondition,
};

fn leaf(ids: &IdAllocator, kind: LeafKind, threshold: u64) -> CondNode {
    let day = NaiveDate::from_ymd_opt(2023, 8, 19).unwrap();
    LeafNode {
        id: ids.next_id(),
        kind,
        time_range: TimeRange::new(
            day.and_hms_opt(0, 0, 0).unwrap(),
            day.and_hms_opt(23, 30, 0).unwrap(),
        ),
        aggregation: Aggregation::Total,
        threshold,
        gift_ref: GiftId::new(31036).filter(|_| kind == LeafKind::Gift),
        guard_levels: GuardLevels::all(),
    }
    .into()
}

fn group(ids: &IdAllocator, kind: GroupKind, children: Vec<CondNode>) -> CondNode {
    GroupNode {
        id: ids.next_id(),
        kind,
        children,
    }
    .into()
}

#[test]
fn given_and_group_with_member_leaf_when_decoding_then_builds_typed_tree() {
    // Arrange
    let json = r#"{"kind":"and","sub_conditions":[{"kind":"member",
        "start_time":"20230819000000","end_time":"20230820050000",
        "aggregation":"total","threshold":1,"guard_levels":[1,2],"gift_ref":0}]}"#;
    let ids = IdAllocator::new();

    // Act
    let root = decode_json(json, &ids).unwrap();

    // Assert
    let group = root.as_group().expect("root is a group");
    assert_eq!(group.kind, GroupKind::And);
    assert_eq!(group.children.len(), 1);

    let member = group.children[0].as_leaf().expect("child is a leaf");
    assert_eq!(member.kind, LeafKind::Member);
    assert_eq!(member.aggregation, Aggregation::Total);
    assert_eq!(member.threshold, 1);
    assert_eq!(member.gift_ref, None);
    assert!(member.guard_levels.get(GuardLevel::Governor));
    assert!(member.guard_levels.get(GuardLevel::Commander));
    assert!(!member.guard_levels.get(GuardLevel::Captain));
    assert_eq!(
        member.time_range.end,
        NaiveDate::from_ymd_opt(2023, 8, 20)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap()
    );
}

#[test]
fn given_nested_document_when_decoding_then_ids_are_preorder() {
    let json = r#"{"kind":"or","sub_conditions":[
        {"kind":"and","sub_conditions":[
            {"kind":"sc","start_time":"20230819000000","end_time":"20230820050000","aggregation":"once","threshold":30},
            {"kind":"gift","start_time":"20230819000000","end_time":"20230820050000","aggregation":"total","threshold":5,"gift_ref":7}]},
        {"kind":"member","start_time":"20230819000000","end_time":"20230820050000","aggregation":"total","threshold":1,"guard_levels":[3]}]}"#;
    let ids = IdAllocator::new();

    let root = decode_json(json, &ids).unwrap();

    let visited: Vec<NodeId> = condtree::domain::query::iter(&root)
        .map(CondNode::id)
        .collect();
    assert_eq!(
        visited,
        vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
    );
    assert_eq!(ids.allocated(), 5);
}

#[test]
fn given_single_child_group_when_encoding_then_collapses_to_child() {
    let ids = IdAllocator::new();
    let child = leaf(&ids, LeafKind::SuperChat, 50);
    let expected = encode(&child);
    let wrapped = group(&ids, GroupKind::Or, vec![child]);

    assert_eq!(encode(&wrapped), expected);
}

#[test]
fn given_nested_singleton_groups_when_encoding_then_collapses_every_level() {
    let ids = IdAllocator::new();
    let inner = group(
        &ids,
        GroupKind::Or,
        vec![leaf(&ids, LeafKind::Member, 1), leaf(&ids, LeafKind::Gift, 3)],
    );
    let expected = encode(&inner);
    let outer = group(
        &ids,
        GroupKind::And,
        vec![group(&ids, GroupKind::Or, vec![inner])],
    );

    assert_eq!(encode(&outer), expected);
}

#[test]
fn given_empty_group_when_encoding_then_keeps_empty_sub_conditions() {
    let ids = IdAllocator::new();
    let empty = group(&ids, GroupKind::Or, vec![]);

    let wire = encode(&empty);

    assert_eq!(wire, WireCondition::group("or", vec![]));
}

#[rstest]
#[case::flat_or(GroupKind::Or)]
#[case::flat_and(GroupKind::And)]
fn given_tree_without_singletons_when_round_tripping_then_structure_survives(
    #[case] kind: GroupKind,
) {
    // Arrange
    let ids = IdAllocator::new();
    let mut member = leaf(&ids, LeafKind::Member, 1);
    if let Some(m) = member.as_leaf_mut() {
        m.guard_levels.set(GuardLevel::Commander, false);
        m.aggregation = Aggregation::Once;
    }
    let tree = group(
        &ids,
        kind,
        vec![
            member,
            group(
                &ids,
                GroupKind::And,
                vec![leaf(&ids, LeafKind::Gift, 10), leaf(&ids, LeafKind::SuperChat, 0)],
            ),
        ],
    );

    // Act
    let decoded = decode(&encode(&tree), &IdAllocator::new()).unwrap();

    // Assert
    assert!(structural_eq(&tree, &decoded));
}

#[test]
fn given_leaf_when_encoding_then_guard_levels_are_ascending() {
    let ids = IdAllocator::new();
    let mut node = leaf(&ids, LeafKind::Member, 1);
    if let Some(m) = node.as_leaf_mut() {
        m.guard_levels = GuardLevels::none();
        m.guard_levels.set(GuardLevel::Captain, true);
        m.guard_levels.set(GuardLevel::Governor, true);
    }

    let wire = encode(&node);

    assert_eq!(wire.guard_levels, Some(vec![1, 3]));
    assert_eq!(wire.sub_conditions, None);
}

#[test]
fn given_absent_gift_ref_when_encoding_then_writes_zero() {
    let ids = IdAllocator::new();
    let node = leaf(&ids, LeafKind::SuperChat, 0);

    let wire = encode(&node);

    assert_eq!(wire.gift_ref, Some(0));
    assert_eq!(wire.threshold, Some(0));
    assert_eq!(wire.start_time.as_deref(), Some("20230819000000"));
    assert_eq!(wire.end_time.as_deref(), Some("20230819233000"));
}

#[test]
fn given_out_of_range_guard_levels_when_decoding_then_ignores_them() {
    let json = r#"{"kind":"member","start_time":"20230819000000","end_time":"20230820050000",
        "aggregation":"total","threshold":1,"guard_levels":[0,2,4,-1]}"#;

    let root = decode_json(json, &IdAllocator::new()).unwrap();

    let member = root.as_leaf().unwrap();
    assert_eq!(member.guard_levels.enabled(), vec![GuardLevel::Commander]);
}

#[test]
fn given_missing_guard_levels_when_decoding_then_all_flags_are_false() {
    let json = r#"{"kind":"sc","start_time":"20230819000000","end_time":"20230820050000",
        "aggregation":"once","threshold":100}"#;

    let root = decode_json(json, &IdAllocator::new()).unwrap();

    let sc = root.as_leaf().unwrap();
    assert!(sc.guard_levels.is_empty());
    assert_eq!(sc.aggregation, Aggregation::Once);
}

#[rstest]
#[case::unknown_kind(
    r#"{"kind":"xor","sub_conditions":[]}"#,
    "unknown condition kind"
)]
#[case::group_without_children(r#"{"kind":"and"}"#, "sub_conditions")]
#[case::missing_threshold(
    r#"{"kind":"sc","start_time":"20230819000000","end_time":"20230820050000","aggregation":"once"}"#,
    "threshold"
)]
#[case::missing_start(
    r#"{"kind":"sc","end_time":"20230820050000","aggregation":"once","threshold":1}"#,
    "start_time"
)]
#[case::bad_aggregation(
    r#"{"kind":"sc","start_time":"20230819000000","end_time":"20230820050000","aggregation":"sum","threshold":1}"#,
    "unknown aggregation"
)]
#[case::bad_timestamp(
    r#"{"kind":"sc","start_time":"2023-08-19","end_time":"20230820050000","aggregation":"once","threshold":1}"#,
    "malformed timestamp"
)]
#[case::not_json("{kind:", "invalid condition document")]
fn given_invalid_document_when_decoding_then_reports_cause(
    #[case] json: &str,
    #[case] expected: &str,
) {
    let err = decode_json(json, &IdAllocator::new()).unwrap_err();

    assert!(
        err.to_string().contains(expected),
        "expected {:?} in {:?}",
        expected,
        err.to_string()
    );
}

#[test]
fn given_missing_field_when_decoding_then_names_kind_and_field() {
    let json = r#"{"kind":"gift","start_time":"20230819000000","aggregation":"total","threshold":1}"#;

    let err = decode_json(json, &IdAllocator::new()).unwrap_err();

    match err {
        DecodeError::MissingField { kind, field } => {
            assert_eq!(kind, "gift");
            assert_eq!(field, "end_time");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_encoded_tree_when_serializing_then_omits_absent_fields() {
    let ids = IdAllocator::new();
    let tree = group(&ids, GroupKind::And, vec![]);

    let json = codec::to_json(&encode(&tree)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value, serde_json::json!({"kind": "and", "sub_conditions": []}));
}

#[test]
fn given_tree_built_with_system_clock_when_round_tripping_then_structure_survives() {
    // Arrange
    let ids = IdAllocator::new();
    let ed = TreeEditor::new(&ids);
    let mut root: CondNode = ed.new_group().into();
    ed.add_condition(&mut root, LeafKind::Member);
    ed.add_condition(&mut root, LeafKind::SuperChat);

    // Act
    let decoded = decode(&encode(&root), &IdAllocator::new()).unwrap();

    // Assert
    assert!(structural_eq(&root, &decoded));
}

#[test]
fn given_sub_second_instants_when_building_range_then_keeps_whole_seconds() {
    let day = NaiveDate::from_ymd_opt(2023, 8, 19).unwrap();

    let range = TimeRange::new(
        day.and_hms_nano_opt(0, 0, 0, 999_999_999).unwrap(),
        day.and_hms_milli_opt(23, 30, 0, 500).unwrap(),
    );

    assert_eq!(range.start, day.and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(range.end, day.and_hms_opt(23, 30, 0).unwrap());
}

#[test]
fn given_largest_gift_id_when_round_tripping_then_value_is_kept() {
    // Arrange
    let ids = IdAllocator::new();
    let mut node = leaf(&ids, LeafKind::Gift, 1);
    if let Some(gift) = node.as_leaf_mut() {
        gift.gift_ref = GiftId::new(i64::MAX);
    }

    // Act
    let wire = encode(&node);
    let decoded = decode(&wire, &IdAllocator::new()).unwrap();

    // Assert
    assert_eq!(wire.gift_ref, Some(i64::MAX));
    assert_eq!(decoded.as_leaf().unwrap().gift_ref, GiftId::new(i64::MAX));
    assert!(structural_eq(&node, &decoded));
}

#[rstest]
#[case::zero(0)]
#[case::negative(-1)]
#[case::most_negative(i64::MIN)]
fn given_non_positive_gift_ref_when_decoding_then_gift_is_absent(#[case] gift_ref: i64) {
    let json = format!(
        r#"{{"kind":"gift","start_time":"20230819000000","end_time":"20230820050000",
        "aggregation":"total","threshold":1,"gift_ref":{gift_ref}}}"#
    );

    let root = decode_json(&json, &IdAllocator::new()).unwrap();

    assert_eq!(GiftId::new(gift_ref), None);
    assert_eq!(root.as_leaf().unwrap().gift_ref, None);
}
