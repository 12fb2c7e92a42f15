//! Tests for pre-save rule validation

use rstest::rstest;

use condtree::domain::codec::decode_json;
use condtree::domain::{validate, IdAllocator, LeafKind, NodeId, ValidationError};

fn sc(threshold: u64) -> String {
    format!(
        r#"{{"kind":"sc","start_time":"20230819000000","end_time":"20230820050000","aggregation":"once","threshold":{}}}"#,
        threshold
    )
}

#[test]
fn given_complete_rule_when_validating_then_passes() {
    let json = format!(
        r#"{{"kind":"or","sub_conditions":[{},
            {{"kind":"gift","start_time":"20230819000000","end_time":"20230820050000","aggregation":"total","threshold":3,"gift_ref":31036}},
            {{"kind":"member","start_time":"20230819000000","end_time":"20230820050000","aggregation":"total","threshold":0,"guard_levels":[3]}}]}}"#,
        sc(30)
    );
    let root = decode_json(&json, &IdAllocator::new()).unwrap();

    assert_eq!(validate(&root), Ok(()));
}

#[rstest]
#[case::empty_group(
    r#"{"kind":"or","sub_conditions":[]}"#.to_string(),
    ValidationError::EmptyGroup(NodeId(0))
)]
#[case::inverted_range(
    r#"{"kind":"sc","start_time":"20230821000000","end_time":"20230820050000","aggregation":"once","threshold":1}"#.to_string(),
    ValidationError::InvertedTimeRange(NodeId(0))
)]
#[case::gift_without_ref(
    r#"{"kind":"gift","start_time":"20230819000000","end_time":"20230820050000","aggregation":"total","threshold":1,"gift_ref":0}"#.to_string(),
    ValidationError::GiftWithoutRef(NodeId(0))
)]
#[case::zero_sc_threshold(
    sc(0),
    ValidationError::ThresholdTooLow { id: NodeId(0), kind: LeafKind::SuperChat }
)]
#[case::member_without_levels(
    r#"{"kind":"member","start_time":"20230819000000","end_time":"20230820050000","aggregation":"total","threshold":1,"guard_levels":[]}"#.to_string(),
    ValidationError::NoGuardLevels(NodeId(0))
)]
fn given_broken_rule_when_validating_then_reports_problem(
    #[case] json: String,
    #[case] expected: ValidationError,
) {
    let root = decode_json(&json, &IdAllocator::new()).unwrap();

    assert_eq!(validate(&root), Err(expected));
}

#[test]
fn given_several_problems_when_validating_then_reports_first_in_preorder() {
    let json = format!(
        r#"{{"kind":"and","sub_conditions":[{},{{"kind":"or","sub_conditions":[]}}]}}"#,
        sc(0)
    );
    let root = decode_json(&json, &IdAllocator::new()).unwrap();

    let err = validate(&root).unwrap_err();

    assert_eq!(
        err,
        ValidationError::ThresholdTooLow {
            id: NodeId(1),
            kind: LeafKind::SuperChat
        }
    );
    assert!(err.to_string().contains("sc condition #1"));
}
