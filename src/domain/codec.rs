//! Conversion between the editable tree and the wire representation.
//!
//! Encoding collapses single-child groups into their child; decoding never
//! re-creates them. Ids are assigned on decode and never serialized.

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::domain::entities::{
    Aggregation, CondNode, GiftId, GroupKind, GroupNode, GuardLevel, GuardLevels, LeafKind,
    LeafNode, TimeRange,
};
use crate::domain::error::DecodeError;
use crate::domain::ids::IdAllocator;
use crate::domain::wire::WireCondition;

/// Compact wire timestamp layout: `YYYYMMDDHHmmss`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const TIMESTAMP_LEN: usize = 14;

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a compact timestamp. Anything but 14 digits forming a valid
/// calendar date and time is rejected.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if value.len() != TIMESTAMP_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// Encode a tree for the backend.
pub fn encode(node: &CondNode) -> WireCondition {
    match node {
        CondNode::Group(group) => {
            if let [only] = group.children.as_slice() {
                return encode(only);
            }
            WireCondition::group(
                group.kind.as_wire(),
                group.children.iter().map(encode).collect(),
            )
        }
        CondNode::Leaf(leaf) => encode_leaf(leaf),
    }
}

fn encode_leaf(leaf: &LeafNode) -> WireCondition {
    let guard_levels = leaf
        .guard_levels
        .enabled()
        .iter()
        .map(GuardLevel::number)
        .collect();

    WireCondition {
        kind: leaf.kind.as_wire().to_string(),
        sub_conditions: None,
        start_time: Some(format_timestamp(&leaf.time_range.start)),
        end_time: Some(format_timestamp(&leaf.time_range.end)),
        aggregation: Some(leaf.aggregation.as_wire().to_string()),
        threshold: Some(leaf.threshold),
        gift_ref: Some(leaf.gift_ref.map_or(0, GiftId::get)),
        guard_levels: Some(guard_levels),
    }
}

/// Decode a wire tree, drawing fresh ids from `ids`.
///
/// A group receives its id before its children, children in order.
#[instrument(level = "trace", skip_all, fields(kind = %wire.kind))]
pub fn decode(wire: &WireCondition, ids: &IdAllocator) -> Result<CondNode, DecodeError> {
    let before = ids.allocated();
    let node = decode_node(wire, ids)?;
    debug!("decode: {} nodes", ids.allocated() - before);
    Ok(node)
}

fn decode_node(wire: &WireCondition, ids: &IdAllocator) -> Result<CondNode, DecodeError> {
    if let Some(kind) = GroupKind::from_wire(&wire.kind) {
        let subs = wire
            .sub_conditions
            .as_ref()
            .ok_or_else(|| missing(wire, "sub_conditions"))?;
        let id = ids.next_id();
        let children = subs
            .iter()
            .map(|sub| decode_node(sub, ids))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(CondNode::Group(GroupNode { id, kind, children }));
    }

    let kind = LeafKind::from_wire(&wire.kind)
        .ok_or_else(|| DecodeError::UnknownKind(wire.kind.clone()))?;
    decode_leaf(wire, kind, ids).map(CondNode::Leaf)
}

fn decode_leaf(
    wire: &WireCondition,
    kind: LeafKind,
    ids: &IdAllocator,
) -> Result<LeafNode, DecodeError> {
    let start = decode_timestamp(wire, "start_time", wire.start_time.as_deref())?;
    let end = decode_timestamp(wire, "end_time", wire.end_time.as_deref())?;

    let aggregation = wire
        .aggregation
        .as_deref()
        .ok_or_else(|| missing(wire, "aggregation"))?;
    let aggregation = Aggregation::from_wire(aggregation)
        .ok_or_else(|| DecodeError::UnknownAggregation(aggregation.to_string()))?;

    let threshold = wire.threshold.ok_or_else(|| missing(wire, "threshold"))?;

    let gift_ref = wire.gift_ref.and_then(GiftId::new);

    // levels outside 1..=3 are ignored
    let mut guard_levels = GuardLevels::none();
    for level in wire
        .guard_levels
        .iter()
        .flatten()
        .filter_map(|n| GuardLevel::from_number(*n))
    {
        guard_levels.set(level, true);
    }

    Ok(LeafNode {
        id: ids.next_id(),
        kind,
        time_range: TimeRange::new(start, end),
        aggregation,
        threshold,
        gift_ref,
        guard_levels,
    })
}

fn decode_timestamp(
    wire: &WireCondition,
    field: &'static str,
    value: Option<&str>,
) -> Result<NaiveDateTime, DecodeError> {
    let value = value.ok_or_else(|| missing(wire, field))?;
    parse_timestamp(value).ok_or_else(|| DecodeError::MalformedTimestamp {
        field,
        value: value.to_string(),
    })
}

fn missing(wire: &WireCondition, field: &'static str) -> DecodeError {
    DecodeError::MissingField {
        kind: wire.kind.clone(),
        field,
    }
}

pub fn from_json(json: &str) -> Result<WireCondition, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

pub fn to_json(wire: &WireCondition) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(wire)
}

/// Parse and decode a JSON condition document in one step.
pub fn decode_json(json: &str, ids: &IdAllocator) -> Result<CondNode, DecodeError> {
    decode(&from_json(json)?, ids)
}
