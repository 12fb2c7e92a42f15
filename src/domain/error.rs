//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{LeafKind, NodeId};

/// Wire documents that cannot be turned into a condition tree.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("missing field `{field}` in {kind} condition")]
    MissingField { kind: String, field: &'static str },

    #[error("unknown condition kind: {0:?}")]
    UnknownKind(String),

    #[error("unknown aggregation: {0:?}")]
    UnknownAggregation(String),

    #[error("malformed timestamp in `{field}`: {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    #[error("invalid condition document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rule violations the backend would reject at campaign creation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("condition group {0} has no sub conditions")]
    EmptyGroup(NodeId),

    #[error("condition {0} ends before it starts")]
    InvertedTimeRange(NodeId),

    #[error("gift condition {0} has no gift selected")]
    GiftWithoutRef(NodeId),

    #[error("{kind} condition {id} needs a threshold of at least 1")]
    ThresholdTooLow { id: NodeId, kind: LeafKind },

    #[error("member condition {0} accepts no guard level")]
    NoGuardLevels(NodeId),
}

/// Domain errors represent business logic violations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
