//! Wire representation exchanged with the backend.

use serde::{Deserialize, Serialize};

/// One condition as the backend stores it.
///
/// Groups carry `kind` and `sub_conditions`; leaves carry the remaining
/// fields. Kinds stay strings here so unknown values surface as decode
/// errors instead of opaque JSON failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCondition {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_conditions: Option<Vec<WireCondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,

    /// `0` means "not applicable"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_ref: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard_levels: Option<Vec<i64>>,
}

impl WireCondition {
    pub fn group(kind: &str, sub_conditions: Vec<WireCondition>) -> Self {
        Self {
            kind: kind.to_string(),
            sub_conditions: Some(sub_conditions),
            ..Self::default()
        }
    }
}
