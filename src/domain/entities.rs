//! Domain entities: the condition tree

use std::fmt;

use chrono::{NaiveDateTime, SubsecRound};

/// Session-local node identifier.
///
/// Only meaningful inside one editing session; never written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Boolean combinator of a group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    And,
    Or,
}

impl GroupKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            GroupKind::And => "and",
            GroupKind::Or => "or",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "and" => Some(GroupKind::And),
            "or" => Some(GroupKind::Or),
            _ => None,
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::And => write!(f, "AND"),
            GroupKind::Or => write!(f, "OR"),
        }
    }
}

/// Viewer activity a leaf condition measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeafKind {
    /// Membership (guard) purchases
    Member,
    /// Gifts of a specific gift id
    Gift,
    /// Paid super-chat messages
    SuperChat,
}

impl LeafKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            LeafKind::Member => "member",
            LeafKind::Gift => "gift",
            LeafKind::SuperChat => "sc",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "member" => Some(LeafKind::Member),
            "gift" => Some(LeafKind::Gift),
            "sc" => Some(LeafKind::SuperChat),
            _ => None,
        }
    }

    /// Threshold a freshly added condition starts with.
    pub fn default_threshold(&self) -> u64 {
        match self {
            LeafKind::SuperChat => 0,
            LeafKind::Member | LeafKind::Gift => 1,
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// How qualifying events inside the time window are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aggregation {
    /// Sum across the window must reach the threshold
    #[default]
    Total,
    /// A single event must reach the threshold
    Once,
}

impl Aggregation {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Aggregation::Total => "total",
            Aggregation::Once => "once",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "total" => Some(Aggregation::Total),
            "once" => Some(Aggregation::Once),
            _ => None,
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Guard tier as numbered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardLevel {
    /// Level 1
    Governor,
    /// Level 2
    Commander,
    /// Level 3
    Captain,
}

impl GuardLevel {
    pub const ALL: [GuardLevel; 3] = [
        GuardLevel::Governor,
        GuardLevel::Commander,
        GuardLevel::Captain,
    ];

    pub fn number(&self) -> i64 {
        match self {
            GuardLevel::Governor => 1,
            GuardLevel::Commander => 2,
            GuardLevel::Captain => 3,
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(GuardLevel::Governor),
            2 => Some(GuardLevel::Commander),
            3 => Some(GuardLevel::Captain),
            _ => None,
        }
    }
}

/// Guard tiers accepted by a member condition, one flag per tier for direct UI binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuardLevels {
    pub level1: bool,
    pub level2: bool,
    pub level3: bool,
}

impl GuardLevels {
    pub fn all() -> Self {
        Self {
            level1: true,
            level2: true,
            level3: true,
        }
    }

    pub fn none() -> Self {
        Self {
            level1: false,
            level2: false,
            level3: false,
        }
    }

    pub fn get(&self, level: GuardLevel) -> bool {
        match level {
            GuardLevel::Governor => self.level1,
            GuardLevel::Commander => self.level2,
            GuardLevel::Captain => self.level3,
        }
    }

    pub fn set(&mut self, level: GuardLevel, enabled: bool) {
        match level {
            GuardLevel::Governor => self.level1 = enabled,
            GuardLevel::Commander => self.level2 = enabled,
            GuardLevel::Captain => self.level3 = enabled,
        }
    }

    /// Enabled levels in ascending order.
    pub fn enabled(&self) -> Vec<GuardLevel> {
        GuardLevel::ALL
            .into_iter()
            .filter(|level| self.get(*level))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        !(self.level1 || self.level2 || self.level3)
    }
}

impl Default for GuardLevels {
    fn default() -> Self {
        Self::all()
    }
}

/// Backend gift identifier. Always positive; the wire uses `0` for "no gift".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GiftId(i64);

impl GiftId {
    /// `None` unless `id` is positive.
    pub fn new(id: i64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Activity window. `start <= end` is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeRange {
    /// Both ends are cut to whole seconds, the precision the wire keeps.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: start.trunc_subsecs(0),
            end: end.trunc_subsecs(0),
        }
    }

    /// Smallest window covering both.
    pub fn union(&self, other: &TimeRange) -> TimeRange {
        TimeRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Internal node combining sub-conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub id: NodeId,
    pub kind: GroupKind,
    /// Ordered; order survives edits and round trips
    pub children: Vec<CondNode>,
}

/// Activity threshold condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub id: NodeId,
    pub kind: LeafKind,
    pub time_range: TimeRange,
    pub aggregation: Aggregation,
    pub threshold: u64,
    /// Only meaningful for [`LeafKind::Gift`]
    pub gift_ref: Option<GiftId>,
    /// Only meaningful for [`LeafKind::Member`]
    pub guard_levels: GuardLevels,
}

/// A node of the condition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CondNode {
    Group(GroupNode),
    Leaf(LeafNode),
}

impl CondNode {
    pub fn id(&self) -> NodeId {
        match self {
            CondNode::Group(group) => group.id,
            CondNode::Leaf(leaf) => leaf.id,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, CondNode::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            CondNode::Group(group) => Some(group),
            CondNode::Leaf(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupNode> {
        match self {
            CondNode::Group(group) => Some(group),
            CondNode::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            CondNode::Leaf(leaf) => Some(leaf),
            CondNode::Group(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafNode> {
        match self {
            CondNode::Leaf(leaf) => Some(leaf),
            CondNode::Group(_) => None,
        }
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[CondNode] {
        match self {
            CondNode::Group(group) => &group.children,
            CondNode::Leaf(_) => &[],
        }
    }
}

impl From<GroupNode> for CondNode {
    fn from(group: GroupNode) -> Self {
        CondNode::Group(group)
    }
}

impl From<LeafNode> for CondNode {
    fn from(leaf: LeafNode) -> Self {
        CondNode::Leaf(leaf)
    }
}
