//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{Aggregation, GroupKind, LeafKind};

/// Audience-qualification condition trees: inspect, check, edit, pull and push campaign rules
#[derive(Parser, Debug)]
#[command(name = "condtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Local config file, layered over the global one
    #[arg(short, long, global = true, env = "CONDTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a rule as a tree, with node ids
    Show {
        /// Rule file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Check a rule against the backend's creation rules
    Check {
        /// Rule file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Decode and re-encode a rule (collapses single-child groups)
    Normalize {
        /// Rule file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print an empty rule
    New,

    /// Tell whether any condition of a kind is present
    Has {
        /// Rule file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Condition kind
        #[arg(value_enum)]
        kind: LeafKindArg,
    },

    /// Apply one edit to a rule; ids are those printed by `show`
    Edit {
        /// Rule file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write the result back instead of printing it
        #[arg(short, long)]
        in_place: bool,
        #[command(subcommand)]
        op: EditOp,
    },

    /// Fetch a campaign and show its rule
    Pull {
        /// Campaign id
        id: i64,
        /// Print the rule as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Create a campaign with a rule
    Push {
        /// Rule file (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Campaign name
        #[arg(long)]
        name: String,
        /// Reward description
        #[arg(long, default_value = "")]
        reward: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum EditOp {
    /// Append a condition to a group
    AddCondition {
        group: u64,
        #[arg(value_enum)]
        kind: LeafKindArg,
    },

    /// Append an empty OR group to a group
    AddGroup { group: u64 },

    /// Delete a node (the root stays)
    Delete { node: u64 },

    /// Set a group's combinator
    SetKind {
        group: u64,
        #[arg(value_enum)]
        kind: GroupKindArg,
    },

    /// Set a condition's threshold
    SetThreshold { node: u64, threshold: u64 },

    /// Set how events in the window are combined
    SetAggregation {
        node: u64,
        #[arg(value_enum)]
        aggregation: AggregationArg,
    },

    /// Set a gift condition's gift id (0 clears it)
    SetGift {
        node: u64,
        #[arg(value_parser = clap::value_parser!(i64).range(0..))]
        gift: i64,
    },

    /// Enable or disable a guard level of a member condition
    SetGuard {
        node: u64,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        level: u8,
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },

    /// Set a condition's time window (YYYYMMDDHHmmss)
    SetTime {
        node: u64,
        start: String,
        end: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a template config file
    Template,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKindArg {
    Member,
    Gift,
    Sc,
}

impl From<LeafKindArg> for LeafKind {
    fn from(arg: LeafKindArg) -> Self {
        match arg {
            LeafKindArg::Member => LeafKind::Member,
            LeafKindArg::Gift => LeafKind::Gift,
            LeafKindArg::Sc => LeafKind::SuperChat,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKindArg {
    And,
    Or,
}

impl From<GroupKindArg> for GroupKind {
    fn from(arg: GroupKindArg) -> Self {
        match arg {
            GroupKindArg::And => GroupKind::And,
            GroupKindArg::Or => GroupKind::Or,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationArg {
    Total,
    Once,
}

impl From<AggregationArg> for Aggregation {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::Total => Aggregation::Total,
            AggregationArg::Once => Aggregation::Once,
        }
    }
}
