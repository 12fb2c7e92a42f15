//! condtree: audience-qualification condition trees for livestream reward campaigns.
//!
//! A rule is a tree of AND/OR groups over member, gift and super-chat
//! conditions. The crate decodes the backend's JSON rule into an
//! id-addressed tree, edits it, and encodes it back.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
