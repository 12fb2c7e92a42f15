//! Domain layer: the condition tree and everything that operates on it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod clock;
pub mod codec;
pub mod editor;
pub mod entities;
pub mod error;
pub mod ids;
pub mod query;
pub mod validate;
pub mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{decode, decode_json, encode};
pub use editor::{ConditionEditor, ReadOnlyEditor, TreeEditor};
pub use entities::*;
pub use error::{DecodeError, DomainError, DomainResult, ValidationError};
pub use ids::IdAllocator;
pub use validate::validate;
pub use wire::WireCondition;
