//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (undecodable or invalid rule)
pub const DATAERR: i32 = 65;

/// Service unavailable (backend unreachable or refusing)
pub const UNAVAILABLE: i32 = 69;

/// Input/output error
pub const IOERR: i32 = 74;

/// Permission denied (session missing or expired)
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;
