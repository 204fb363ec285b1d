//! Exit codes of the `hierarchy` binary (BSD sysexits.h compatible)

/// Command line usage error, e.g. no subcommand
pub const USAGE: i32 = 64;

/// Record file unparsable or its parent chains loop
pub const DATAERR: i32 = 65;

/// Record file missing or unreadable
pub const NOINPUT: i32 = 66;

/// Config file missing or invalid
pub const CONFIG: i32 = 78;
