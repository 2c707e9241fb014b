//! Fatal error handling.
//!
//! The core never returns a `Result` from its state-mutating operations: a
//! window manager running as the X root client has nowhere sensible to
//! propagate failure to. Every error either is silently ignored (destroy for
//! an unmanaged window, a configure request for a window nobody tracks) or
//! it is fatal and the process dies.

use std::fmt;

use thiserror::Error;

/// Errors that abort startup or a running session outright.
///
/// Corresponds to spec's `FatalInit` and `FatalRuntime` kinds. `Ignorable`
/// and `ClientUnresponsive` are not represented here: the former is handled
/// by simply not constructing an error, the latter by the quit drain
/// hanging (documented limitation, not a typed failure).
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("cannot open display")]
    NoDisplay,

    #[error("another window manager is already running")]
    WmDetected,

    #[error("no screens associated with display")]
    NoScreen,

    #[error("cannot load font {0:?}")]
    FontLoad(String),

    #[error("cannot allocate color {0:?}")]
    ColorAlloc(String),

    #[error("out of memory")]
    OutOfMemory,
}

/// Prints `stupid: {msg}` to stdout and exits with status 1.
///
/// This is the single fatal-exit path described in spec's error-handling
/// design: startup failures, the append-time `OutOfMemory` case, and the
/// terminal state of the quit state machine all funnel through here.
pub fn die(msg: impl fmt::Display) -> ! {
    println!("stupid: {}", msg);
    std::process::exit(1);
}
