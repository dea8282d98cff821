use nix::errno::Errno;
use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Failures raised by the interpreter pipeline.
///
/// [`ShellError::Alloc`] and [`ShellError::Io`] come from the line reader or the
/// tokenizer and end the whole interpreter. The others come from launching an
/// external program; the dispatcher reports them and keeps the loop running.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A buffer could not grow to hold the rest of the input.
    #[error("allocation error: {0}")]
    Alloc(#[from] TryReserveError),

    /// The terminal stream could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The interpreter process could not be duplicated.
    #[error("fork: {0}")]
    Fork(Errno),

    /// The status of a spawned child could not be observed.
    #[error("wait: {0}")]
    Wait(Errno),

    /// An argument cannot be passed to the program loader.
    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),
}
