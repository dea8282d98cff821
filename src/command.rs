use crate::error::ShellError;
use crate::launcher::LaunchOutcome;
use crate::tokenizer::Args;
use std::io::Write;

/// Whether the interpreter loop keeps reading input after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStatus {
    Continue,
    Stop,
}

/// Signature of a builtin command.
///
/// A handler receives the full argument vector (the command name included) and a
/// stream for its regular output. Returning an error reports it and continues the loop.
pub type Handler = fn(&Args<'_>, &mut dyn Write) -> anyhow::Result<LoopStatus>;

/// Runs an external program to completion.
///
/// Implemented by [`crate::ProcessLauncher`]; the dispatcher only depends on this trait.
pub trait Launch {
    /// Run the program named by the first argument and wait until it has exited or
    /// was killed by a signal.
    fn launch(&self, args: &Args<'_>) -> Result<LaunchOutcome, ShellError>;
}

impl<L: Launch + ?Sized> Launch for &L {
    fn launch(&self, args: &Args<'_>) -> Result<LaunchOutcome, ShellError> {
        (**self).launch(args)
    }
}
