use crate::PROGRAM;
use crate::builtin::BuiltinTable;
use crate::command::{Launch, LoopStatus};
use crate::launcher::LaunchOutcome;
use crate::tokenizer::Args;
use log::{debug, info, warn};
use std::fmt;
use std::io::Write;

/// Routes an argument vector to a builtin handler or to the launcher.
///
/// Builtins decide whether the loop continues. External programs never do: their
/// exit status is logged and the loop always continues.
pub struct Dispatcher<'t, L> {
    table: &'t BuiltinTable,
    launcher: L,
}

impl<'t, L: Launch> Dispatcher<'t, L> {
    pub fn new(table: &'t BuiltinTable, launcher: L) -> Self {
        Self { table, launcher }
    }

    /// Execute one command. Builtins write their output to `out`; launched programs
    /// inherit the interpreter's standard streams. Failures of either kind are
    /// reported once on `err`, prefixed with the interpreter's name.
    pub fn execute(
        &self,
        args: &Args<'_>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> LoopStatus {
        let Some(name) = args.command() else {
            return LoopStatus::Continue;
        };
        let display_name = name.to_string_lossy();

        if let Some(handler) = self.table.lookup(name) {
            debug!("builtin {}", display_name);
            return match handler(args, out) {
                Ok(status) => status,
                Err(error) => {
                    report(err, format_args!("{:#}", error));
                    LoopStatus::Continue
                }
            };
        }

        // output written so far must reach the terminal before the child does
        if let Err(error) = out.flush() {
            debug!("flush before launching {} failed: {}", display_name, error);
        }

        debug!("launching {:?}", args.as_slice());
        match self.launcher.launch(args) {
            Ok(LaunchOutcome::Exited(0)) => debug!("{} exited successfully", display_name),
            Ok(LaunchOutcome::Exited(code)) => {
                info!("{} exited with status {}", display_name, code)
            }
            Ok(LaunchOutcome::Signaled(signal)) => {
                warn!("{} terminated by {}", display_name, signal.as_str())
            }
            Err(error) => report(err, format_args!("{}", error)),
        }
        LoopStatus::Continue
    }
}

fn report(err: &mut dyn Write, message: fmt::Arguments<'_>) {
    let _ = writeln!(err, "{}: {}", PROGRAM, message).and_then(|()| err.flush());
}
