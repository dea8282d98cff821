//! REPL (Read-Eval-Print Loop)
//!
//! Reads a line, splits it into arguments, dispatches it and repeats until a builtin
//! asks to stop or the input ends.

use crate::builtin::BuiltinTable;
use crate::command::{Launch, LoopStatus};
use crate::dispatch::Dispatcher;
use crate::error::ShellError;
use crate::reader::LineReader;
use crate::tokenizer::split_line;
use log::{debug, info};
use std::env;
use std::io::{Read, Write};

/// The interactive interpreter loop.
///
/// Example
/// ```
/// use lsh::{BuiltinTable, ProcessLauncher, Repl};
///
/// let table = BuiltinTable::default();
/// let mut repl = Repl::new(&b"help\nexit\nhelp\n"[..], &table, ProcessLauncher).with_prompt(false);
/// let mut out = Vec::new();
/// repl.run(&mut out, &mut std::io::sink()).unwrap();
///
/// let out = String::from_utf8(out).unwrap();
/// assert_eq!(out.matches("built in").count(), 1);
/// ```
pub struct Repl<'t, R, L> {
    reader: LineReader<R>,
    dispatcher: Dispatcher<'t, L>,
    prompt: bool,
}

impl<'t, R: Read, L: Launch> Repl<'t, R, L> {
    /// Create a loop reading from `input`, with the prompt enabled.
    pub fn new(input: R, table: &'t BuiltinTable, launcher: L) -> Self {
        Self {
            reader: LineReader::new(input),
            dispatcher: Dispatcher::new(table, launcher),
            prompt: true,
        }
    }

    /// Enable or disable the working-directory prompt.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Run until `exit` or the end of the input.
    ///
    /// Both ways of stopping are a success. Command output goes to `out` and
    /// per-command diagnostics to `err`. Errors are returned only when the input
    /// cannot be read or a buffer cannot grow, and they end the interpreter.
    pub fn run<W: Write, E: Write>(
        &mut self,
        out: &mut W,
        err: &mut E,
    ) -> Result<(), ShellError> {
        loop {
            if self.prompt {
                print_prompt(out)?;
            }

            let Some(line) = self.reader.read_line()? else {
                info!("end of input");
                return Ok(());
            };
            let args = split_line(&line)?;
            debug!("arguments: {:?}", args.as_slice());

            let status = self.dispatcher.execute(&args, out, err);
            out.flush()?;
            if status == LoopStatus::Stop {
                info!("exit requested");
                return Ok(());
            }
        }
    }
}

/// Print `<cwd> ~ `, or nothing if the current directory is unavailable.
fn print_prompt<W: Write>(out: &mut W) -> Result<(), ShellError> {
    if let Ok(cwd) = env::current_dir() {
        write!(out, "{} ~ ", cwd.display())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::RecordingLauncher;
    use std::io::{self, Cursor};

    fn run_script(script: &str, launcher: &RecordingLauncher) -> String {
        let table = BuiltinTable::default();
        let mut repl =
            Repl::new(Cursor::new(script.as_bytes().to_vec()), &table, launcher).with_prompt(false);
        let mut out = Vec::new();
        repl.run(&mut out, &mut io::sink()).unwrap();
        String::from_utf8(out).unwrap()
    }

    struct BrokenInput;

    impl Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("terminal gone"))
        }
    }

    #[test]
    fn test_read_failure_ends_interpreter_with_error() {
        let table = BuiltinTable::default();
        let launcher = RecordingLauncher::default();
        let mut repl = Repl::new(BrokenInput, &table, &launcher).with_prompt(false);
        let err = repl.run(&mut Vec::new(), &mut io::sink()).unwrap_err();
        assert!(matches!(err, ShellError::Io(_)));
    }

    #[test]
    fn test_exit_stops_reading() {
        let launcher = RecordingLauncher::default();
        let out = run_script("exit\nls\nhelp\n", &launcher);
        assert!(out.is_empty());
        assert!(launcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_end_of_input_stops() {
        let launcher = RecordingLauncher::default();
        let out = run_script("", &launcher);
        assert!(out.is_empty());
    }

    #[test]
    fn test_repeated_help_is_identical() {
        let launcher = RecordingLauncher::default();
        let once = run_script("help\n", &launcher);
        let twice = run_script("help\nhelp\n", &launcher);
        assert!(!once.is_empty());
        assert_eq!(twice, format!("{}{}", once, once));
    }

    #[test]
    fn test_blank_lines_and_commands_in_order() {
        let launcher = RecordingLauncher::default();
        run_script("\n   \nls  -la   /tmp\necho 'a b'\n", &launcher);
        assert_eq!(
            *launcher.calls.borrow(),
            vec![vec!["ls", "-la", "/tmp"], vec!["echo", "a", "b"]]
        );
    }

    #[test]
    fn test_unterminated_last_line_is_not_run() {
        let launcher = RecordingLauncher::default();
        run_script("true\nfalse", &launcher);
        assert_eq!(*launcher.calls.borrow(), vec![vec!["true"]]);
    }

    #[test]
    fn test_prompt_shows_current_dir() {
        let table = BuiltinTable::default();
        let launcher = RecordingLauncher::default();
        let mut repl = Repl::new(Cursor::new(b"exit\n".to_vec()), &table, &launcher);
        let mut out = Vec::new();
        repl.run(&mut out, &mut io::sink()).unwrap();

        let cwd = env::current_dir().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{} ~ ", cwd.display()));
    }
}
