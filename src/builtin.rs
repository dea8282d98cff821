use crate::command::{Handler, LoopStatus};
use crate::tokenizer::Args;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

/// A builtin command: the name it is invoked by and the function that runs it.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub handler: Handler,
}

/// Ordered, read-only mapping from command name to builtin handler.
///
/// The table is built once and consulted before any external program is launched.
/// Lookup scans the entries in order and the first exact match wins, so the order
/// of the entries is their dispatch priority.
pub struct BuiltinTable {
    entries: Vec<Builtin>,
}

impl BuiltinTable {
    /// Build a table from an explicit list of builtins.
    pub fn new(entries: Vec<Builtin>) -> Self {
        Self { entries }
    }

    /// Find the handler registered for `name`.
    pub fn lookup<S: AsRef<OsStr> + ?Sized>(&self, name: &S) -> Option<Handler> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|builtin| name == builtin.name)
            .map(|builtin| builtin.handler)
    }

    #[cfg(test)]
    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|builtin| builtin.name)
    }
}

impl Default for BuiltinTable {
    /// The interpreter's builtins: `cr`, `help`, `exit` and `op`.
    fn default() -> Self {
        Self::new(vec![
            Builtin { name: "cr", handler: cr },
            Builtin { name: "help", handler: help },
            Builtin { name: "exit", handler: exit },
            Builtin { name: "op", handler: op },
        ])
    }
}

const HELP_TEXT: &str = "
*******************************************

lsh, a minimal command interpreter
___________________________________________

Type a program name and its arguments, then hit enter.
Arguments are separated by blanks; quotes are not interpreted.
The following commands are built in:

\t1. help
\t2. exit
\t3. op (path...)
\t4. cr (path...)

Type 'op --man' or 'cr --man' for details, or 'man <program>'
for information on other programs.

";

/// Print the static usage text.
pub fn help(_args: &Args<'_>, out: &mut dyn Write) -> Result<LoopStatus> {
    out.write_all(HELP_TEXT.as_bytes())?;
    Ok(LoopStatus::Continue)
}

/// Stop the interpreter. Arguments are ignored.
pub fn exit(_args: &Args<'_>, _out: &mut dyn Write) -> Result<LoopStatus> {
    Ok(LoopStatus::Stop)
}

/// Parse the arguments of a builtin with argh.
///
/// `--help` output and usage errors are written to `out` and yield `None`; the
/// builtin then has nothing left to do. Arguments that are not valid UTF-8 are an
/// error, since argh only parses text.
fn parse_args<T: FromArgs>(args: &Args<'_>, out: &mut dyn Write) -> Result<Option<T>> {
    let Some((name, rest)) = args.split_command() else {
        return Ok(None);
    };
    let name = name.to_string_lossy();
    let rest = rest
        .iter()
        .map(|arg| {
            arg.to_str().with_context(|| {
                format!("{}: argument is not valid UTF-8: {}", name, arg.to_string_lossy())
            })
        })
        .collect::<Result<Vec<&str>>>()?;
    match T::from_args(&[&*name], &rest) {
        Ok(cmd) => Ok(Some(cmd)),
        Err(EarlyExit { output, status: _ }) => {
            writeln!(out, "{}", output.trim_end())?;
            Ok(None)
        }
    }
}

#[derive(FromArgs)]
/// Create the named files. Existing files are left untouched.
struct Cr {
    #[argh(switch)]
    /// print the manual of cr
    man: bool,

    #[argh(positional, greedy)]
    /// files to create
    paths: Vec<String>,
}

const CR_MANUAL: &str = "cr - create files

usage: cr <path>...

Creates every named file that does not exist yet.
Paths are absolute or relative to the current directory.
";

/// Builtin `cr`: create files.
pub fn cr(args: &Args<'_>, out: &mut dyn Write) -> Result<LoopStatus> {
    let Some(cmd) = parse_args::<Cr>(args, out)? else {
        return Ok(LoopStatus::Continue);
    };
    if cmd.man {
        out.write_all(CR_MANUAL.as_bytes())?;
        return Ok(LoopStatus::Continue);
    }
    if cmd.paths.is_empty() {
        writeln!(out, "usage: cr <path>...")?;
        return Ok(LoopStatus::Continue);
    }
    for path in &cmd.paths {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cr: cannot create {}", path))?;
    }
    Ok(LoopStatus::Continue)
}

#[derive(FromArgs)]
/// Print the contents of the named files.
struct Op {
    #[argh(switch)]
    /// print the manual of op
    man: bool,

    #[argh(positional, greedy)]
    /// files to open
    paths: Vec<String>,
}

const OP_MANUAL: &str = "op - open files

usage: op <path>...

Writes the contents of every named file to standard output, in order.
";

/// Builtin `op`: print files.
pub fn op(args: &Args<'_>, out: &mut dyn Write) -> Result<LoopStatus> {
    let Some(cmd) = parse_args::<Op>(args, out)? else {
        return Ok(LoopStatus::Continue);
    };
    if cmd.man {
        out.write_all(OP_MANUAL.as_bytes())?;
        return Ok(LoopStatus::Continue);
    }
    if cmd.paths.is_empty() {
        writeln!(out, "usage: op <path>...")?;
        return Ok(LoopStatus::Continue);
    }
    for path in &cmd.paths {
        let mut file = File::open(path).with_context(|| format!("op: cannot open {}", path))?;
        io::copy(&mut file, out).with_context(|| format!("op: cannot read {}", path))?;
    }
    Ok(LoopStatus::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::split_line;
    use std::env as stdenv;
    use std::fs;
    use std::os::unix::ffi::OsStrExt;
    use std::path::PathBuf;

    fn run(handler: Handler, line: &str) -> (Result<LoopStatus>, String) {
        let args = split_line(line).unwrap();
        let mut out = Vec::new();
        let res = handler(&args, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    fn temp_path(tag: &str) -> PathBuf {
        stdenv::temp_dir().join(format!("lsh_builtin_{}_{}", tag, std::process::id()))
    }

    #[test]
    fn test_default_table_order() {
        let table = BuiltinTable::default();
        assert_eq!(table.names().collect::<Vec<_>>(), ["cr", "help", "exit", "op"]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = BuiltinTable::default();
        assert!(table.lookup("help").is_some());
        assert!(table.lookup("exit").is_some());
        assert!(table.lookup("Help").is_none());
        assert!(table.lookup("exi").is_none());
        assert!(table.lookup("ls").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let table = BuiltinTable::new(vec![
            Builtin { name: "x", handler: exit },
            Builtin { name: "x", handler: help },
        ]);
        let handler = table.lookup("x").unwrap();
        let (res, out) = run(handler, "x");
        assert_eq!(res.unwrap(), LoopStatus::Stop);
        assert!(out.is_empty());
    }

    #[test]
    fn test_help_continues_and_is_repeatable() {
        let (first, first_out) = run(help, "help");
        let (second, second_out) = run(help, "help");
        assert_eq!(first.unwrap(), LoopStatus::Continue);
        assert_eq!(second.unwrap(), LoopStatus::Continue);
        assert!(first_out.contains("help"));
        assert_eq!(first_out, second_out);
    }

    #[test]
    fn test_exit_stops_regardless_of_arguments() {
        assert_eq!(run(exit, "exit").0.unwrap(), LoopStatus::Stop);
        assert_eq!(run(exit, "exit 3").0.unwrap(), LoopStatus::Stop);
    }

    #[test]
    fn test_cr_creates_file_and_keeps_contents() {
        let path = temp_path("cr");
        let _ = fs::remove_file(&path);

        let (res, _) = run(cr, &format!("cr {}", path.display()));
        assert_eq!(res.unwrap(), LoopStatus::Continue);
        assert!(path.exists());

        fs::write(&path, "kept").unwrap();
        let (res, _) = run(cr, &format!("cr {}", path.display()));
        assert_eq!(res.unwrap(), LoopStatus::Continue);
        assert_eq!(fs::read_to_string(&path).unwrap(), "kept");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_cr_in_missing_directory_errors() {
        let path = temp_path("missing_dir").join("file");
        let (res, _) = run(cr, &format!("cr {}", path.display()));
        assert!(res.is_err());
    }

    #[test]
    fn test_op_prints_file() {
        let path = temp_path("op");
        fs::write(&path, "hello\nworld\n").unwrap();

        let (res, out) = run(op, &format!("op {}", path.display()));
        assert_eq!(res.unwrap(), LoopStatus::Continue);
        assert_eq!(out, "hello\nworld\n");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_op_missing_file_errors() {
        let path = temp_path("op_missing");
        let (res, _) = run(op, &format!("op {}", path.display()));
        let err = res.unwrap_err();
        assert!(err.to_string().starts_with("op: cannot open"));
    }

    #[test]
    fn test_usage_and_manual() {
        let (res, out) = run(op, "op");
        assert_eq!(res.unwrap(), LoopStatus::Continue);
        assert_eq!(out, "usage: op <path>...\n");

        let (res, out) = run(cr, "cr --man");
        assert_eq!(res.unwrap(), LoopStatus::Continue);
        assert_eq!(out, CR_MANUAL);
    }

    #[test]
    fn test_lookup_accepts_os_str() {
        let table = BuiltinTable::default();
        assert!(table.lookup(OsStr::new("op")).is_some());
        assert!(table.lookup(OsStr::from_bytes(b"o\xff")).is_none());
    }

    #[test]
    fn test_non_utf8_argument_is_an_error() {
        let args = split_line(b"op caf\xe9").unwrap();
        let err = op(&args, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("op: argument is not valid UTF-8"));
    }

    #[test]
    fn test_unknown_option_is_reported_not_fatal() {
        let (res, out) = run(op, "op -s file");
        assert_eq!(res.unwrap(), LoopStatus::Continue);
        assert!(!out.is_empty());
    }
}
