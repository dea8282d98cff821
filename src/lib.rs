//! A tiny interactive command interpreter.
//!
//! The crate implements the classic read / split / dispatch loop of a minimal shell:
//! a line is read from the terminal, split into arguments on a fixed delimiter set,
//! and either handed to one of the builtin handlers or launched as a child process
//! that the interpreter waits for. There is no scripting language on top of it:
//! no pipes, redirections, variables, globbing or quoting.
//!
//! The main entry point is [`Repl`], which wires a [`LineReader`], the tokenizer,
//! and a [`Dispatcher`] together. The individual stages are public so they can be
//! tested and reused in isolation.

pub mod builtin;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod launcher;
pub mod logger;
pub mod reader;
pub mod repl;
pub mod tokenizer;

pub use builtin::BuiltinTable;
pub use command::{Launch, LoopStatus};
pub use dispatch::Dispatcher;
pub use error::ShellError;
pub use launcher::{LaunchOutcome, ProcessLauncher};
pub use reader::LineReader;
pub use repl::Repl;

/// Prefix used for every diagnostic the interpreter writes to stderr.
pub const PROGRAM: &str = "lsh";
