//! Splitting of input lines into argument vectors.
//!
//! The split is deliberately naive: any run of delimiter bytes separates two
//! arguments, and the single quote is just another delimiter. `echo 'a b'` yields
//! three arguments, `echo`, `a` and `b`. Bytes between delimiters are passed on
//! untouched, whatever their encoding.

use crate::error::ShellError;
use log::trace;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

/// Initial number of argument slots, and the increment the vector grows by.
pub const TOK_BUFSIZE: usize = 64;

/// Bytes that separate arguments: space, tab, carriage return, newline, bell and single quote.
pub const TOK_DELIM: &[u8] = b" \t\r\n\x07'";

/// Ordered arguments of one command, borrowed from the line they were split from.
///
/// The end of the vector plays the role of the sentinel: an empty `Args` means no
/// command was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args<'a> {
    tokens: Vec<&'a OsStr>,
}

impl<'a> Args<'a> {
    /// The command name, or `None` when the line held no arguments at all.
    pub fn command(&self) -> Option<&'a OsStr> {
        self.tokens.first().copied()
    }

    /// The command name and the arguments that follow it.
    pub fn split_command(&self) -> Option<(&'a OsStr, &[&'a OsStr])> {
        self.tokens.split_first().map(|(name, rest)| (*name, rest))
    }

    pub fn as_slice(&self) -> &[&'a OsStr] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a OsStr> + '_ {
        self.tokens.iter().copied()
    }
}

/// Split `line` into its non-empty arguments.
///
/// The argument slots start at [`TOK_BUFSIZE`] and grow by the same amount when full.
/// A failed growth is returned as [`ShellError::Alloc`].
pub fn split_line<L: AsRef<[u8]> + ?Sized>(line: &L) -> Result<Args<'_>, ShellError> {
    let mut tokens: Vec<&OsStr> = Vec::new();
    tokens.try_reserve_exact(TOK_BUFSIZE)?;

    let pieces = line
        .as_ref()
        .split(|byte| TOK_DELIM.contains(byte))
        .filter(|token| !token.is_empty());
    for token in pieces {
        if tokens.len() == tokens.capacity() {
            tokens.try_reserve_exact(TOK_BUFSIZE)?;
            trace!("argument vector grown to {} slots", tokens.capacity());
        }
        tokens.push(OsStr::from_bytes(token));
    }

    Ok(Args { tokens })
}
