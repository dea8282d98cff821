//! Line acquisition from the interactive stream.

use crate::error::ShellError;
use log::trace;
use std::io::Read;
use std::ops::Deref;

/// Initial capacity of a line buffer, and the increment it grows by.
pub const LINE_BUFSIZE: usize = 1024;

/// One line of input, without its terminator.
///
/// The bytes are kept exactly as read, so arguments reach the program loader
/// unchanged whatever their encoding. Argument vectors produced by the tokenizer
/// borrow from the line and cannot outlive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    bytes: Vec<u8>,
}

impl InputLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.bytes.capacity()
    }
}

impl Deref for InputLine {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for InputLine {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Reads lines one byte at a time from any [`Read`] source.
pub struct LineReader<R> {
    input: R,
}

impl<R: Read> LineReader<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` once the stream ends. A partial line that is cut off by
    /// the end of the stream is discarded: end of input always means "stop".
    ///
    /// The buffer starts at [`LINE_BUFSIZE`] bytes and grows by the same amount
    /// whenever it is full, before the next byte is stored. A failed growth is
    /// reported as [`ShellError::Alloc`].
    pub fn read_line(&mut self) -> Result<Option<InputLine>, ShellError> {
        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(LINE_BUFSIZE)?;

        for byte in (&mut self.input).bytes() {
            let byte = byte?;
            if byte == b'\n' {
                return Ok(Some(InputLine { bytes: buf }));
            }
            if buf.len() == buf.capacity() {
                buf.try_reserve_exact(LINE_BUFSIZE)?;
                trace!("line buffer grown to {} bytes", buf.capacity());
            }
            buf.push(byte);
        }

        Ok(None)
    }
}
