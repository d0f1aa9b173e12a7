//! Brace-block text grammar shared by all Whipstitch text assets.
//!
//! # Grammar
//! ```text
//! key value
//! key { 1.000000 2.000000 3.000000 }
//! block {
//!   key value
//!   item 0 {
//!     ...
//!   }
//! }
//! ```
//!
//! Tokens are whitespace separated and the loader reads them with `scanf`-style
//! patterns, so indentation is cosmetic. Field order is not: every block is read
//! top to bottom in a fixed order.

use std::fmt;
use std::io::{self, Write};

/// Spaces per nesting level.
const INDENT: &str = "  ";

/// A float written in the fixed-precision form the loader expects (`%f`).
///
/// Negative zero is written as `0.000000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float(pub f32);

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        write!(f, "{:.6}", value)
    }
}

/// Sequential writer for brace-block documents.
///
/// Tracks nesting depth so `close` always matches the last `open`.
pub struct TextWriter<W: Write> {
    inner: W,
    depth: usize,
}

impl<W: Write> TextWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, depth: 0 }
    }

    /// Write the file banner followed by a blank line.
    pub fn banner(&mut self, lines: &[&str]) -> io::Result<()> {
        for line in lines {
            writeln!(self.inner, "{}", line)?;
        }
        self.blank()
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.inner)
    }

    /// Write one indented line verbatim.
    pub fn line(&mut self, text: impl fmt::Display) -> io::Result<()> {
        for _ in 0..self.depth {
            self.inner.write_all(INDENT.as_bytes())?;
        }
        writeln!(self.inner, "{}", text)
    }

    /// `key value`
    pub fn field(&mut self, key: &str, value: impl fmt::Display) -> io::Result<()> {
        self.line(format_args!("{} {}", key, value))
    }

    /// `key 0.500000`
    pub fn float(&mut self, key: &str, value: f32) -> io::Result<()> {
        self.field(key, Float(value))
    }

    /// `key { a b c }` with every component in fixed precision.
    pub fn floats(&mut self, key: &str, values: &[f32]) -> io::Result<()> {
        let body: Vec<String> = values.iter().map(|v| Float(*v).to_string()).collect();
        self.line(format_args!("{} {{ {} }}", key, body.join(" ")))
    }

    /// `key { a b c }` with components written through `Display`.
    pub fn tuple<T: fmt::Display>(&mut self, key: &str, values: &[T]) -> io::Result<()> {
        let body: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.line(format_args!("{} {{ {} }}", key, body.join(" ")))
    }

    /// `key {` and descend one level.
    pub fn open(&mut self, key: &str) -> io::Result<()> {
        self.line(format_args!("{} {{", key))?;
        self.depth += 1;
        Ok(())
    }

    /// `key index {` and descend one level.
    pub fn open_indexed(&mut self, key: &str, index: usize) -> io::Result<()> {
        self.line(format_args!("{} {} {{", key, index))?;
        self.depth += 1;
        Ok(())
    }

    /// `}` closing the innermost open block.
    pub fn close(&mut self) -> io::Result<()> {
        if self.depth == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "close() without a matching open()",
            ));
        }
        self.depth -= 1;
        self.line("}")
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.depth != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} block(s) left open", self.depth),
            ));
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}
