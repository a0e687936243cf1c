//! Console sinks for diagnostic output.
//!
//! Every sink implements [`core::fmt::Write`], so anything that can be
//! `write!`-ed to (including the [`console_println!`](crate::console_println)
//! macro) can target it. Sinks are owned by whoever logs through them; there
//! is no global console.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Captures console output as complete, newline-terminated lines.
///
/// Text written after the last `\n` stays pending until its line is
/// terminated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
    pending: String,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            pending: String::new(),
        }
    }

    /// Completed lines, without their terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text written since the last newline.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Removes and returns all completed lines.
    pub fn take_lines(&mut self) -> Vec<String> {
        core::mem::take(&mut self.lines)
    }

    /// Everything captured so far, reassembled as it was written.
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for line in self.lines.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&self.pending);
        out
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;
        while let Some(newline) = rest.find('\n') {
            self.pending.push_str(&rest[..newline]);
            self.lines.push(core::mem::take(&mut self.pending));
            rest = &rest[newline + 1..];
        }
        self.pending.push_str(rest);

        Ok(())
    }
}

/// Discards everything written to it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullConsole;

impl fmt::Write for NullConsole {
    fn write_str(&mut self, _s: &str) -> fmt::Result {
        Ok(())
    }
}

/// Writes to two consoles, e.g. a capture buffer and a terminal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub const fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: fmt::Write, B: fmt::Write> fmt::Write for Tee<A, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Both sinks see the text even if the first one fails.
        let first = self.first.write_str(s);
        let second = self.second.write_str(s);
        first.and(second)
    }
}
