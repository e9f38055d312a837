//! Styled operator-facing output.

use colored::Colorize;
use std::io::{self, Write};

/// Writes report lines with success/warning/error styling.
pub struct Output<W: Write> {
    out: W,
}

impl<W: Write> Output<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", message.as_ref())
    }

    pub fn success(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", message.as_ref().green())
    }

    pub fn warning(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", message.as_ref().yellow())
    }

    pub fn error(&mut self, message: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", message.as_ref().red().bold())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Output<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Output<Vec<u8>> {
    /// Output collected in memory.
    pub fn buffer() -> Self {
        Self::new(Vec::new())
    }

    /// Everything written so far, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}
