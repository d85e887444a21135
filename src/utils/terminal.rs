use crate::core::sink::{InfoOptions, ProgressSink};
use std::io::{self, IsTerminal, Stderr, Write};

const ERASE_LINE: &str = "\r\x1b[2K";

/// Renders status lines in place on a terminal.
///
/// Without ANSI support the previous line is overwritten with spaces.
pub struct TerminalSink<W: Write = Stderr> {
    out: W,
    ansi: bool,
    last_len: usize,
}

impl TerminalSink<Stderr> {
    pub fn stderr() -> Self {
        let out = io::stderr();
        let ansi = out.is_terminal();
        Self::new(out, ansi)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            last_len: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for TerminalSink<W> {
    fn clear_line(&mut self) {
        if self.last_len == 0 {
            return;
        }
        let _ = if self.ansi {
            write!(self.out, "{ERASE_LINE}")
        } else {
            write!(self.out, "\r{}\r", " ".repeat(self.last_len))
        };
        self.out.flush().ok();
        self.last_len = 0;
    }

    fn info(&mut self, message: &str, options: InfoOptions) {
        let _ = if options.new_line {
            writeln!(self.out, "{message}")
        } else {
            write!(self.out, "{message}")
        };
        self.out.flush().ok();
        self.last_len = if options.new_line {
            0
        } else {
            message.chars().count()
        };
    }
}
