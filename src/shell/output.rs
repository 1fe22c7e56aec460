use std::io::Write;

use tracing::warn;

/// Sink for interpreter output, called in the exact order lines are produced.
pub trait TerminalOutput {
    fn write(&mut self, line: &str);

    fn clear(&mut self);
}

/// Keeps every line in memory, as a terminal pane would.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    lines: Vec<String>,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drain the buffer.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl TerminalOutput for BufferedOutput {
    fn write(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Streams lines to any writer; `clear` emits the ANSI clear-screen sequence.
pub struct WriterOutput<W: Write> {
    writer: W,
    ansi: bool,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W, ansi: bool) -> Self {
        Self { writer, ansi }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalOutput for WriterOutput<W> {
    fn write(&mut self, line: &str) {
        if let Err(err) = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush()) {
            warn!(%err, "failed to write terminal output");
        }
    }

    fn clear(&mut self) {
        if !self.ansi {
            return;
        }
        if let Err(err) = self
            .writer
            .write_all(b"\x1b[2J\x1b[H")
            .and_then(|()| self.writer.flush())
        {
            warn!(%err, "failed to clear terminal");
        }
    }
}
