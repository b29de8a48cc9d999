//! Line-oriented terminal implementation of [`DebugConsole`].

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use ram_core::DebugConsole;

const PROMPT: &str = "> ";

/// Console over any reader/writer pair, normally stdin and stdout.
///
/// With redraw enabled each text replaces the previous one in place by moving
/// the cursor up over it and erasing to the end of the screen.
#[derive(Debug)]
pub struct TerminalConsole<R, W> {
    reader: R,
    writer: W,
    redraw: bool,
    drawn_rows: usize,
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    /// Creates a console that appends every text.
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            redraw: false,
            drawn_rows: 0,
        }
    }

    /// Enables in-place redrawing.
    #[must_use]
    pub const fn with_redraw(mut self, redraw: bool) -> Self {
        self.redraw = redraw;
        self
    }

    /// Releases the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn emit(&mut self, text: &str) -> std::io::Result<()> {
        if self.redraw && self.drawn_rows > 0 {
            write!(self.writer, "\x1b[{}A\x1b[J", self.drawn_rows)?;
        }
        self.writer.write_all(text.as_bytes())?;
        let mut rows = text.matches('\n').count();
        if !text.ends_with('\n') {
            self.writer.write_all(b"\n")?;
            rows += 1;
        }
        self.writer.flush()?;
        self.drawn_rows = rows;
        Ok(())
    }
}

impl<R: BufRead, W: Write> DebugConsole for TerminalConsole<R, W> {
    fn show(&mut self, text: &str) {
        if let Err(error) = self.emit(text) {
            log::warn!("console write failed: {error}");
        }
    }

    fn read_command(&mut self) -> Option<String> {
        // Typed text lands below the frame, so the next frame must not erase it.
        self.drawn_rows = 0;
        if let Err(error) = write!(self.writer, "{PROMPT}").and_then(|()| self.writer.flush()) {
            log::warn!("console write failed: {error}");
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(error) => {
                log::warn!("console read failed: {error}");
                None
            }
        }
    }

    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}
