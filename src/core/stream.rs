//! Line delivery for the transfer tool's diagnostic stream.
//!
//! curl redraws its meter with a bare `\r`, so newline-based line readers
//! would hold every update until the transfer ends. [`LineSplitter`] starts
//! a new line at each `\r` (keeping it as the first character, which is how
//! the progress parser recognises a redraw) and ends one at each `\n`.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Bound on lines buffered between the reader task and the consumer.
pub const LINE_CHANNEL_CAPACITY: usize = 64;

const READ_CHUNK: usize = 4096;

#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in bytes {
            match byte {
                b'\r' => {
                    self.flush_into(&mut lines);
                    self.pending.push(b'\r');
                }
                b'\n' => {
                    // A CRLF pair is a plain line ending, not an empty redraw.
                    if self.pending == b"\r" {
                        self.pending.clear();
                    } else {
                        self.flush_into(&mut lines);
                    }
                }
                _ => self.pending.push(byte),
            }
        }
        lines
    }

    /// Whatever is left once the stream has closed.
    pub fn finish(mut self) -> Option<String> {
        let mut lines = Vec::new();
        self.flush_into(&mut lines);
        lines.pop()
    }

    fn flush_into(&mut self, lines: &mut Vec<String>) {
        if !self.pending.is_empty() {
            lines.push(String::from_utf8_lossy(&self.pending).into_owned());
            self.pending.clear();
        }
    }
}

/// Drain `reader` on its own task, returning everything it produced.
///
/// When `lines` is set, each line is also sent through it in emission
/// order. The sender is dropped when the stream closes, which is how the
/// consumer learns that no more lines will arrive.
pub fn spawn_line_reader<R>(
    mut reader: R,
    lines: Option<mpsc::Sender<String>>,
) -> JoinHandle<std::io::Result<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut raw = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        let mut splitter = LineSplitter::new();

        loop {
            let read = reader.read(&mut chunk).await?;
            if read == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..read]);

            if let Some(tx) = &lines {
                for line in splitter.push(&chunk[..read]) {
                    // Keep draining even if the consumer went away so the
                    // child never blocks on a full pipe.
                    let _ = tx.send(line).await;
                }
            }
        }

        if let Some(tx) = &lines {
            if let Some(line) = splitter.finish() {
                let _ = tx.send(line).await;
            }
        }

        Ok(String::from_utf8_lossy(&raw).into_owned())
    })
}
