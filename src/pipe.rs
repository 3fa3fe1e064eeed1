//! Bounded in-process byte pipe.
//!
//! Connects the encryption producer task to the paste-upload consumer
//! (see [`crate::encrypt::encrypt_stream`]). The writer half implements
//! [`std::io::Write`], the reader half [`std::io::Read`]. Capacity is
//! counted in write calls (chunks); a full pipe blocks the producer until
//! the consumer drains, so memory stays bounded regardless of payload
//! size. Bytes arrive in exactly the order they were written.
//!
//! Dropping the writer ends the stream: the reader returns `Ok(0)` once
//! the buffered chunks are drained. A producer that fails mid-stream calls
//! [`PipeWriter::fail`] instead, and the reader surfaces the failure as an
//! `io::Error` (a broken stream, not a clean end-of-stream).

use std::io::{self, Read, Write};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

enum Chunk {
    Data(Vec<u8>),
    Failed(String),
}

/// Writer half of a bounded pipe.
pub struct PipeWriter {
    tx: SyncSender<Chunk>,
}

/// Reader half of a bounded pipe.
pub struct PipeReader {
    rx: Receiver<Chunk>,
    current: Vec<u8>,
    pos: usize,
}

/// Create a pipe holding at most `capacity` pending chunks.
pub fn bounded_pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let (tx, rx) = sync_channel(capacity);
    (
        PipeWriter { tx },
        PipeReader {
            rx,
            current: Vec::new(),
            pos: 0,
        },
    )
}

impl PipeWriter {
    /// Abort the stream, delivering `message` to the reader as an error.
    pub fn fail(self, message: String) {
        // The reader may already be gone; nothing more to report then.
        let _ = self.tx.send(Chunk::Failed(message));
    }
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .send(Chunk::Data(buf.to_vec()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.current.len() {
            match self.rx.recv() {
                Ok(Chunk::Data(data)) => {
                    self.current = data;
                    self.pos = 0;
                }
                Ok(Chunk::Failed(message)) => {
                    return Err(io::Error::other(message));
                }
                // Writer dropped cleanly: end of stream.
                Err(_) => return Ok(0),
            }
        }
        let n = (self.current.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
