//! Background reader thread with timeout-bounded reads.
//!
//! Blocking readers (stdin, pipes, tty device files) have no per-call
//! timeout. This adapter reads them on a dedicated thread and hands lines
//! over a channel, so `read_line` can wait with `recv_timeout` instead.
//!
//! The channel is bounded: once `capacity` lines are queued the thread
//! blocks, so it never runs more than one queue ahead of the tick loop.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::LineSource;
use crate::util::{Error, Result};

/// Lines queued ahead of the consumer when no capacity is given.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

/// Messages from the reader thread.
enum ReaderEvent {
    /// One complete (or final unterminated) line.
    Line(Vec<u8>),
    /// The reader failed; the thread exits after sending this.
    Failed(std::io::Error),
}

/// Line source backed by a reader thread.
pub struct ThreadedSource {
    rx: Option<Receiver<ReaderEvent>>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadedSource {
    /// Spawn a reader thread over `reader`, queueing at most `capacity`
    /// lines (minimum 1).
    pub fn spawn<R>(reader: R, capacity: usize) -> Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = sync_channel::<ReaderEvent>(capacity.max(1));
        let handle = thread::Builder::new()
            .name("attitude-reader".into())
            .spawn(move || reader_loop(reader, tx))?;

        Ok(Self { rx: Some(rx), handle: Some(handle) })
    }

    /// Read from a file or device node.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::spawn(BufReader::new(file), capacity)
    }

    /// Read from standard input.
    pub fn stdin(capacity: usize) -> Result<Self> {
        Self::spawn(BufReader::new(std::io::stdin()), capacity)
    }

    /// Read from any unbuffered reader.
    pub fn from_reader<R: Read + Send + 'static>(reader: R, capacity: usize) -> Result<Self> {
        Self::spawn(BufReader::new(reader), capacity)
    }
}

impl LineSource for ThreadedSource {
    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let rx = self.rx.as_ref().ok_or(Error::StreamClosed)?;
        match rx.recv_timeout(timeout) {
            Ok(ReaderEvent::Line(line)) => Ok(line),
            Ok(ReaderEvent::Failed(e)) => {
                self.rx = None;
                Err(Error::Io(e))
            }
            Err(RecvTimeoutError::Timeout) => Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => {
                self.rx = None;
                Err(Error::StreamClosed)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the receiver makes the thread's next send fail, which
        // ends its loop.
        self.rx = None;
        if let Some(handle) = self.handle.take() {
            // A thread blocked inside read() cannot be interrupted; only join
            // when it has already finished.
            if handle.is_finished() {
                if handle.join().is_err() {
                    tracing::warn!("reader thread panicked");
                }
            } else {
                tracing::debug!("reader thread still blocked in read, detaching");
            }
        }
        Ok(())
    }
}

impl Drop for ThreadedSource {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Reader thread body: forward lines until EOF, error, or the receiver goes
/// away. `send` blocks while the queue is full.
fn reader_loop<R: BufRead>(mut reader: R, tx: SyncSender<ReaderEvent>) {
    loop {
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break, // EOF
            Ok(_) => {
                if tx.send(ReaderEvent::Line(buf)).is_err() {
                    break; // Source closed
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(ReaderEvent::Failed(e));
                break;
            }
        }
    }
}
