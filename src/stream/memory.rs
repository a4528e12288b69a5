//! Scripted line source.

use std::collections::VecDeque;
use std::time::Duration;

use super::LineSource;
use crate::util::{Error, Result};

/// In-memory line source for tests and replays.
///
/// Each queued entry is either a line or an idle read (`None`), which the
/// source reports as "no data within the timeout".
#[derive(Debug, Default)]
pub struct MemorySource {
    queue: VecDeque<Option<Vec<u8>>>,
    /// Report `StreamClosed` once drained instead of idling forever.
    close_when_drained: bool,
    closed: bool,
    reads: usize,
}

impl MemorySource {
    /// Source that yields `lines` and then closes, like a file replay.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        Self {
            queue: lines.into_iter().map(|l| Some(l.as_ref().to_vec())).collect(),
            close_when_drained: true,
            ..Default::default()
        }
    }

    /// Source that idles (empty reads) once drained, like a quiet serial link.
    pub fn open_ended() -> Self {
        Self::default()
    }

    /// Queue one more line.
    pub fn push_line(&mut self, line: impl AsRef<[u8]>) -> &mut Self {
        self.queue.push_back(Some(line.as_ref().to_vec()));
        self
    }

    /// Queue one idle read.
    pub fn push_idle(&mut self) -> &mut Self {
        self.queue.push_back(None);
        self
    }

    /// Lines and idle reads still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of `read_line` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl LineSource for MemorySource {
    fn read_line(&mut self, _timeout: Duration) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::StreamClosed);
        }
        self.reads += 1;
        match self.queue.pop_front() {
            Some(Some(line)) => Ok(line),
            Some(None) => Ok(Vec::new()),
            None if self.close_when_drained => {
                self.closed = true;
                Err(Error::StreamClosed)
            }
            None => Ok(Vec::new()),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.queue.clear();
        Ok(())
    }
}
