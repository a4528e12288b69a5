//! Line source over any buffered reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use super::LineSource;
use crate::util::{Error, Result};

/// Reads lines synchronously from a `BufRead`.
///
/// The timeout is not enforced here: a read blocks for as long as the reader
/// does. Device files opened with a driver-level timeout, regular files and
/// in-memory cursors all return promptly; wrap anything else in
/// [`ThreadedSource`](super::ThreadedSource).
pub struct ReaderSource<R> {
    reader: Option<R>,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader: Some(reader) }
    }

    /// True once closed or the reader hit end of file.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }
}

impl ReaderSource<BufReader<File>> {
    /// Open a file or device node for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _timeout: Duration) -> Result<Vec<u8>> {
        let reader = self.reader.as_mut().ok_or(Error::StreamClosed)?;
        let mut buf = Vec::new();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            tracing::debug!("reader reached end of stream");
            self.reader = None;
            return Err(Error::StreamClosed);
        }
        Ok(buf)
    }

    fn close(&mut self) -> Result<()> {
        self.reader = None;
        Ok(())
    }
}
