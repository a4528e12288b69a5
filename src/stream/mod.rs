//! Line sources: the byte-stream side of the pipeline.
//!
//! The pipeline only needs two things from a transport: "give me the next
//! line, waiting at most this long" and "close". Serial ports, pipes, files
//! and scripted test input all fit behind [`LineSource`].
//!
//! - [`ReaderSource`] - any `BufRead`, read on the calling thread
//! - [`ThreadedSource`] - blocking reader moved to a background thread so
//!   reads honor the timeout
//! - [`MemorySource`] - scripted lines for tests and replay

mod reader;
mod threaded;
mod memory;

pub use reader::*;
pub use threaded::*;
pub use memory::*;

use std::time::Duration;

use crate::util::Result;

/// Default bound on a single `read_line` call.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// A source of newline-framed records.
pub trait LineSource {
    /// Next line, including its terminator if the transport kept it.
    ///
    /// An empty buffer means no data arrived within `timeout`. Errors are
    /// transport failures: the stream is gone and will not recover.
    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>>;

    /// Release the underlying transport. Further reads fail with
    /// [`Error::StreamClosed`](crate::Error::StreamClosed).
    fn close(&mut self) -> Result<()>;
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read_line(timeout)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
