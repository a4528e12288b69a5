//! Tick driver: one bounded update cycle of the pipeline.

use serde::Serialize;
use std::time::Duration;

use crate::core::{AngleSample, LineDecoder, SlidingWindow, WindowSnapshot};
use crate::geom::{ReferenceBody, RotationComposer};
use crate::stream::LineSource;
use crate::util::{Error, Result, RotationMatrix, Vertex3D};

use super::Settings;

/// Driver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickState {
    /// No valid sample decoded yet: no pose, empty series.
    AwaitingFirstSample,
    /// At least one sample seen; every tick yields a pose.
    Streaming,
}

/// Rotation derived from the latest sample.
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    pub sample: AngleSample,
    pub matrix: RotationMatrix,
    /// Body vertices rotated by `matrix`, in body order.
    pub vertices: Vec<Vertex3D>,
}

/// Per-tick ingestion counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TickStats {
    /// Non-empty lines pulled from the stream.
    pub lines_read: usize,
    /// Lines decoded and appended.
    pub accepted: usize,
    /// Lines dropped as malformed.
    pub rejected: usize,
}

/// Output of one tick.
#[derive(Clone, Debug)]
pub struct TickResult {
    /// Zero-based tick number.
    pub tick: u64,
    pub state: TickState,
    /// None until the first sample arrives.
    pub pose: Option<Pose>,
    pub series: WindowSnapshot,
    pub stats: TickStats,
}

/// Owns the stream, the window and the composer; advances them one tick at
/// a time.
pub struct TickDriver<S: LineSource> {
    source: S,
    decoder: LineDecoder,
    window: SlidingWindow,
    composer: RotationComposer,
    body: ReferenceBody,
    batch_size: usize,
    read_timeout: Duration,
    state: TickState,
    ticks: u64,
    /// Transport failure hit mid-batch, reported on the next tick.
    pending_error: Option<Error>,
    closed: bool,
}

impl<S: LineSource> TickDriver<S> {
    /// Build a driver from validated settings.
    pub fn new(source: S, settings: &Settings, body: ReferenceBody) -> Result<Self> {
        settings.validate()?;
        let window = SlidingWindow::new(settings.axes, settings.window_capacity)?;
        tracing::debug!(
            axes = %settings.axes,
            capacity = settings.window_capacity,
            batch = settings.batch_size,
            order = %settings.composition_order,
            "pipeline configured"
        );
        Ok(Self {
            source,
            decoder: LineDecoder::new(settings.axes),
            window,
            composer: RotationComposer::new(settings.composition_order),
            body,
            batch_size: settings.batch_size,
            read_timeout: settings.read_timeout(),
            state: TickState::AwaitingFirstSample,
            ticks: 0,
            pending_error: None,
            closed: false,
        })
    }

    pub fn state(&self) -> TickState {
        self.state
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn body(&self) -> &ReferenceBody {
        &self.body
    }

    pub fn composer(&self) -> &RotationComposer {
        &self.composer
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Run one update cycle.
    ///
    /// Reads at most `batch_size` lines, stopping early on an idle read.
    /// Malformed lines are dropped. If the stream fails after some lines of
    /// this batch were read, those lines are still processed and the error
    /// is returned by the following call.
    pub fn advance(&mut self) -> Result<TickResult> {
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }
        if self.closed {
            return Err(Error::StreamClosed);
        }
        let _span = tracing::trace_span!("tick", n = self.ticks).entered();

        let mut stats = TickStats::default();
        for _ in 0..self.batch_size {
            let line = match self.source.read_line(self.read_timeout) {
                Ok(line) => line,
                Err(e) if stats.lines_read > 0 => {
                    self.pending_error = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            };
            if line.is_empty() {
                break;
            }
            stats.lines_read += 1;

            match self.decoder.decode_detailed(&line) {
                Ok(sample) => {
                    self.window.append(&sample)?;
                    stats.accepted += 1;
                }
                Err(reason) => {
                    stats.rejected += 1;
                    tracing::trace!(%reason, "dropping line");
                }
            }
        }

        if self.state == TickState::AwaitingFirstSample && !self.window.is_empty() {
            tracing::debug!(tick = self.ticks, "first sample received, streaming");
            self.state = TickState::Streaming;
        }

        let pose = self.window.latest().map(|sample| {
            let (matrix, vertices) = self.composer.rotate(&sample, self.body.vertices());
            Pose { sample, matrix, vertices }
        });

        let result = TickResult {
            tick: self.ticks,
            state: self.state,
            pose,
            series: self.window.snapshot(),
            stats,
        };
        self.ticks += 1;
        Ok(result)
    }

    /// Close the stream. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!(ticks = self.ticks, samples = self.window.total_appended(), "closing stream");
        self.source.close()
    }
}

impl<S: LineSource> Drop for TickDriver<S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("failed to close stream: {}", e);
        }
    }
}
