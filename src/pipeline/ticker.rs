//! Fixed-interval tick loop.
//!
//! Stands in for the animation timer of a GUI: call `advance` every
//! `interval`, hand the result to a renderer, stop when asked or when the
//! stream ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::stream::LineSource;
use crate::util::{Error, Result};

use super::render::{present, Renderer};
use super::tick::TickDriver;

/// Totals for a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub accepted: u64,
    pub rejected: u64,
    /// True when the loop ended because the stream closed.
    pub stream_closed: bool,
}

/// Drives a [`TickDriver`] at a fixed interval.
#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    interval: Duration,
    max_ticks: Option<u64>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self { interval, max_ticks: None }
    }

    /// Stop after `ticks` ticks.
    pub fn with_max_ticks(mut self, ticks: Option<u64>) -> Self {
        self.max_ticks = ticks;
        self
    }

    /// Run until the stream closes, `max_ticks` is reached or `stop` is set.
    ///
    /// End of stream is a normal exit. Other transport or renderer errors
    /// are returned. The stream is closed before returning either way.
    pub fn run<S, R>(
        &self,
        driver: &mut TickDriver<S>,
        renderer: &mut R,
        stop: Option<&AtomicBool>,
    ) -> Result<RunSummary>
    where
        S: LineSource,
        R: Renderer + ?Sized,
    {
        let outcome = self.run_inner(driver, renderer, stop);
        let closed = driver.close();
        let summary = outcome?;
        closed?;
        tracing::info!(
            ticks = summary.ticks,
            accepted = summary.accepted,
            rejected = summary.rejected,
            "stream finished"
        );
        Ok(summary)
    }

    fn run_inner<S, R>(
        &self,
        driver: &mut TickDriver<S>,
        renderer: &mut R,
        stop: Option<&AtomicBool>,
    ) -> Result<RunSummary>
    where
        S: LineSource,
        R: Renderer + ?Sized,
    {
        let mut summary = RunSummary::default();
        loop {
            if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
                tracing::debug!("stop requested");
                break;
            }
            if self.max_ticks.is_some_and(|max| summary.ticks >= max) {
                break;
            }

            let started = Instant::now();
            let result = match driver.advance() {
                Ok(result) => result,
                Err(Error::StreamClosed) => {
                    summary.stream_closed = true;
                    break;
                }
                Err(e) => return Err(e),
            };

            summary.ticks += 1;
            summary.accepted += result.stats.accepted as u64;
            summary.rejected += result.stats.rejected as u64;
            present(renderer, driver.body(), &result)?;

            let elapsed = started.elapsed();
            if elapsed > self.interval && !self.interval.is_zero() {
                tracing::trace!("tick {} overran interval: {:?}", result.tick, elapsed);
            }
            if let Some(rest) = self.interval.checked_sub(elapsed) {
                if !rest.is_zero() {
                    thread::sleep(rest);
                }
            }
        }
        Ok(summary)
    }
}
