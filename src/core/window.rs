//! Sliding window of recent angle samples.
//!
//! Keeps one bounded FIFO per tracked axis. All axes are appended together,
//! so the per-axis sequences always have the same length.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::sample::{AngleSample, Axis, AxisSet};
use crate::util::{Error, Result};

/// Default window capacity in samples.
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

/// Fixed-capacity, insertion-ordered history of angle samples.
#[derive(Clone, Debug)]
pub struct SlidingWindow {
    axes: AxisSet,
    capacity: usize,
    /// One sequence per axis, in `axes.axes()` order.
    series: Vec<VecDeque<f64>>,
    /// Total samples ever appended.
    counter: u64,
}

impl SlidingWindow {
    /// Create an empty window. Capacity must be at least 1.
    pub fn new(axes: AxisSet, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("window capacity must be at least 1"));
        }
        let series = axes
            .axes()
            .iter()
            .map(|_| VecDeque::with_capacity(capacity))
            .collect();
        Ok(Self { axes, capacity, series, counter: 0 })
    }

    /// Axis set tracked by this window.
    pub fn axes(&self) -> AxisSet {
        self.axes
    }

    /// Maximum number of samples kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, VecDeque::len)
    }

    /// True until the first sample is appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total samples appended since creation, including evicted ones.
    pub fn total_appended(&self) -> u64 {
        self.counter
    }

    /// Append one sample, evicting the oldest when full.
    ///
    /// The sample must carry exactly the window's axes; a mismatched sample
    /// is rejected and the window is left untouched.
    pub fn append(&mut self, sample: &AngleSample) -> Result<()> {
        if sample.axis_set() != self.axes {
            return Err(Error::AxisMismatch {
                expected: self.axes,
                actual: sample.axis_set(),
            });
        }

        let full = self.len() == self.capacity;
        for (seq, &axis) in self.series.iter_mut().zip(self.axes.axes()) {
            if full {
                seq.pop_front();
            }
            // Presence checked by the axis-set comparison above
            seq.push_back(sample.get(axis).unwrap_or_default());
        }
        self.counter += 1;
        Ok(())
    }

    /// Most recently appended sample.
    pub fn latest(&self) -> Option<AngleSample> {
        let values: Vec<f64> = self
            .series
            .iter()
            .map(|seq| seq.back().copied())
            .collect::<Option<_>>()?;
        AngleSample::from_fields(&values)
    }

    /// Values of one axis, oldest first.
    pub fn axis_values(&self, axis: Axis) -> Option<&VecDeque<f64>> {
        let pos = self.axes.axes().iter().position(|&a| a == axis)?;
        self.series.get(pos)
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> WindowSnapshot {
        let len = self.len();
        WindowSnapshot {
            axes: self.axes,
            series: self.series.iter().map(|seq| seq.iter().copied().collect()).collect(),
            len,
            first_index: self.counter - len as u64,
            next_index: self.counter,
            capacity: self.capacity,
        }
    }
}

/// Read-only copy of a window, handed to renderers each tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub axes: AxisSet,
    /// Per-axis values in wire order, oldest first.
    pub series: Vec<Vec<f64>>,
    /// Number of samples in each series.
    pub len: usize,
    /// Sample index of the oldest value held.
    pub first_index: u64,
    /// Sample index the next append will get.
    pub next_index: u64,
    pub capacity: usize,
}

impl WindowSnapshot {
    /// Values of one axis, oldest first.
    pub fn axis(&self, axis: Axis) -> Option<&[f64]> {
        let pos = self.axes.axes().iter().position(|&a| a == axis)?;
        self.series.get(pos).map(Vec::as_slice)
    }

    /// Sample indices matching the series positions.
    pub fn indices(&self) -> std::ops::Range<u64> {
        self.first_index..self.next_index
    }

    /// Horizontal plot range: the full capacity until the window first
    /// fills, then the trailing `capacity` indices.
    pub fn plot_range(&self) -> (u64, u64) {
        let cap = self.capacity as u64;
        (self.next_index.saturating_sub(cap), self.next_index.max(cap))
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Window shared between an ingestion thread and a rendering thread.
///
/// A single mutex guards both `append` and `snapshot`.
#[derive(Clone, Debug)]
pub struct SharedWindow {
    inner: Arc<Mutex<SlidingWindow>>,
}

impl SharedWindow {
    pub fn new(window: SlidingWindow) -> Self {
        Self { inner: Arc::new(Mutex::new(window)) }
    }

    pub fn append(&self, sample: &AngleSample) -> Result<()> {
        self.inner.lock().append(sample)
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn latest(&self) -> Option<AngleSample> {
        self.inner.lock().latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(i: usize) -> AngleSample {
        let v = i as f64;
        AngleSample::with_yaw(v, -v, v * 0.5)
    }

    #[test]
    fn test_empty_window() {
        let w = SlidingWindow::new(AxisSet::PitchRollYaw, 4).unwrap();
        assert!(w.is_empty());
        assert_eq!(w.latest(), None);
        let snap = w.snapshot();
        assert_eq!(snap.len, 0);
        assert_eq!(snap.series.len(), 3);
        assert!(snap.series.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            SlidingWindow::new(AxisSet::PitchRoll, 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fifo_eviction() {
        for capacity in [1usize, 2, 3, 7] {
            for n in 0..12usize {
                let mut w = SlidingWindow::new(AxisSet::PitchRollYaw, capacity).unwrap();
                for i in 0..n {
                    w.append(&sample(i)).unwrap();
                }
                let snap = w.snapshot();
                let expected_len = n.min(capacity);
                assert_eq!(snap.len, expected_len);

                let expected_pitch: Vec<f64> =
                    (n - expected_len..n).map(|i| i as f64).collect();
                assert_eq!(snap.axis(Axis::Pitch).unwrap(), expected_pitch.as_slice());
                let expected_roll: Vec<f64> = expected_pitch.iter().map(|v| -v).collect();
                assert_eq!(snap.axis(Axis::Roll).unwrap(), expected_roll.as_slice());
                assert_eq!(snap.indices(), (n - expected_len) as u64..n as u64);
            }
        }
    }

    #[test]
    fn test_latest_is_last_appended() {
        let mut w = SlidingWindow::new(AxisSet::PitchRollYaw, 3).unwrap();
        for i in 0..5 {
            w.append(&sample(i)).unwrap();
        }
        assert_eq!(w.latest(), Some(sample(4)));
        assert_eq!(w.total_appended(), 5);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_axis_mismatch_leaves_window_untouched() {
        let mut w = SlidingWindow::new(AxisSet::PitchRoll, 3).unwrap();
        w.append(&AngleSample::new(1.0, 2.0)).unwrap();
        let err = w.append(&AngleSample::with_yaw(1.0, 2.0, 3.0)).unwrap_err();
        assert!(matches!(err, Error::AxisMismatch { .. }));
        assert_eq!(w.len(), 1);
        assert_eq!(w.total_appended(), 1);
        assert!(w.axis_values(Axis::Yaw).is_none());
    }

    #[test]
    fn test_plot_range() {
        let mut w = SlidingWindow::new(AxisSet::PitchRoll, 4).unwrap();
        assert_eq!(w.snapshot().plot_range(), (0, 4));
        for i in 0..6 {
            w.append(&AngleSample::new(i as f64, 0.0)).unwrap();
        }
        assert_eq!(w.snapshot().plot_range(), (2, 6));
    }

    #[test]
    fn test_shared_window_across_threads() {
        let shared = SharedWindow::new(SlidingWindow::new(AxisSet::PitchRoll, 50).unwrap());
        let writer = shared.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                writer.append(&AngleSample::new(i as f64, 0.0)).unwrap();
            }
        });
        handle.join().unwrap();

        let snap = shared.snapshot();
        assert_eq!(snap.len, 50);
        assert_eq!(snap.axis(Axis::Pitch).unwrap()[0], 50.0);
        assert_eq!(shared.latest(), Some(AngleSample::new(99.0, 0.0)));
    }
}
