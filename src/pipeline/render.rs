//! Renderer hand-off.
//!
//! The pipeline does no drawing. Each tick it hands a renderer the windowed
//! angle series and, once a sample exists, the rotated body faces.

use serde::Serialize;
use std::io::Write;

use crate::core::{AngleSample, WindowSnapshot};
use crate::geom::{FacePolygon, ReferenceBody};
use crate::util::Result;

use super::tick::{Pose, TickResult, TickState, TickStats};

/// Consumer of per-tick pipeline output.
pub trait Renderer {
    /// New time-series contents. Called every tick, even when empty.
    fn update_series(&mut self, series: &WindowSnapshot) -> Result<()>;

    /// New pose. Not called until the first sample has been decoded.
    fn update_pose(&mut self, pose: &Pose, faces: &[FacePolygon]) -> Result<()>;

    /// Called after both updates of a tick.
    fn end_tick(&mut self, _result: &TickResult) -> Result<()> {
        Ok(())
    }
}

/// Deliver one tick's output to `renderer`.
pub fn present<R: Renderer + ?Sized>(
    renderer: &mut R,
    body: &ReferenceBody,
    result: &TickResult,
) -> Result<()> {
    renderer.update_series(&result.series)?;
    if let Some(pose) = &result.pose {
        let faces = body.polygons(&pose.vertices);
        renderer.update_pose(pose, &faces)?;
    }
    renderer.end_tick(result)
}

/// One JSON object per line.
#[derive(Serialize)]
struct TickRecord<'a> {
    tick: u64,
    state: TickState,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample: Option<&'a AngleSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vertices: Option<Vec<[f64; 3]>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    faces: Option<&'a [FacePolygon]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<&'a WindowSnapshot>,
    stats: TickStats,
}

/// Writes one JSON object per tick.
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    include_series: bool,
    include_faces: bool,
    faces: Vec<FacePolygon>,
}

impl<W: Write> JsonLinesRenderer<W> {
    /// Pose vertices only; add series or faces with the builder methods.
    pub fn new(out: W) -> Self {
        Self { out, include_series: false, include_faces: false, faces: Vec::new() }
    }

    pub fn with_series(mut self, include: bool) -> Self {
        self.include_series = include;
        self
    }

    pub fn with_faces(mut self, include: bool) -> Self {
        self.include_faces = include;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn update_series(&mut self, _series: &WindowSnapshot) -> Result<()> {
        // Written from the full result in end_tick
        Ok(())
    }

    fn update_pose(&mut self, _pose: &Pose, faces: &[FacePolygon]) -> Result<()> {
        if self.include_faces {
            self.faces = faces.to_vec();
        }
        Ok(())
    }

    fn end_tick(&mut self, result: &TickResult) -> Result<()> {
        let record = TickRecord {
            tick: result.tick,
            state: result.state,
            sample: result.pose.as_ref().map(|p| &p.sample),
            vertices: result
                .pose
                .as_ref()
                .map(|p| p.vertices.iter().map(|v| v.to_array()).collect()),
            faces: (self.include_faces && result.pose.is_some()).then_some(self.faces.as_slice()),
            series: self.include_series.then_some(&result.series),
            stats: result.stats,
        };
        serde_json::to_writer(&mut self.out, &record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes a short status line per tick, only when something changed.
pub struct SummaryRenderer<W: Write> {
    out: W,
    last_sample: Option<AngleSample>,
    window_len: usize,
    window_capacity: usize,
}

impl<W: Write> SummaryRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_sample: None, window_len: 0, window_capacity: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for SummaryRenderer<W> {
    fn update_series(&mut self, series: &WindowSnapshot) -> Result<()> {
        self.window_len = series.len;
        self.window_capacity = series.capacity;
        Ok(())
    }

    fn update_pose(&mut self, pose: &Pose, _faces: &[FacePolygon]) -> Result<()> {
        if self.last_sample.as_ref() != Some(&pose.sample) {
            writeln!(
                self.out,
                "{} [window {}/{}]",
                pose.sample,
                self.window_len,
                self.window_capacity
            )?;
            self.last_sample = Some(pose.sample);
        }
        Ok(())
    }

    fn end_tick(&mut self, result: &TickResult) -> Result<()> {
        if result.state == TickState::AwaitingFirstSample && result.tick == 0 {
            writeln!(self.out, "Waiting for first sample...")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
