//! # Attitude
//!
//! Orientation-stream processing for serial-connected inertial sensors.
//!
//! A sensor prints one `pitch,roll[,yaw]` record per line. This crate turns
//! those lines into angle samples, keeps a bounded rolling history per axis,
//! and rotates a reference body by the latest sample every update tick so a
//! renderer can draw both the time series and the current pose.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math type re-exports
//! - [`core`] - Angle samples, line decoding and the sliding window
//! - [`geom`] - Euler rotation composition and the reference body
//! - [`stream`] - Line sources (readers, background reader thread, scripted)
//! - [`pipeline`] - Tick driver, renderers, settings and the fixed-interval loop
//!
//! ## Example
//!
//! ```ignore
//! use attitude::prelude::*;
//!
//! let settings = Settings::default();
//! let source = MemorySource::from_lines(["10.0,20.0,30.0"]);
//! let mut driver = TickDriver::new(source, &settings, ReferenceBody::slab())?;
//!
//! let tick = driver.advance()?;
//! if let Some(pose) = &tick.pose {
//!     println!("{:?}", pose.vertices);
//! }
//! ```

pub mod util;
pub mod core;
pub mod geom;
pub mod stream;
pub mod pipeline;

// Re-export commonly used types
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, RotationMatrix, Vertex3D};
    pub use crate::core::{AngleSample, AxisSet, LineDecoder, SlidingWindow, WindowSnapshot};
    pub use crate::geom::{CompositionOrder, FacePolygon, ReferenceBody, RotationComposer};
    pub use crate::stream::{LineSource, MemorySource, ReaderSource, ThreadedSource};
    pub use crate::pipeline::{Pose, Renderer, Settings, TickDriver, TickResult, TickState};
}
