//! Core stream-processing types.
//!
//! - [`AngleSample`] / [`AxisSet`] - Decoded orientation samples
//! - [`LineDecoder`] - Tolerant line parser for the sensor wire format
//! - [`SlidingWindow`] - Fixed-capacity per-axis history

mod sample;
mod decoder;
mod window;

pub use sample::*;
pub use decoder::*;
pub use window::*;
