//! Utility types shared by the whole pipeline.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam plus rotation helpers

mod error;
mod math;

pub use error::*;
pub use math::*;
