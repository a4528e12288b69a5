//! Rotation composition and the reference body it is applied to.

mod rotation;
mod body;

pub use rotation::*;
pub use body::*;
