//! The update pipeline: settings, tick driver, renderer hand-off and the
//! fixed-interval loop.

mod settings;
mod tick;
mod render;
mod ticker;

pub use settings::*;
pub use tick::*;
pub use render::*;
pub use ticker::*;
