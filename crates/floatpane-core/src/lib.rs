//! Platform-facing primitives for Floatpane
//!
//! This crate contains the screen-space geometry, density units, raw touch
//! input types, host-window contracts, and the deferred task scheduler that
//! overlay components build on.

mod geometry;
mod input;
mod platform;
mod scheduler;
mod unit;

pub use geometry::*;
pub use input::*;
pub use platform::*;
pub use scheduler::*;
pub use unit::*;
