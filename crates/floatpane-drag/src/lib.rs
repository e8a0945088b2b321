//! Drag tracking and orientation re-anchoring for floating overlay surfaces.
//!
//! The central type is [`DraggableAnchor`]: it owns the position bookkeeping
//! for one overlay surface, classifies raw touch sequences as drags or taps,
//! and replays the surface's relative anchor against the new window frame
//! after the display rotates. Concrete drag strategies (snap-to-edge, axis
//! lock, ...) build on top of it through the [`DragController`] seam.

mod draggable;
mod gesture;

pub use draggable::{DragController, DraggableAnchor, PositionSnapshot};
pub use gesture::{min_touch_distance, MIN_TOUCH_DISTANCE};
