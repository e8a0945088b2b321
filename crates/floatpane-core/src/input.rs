//! Raw touch input as delivered by the host surface.

/// Phase of a touch sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single touch event in absolute screen coordinates.
///
/// `raw_x`/`raw_y` are screen-space, not surface-local: drag bookkeeping
/// compares down and up positions across the whole display, so surface-local
/// coordinates (which shift when the surface itself moves) are useless here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    pub raw_x: f32,
    pub raw_y: f32,
}

impl TouchEvent {
    pub fn new(kind: TouchEventKind, raw_x: f32, raw_y: f32) -> Self {
        Self { kind, raw_x, raw_y }
    }
}
