//! Contracts exposed by the host windowing system.
//!
//! These traits allow overlay components to delegate window placement and
//! touch delivery to the host platform, enabling integration with different
//! environments (and scripted fakes in tests) without depending on any
//! concrete window manager.

use crate::geometry::Rect;
use crate::input::TouchEvent;
use std::rc::Rc;

/// Anchor corner used by the host's window-positioning system.
///
/// Hosts may have been configured with any of these; position writes from
/// overlay components always force [`Gravity::TopStart`] so that successive
/// coordinate deltas stay in one frame of reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gravity {
    TopStart,
    TopEnd,
    BottomStart,
    BottomEnd,
    Center,
}

/// Placement parameters of the host window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowParams {
    pub x: i32,
    pub y: i32,
    pub gravity: Gravity,
}

/// Touch consumer installed on a surface. Returns true when the event was
/// consumed and should not propagate further (e.g. to click handling).
pub type TouchListener = Box<dyn FnMut(TouchEvent) -> bool>;

/// A floating overlay window managed by the host platform.
pub trait HostWindow {
    /// The drawable, touchable surface being positioned.
    fn decor_view(&self) -> Rc<dyn SurfaceHandle>;

    /// Current placement parameters, or `None` once the window has been
    /// torn down. Callers treat `None` as a benign race, not an error.
    fn window_params(&self) -> Option<WindowParams>;

    /// Stores new placement parameters without applying them.
    fn set_window_params(&self, params: WindowParams);

    /// Applies pending parameter changes to the live window.
    fn update(&self);
}

/// The overlay window's decor surface.
pub trait SurfaceHandle {
    /// Screen rectangle currently usable for content, excluding system
    /// insets (status bar, notch).
    fn visible_frame(&self) -> Rect;

    /// Absolute on-screen position of the surface's top-left corner.
    fn screen_position(&self) -> (i32, i32);

    /// Current laid-out width of the surface.
    fn width(&self) -> i32;

    /// Current laid-out height of the surface.
    fn height(&self) -> i32;

    /// Registers the sole low-level touch consumer, replacing any previous
    /// listener.
    fn set_touch_listener(&self, listener: TouchListener);
}
