//! Position bookkeeping for a draggable overlay surface.
//!
//! [`DraggableAnchor`] sits between the host window and the raw touch
//! stream. It caches where the surface sits relative to the visible screen
//! area, decides whether a touch sequence is an intentional drag, and
//! re-anchors the surface when the usable screen area changes under it
//! (rotation moving insets and swapping width/height).

use crate::gesture::min_touch_distance;
use floatpane_core::{
    DensityProvider, Gravity, HostWindow, Point, SurfaceHandle, TaskHandle, TaskQueue, TouchEvent,
    TouchEventKind, WindowParams,
};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Delay before the post-rotation window frame is re-read.
///
/// Rotation triggers the platform's own layout pass; reading the frame
/// before that pass settles returns the pre-rotation geometry. 100ms is an
/// empirical timing contract, not a synchronization primitive.
const REANCHOR_DELAY_MS: u64 = 100;

/// Absolute tolerance for treating the surface as flush with a window edge.
/// A fixed pixel value stays stable across very small and very large
/// windows, where a relative tolerance would not.
const EDGE_SNAP_TOLERANCE_PX: f32 = 1.0;

/// Cached placement of the surface within the visible screen area.
///
/// All six fields are refreshed together from a single platform read, so
/// the cache never mixes an old window size with a new surface position.
/// The snapshot is advisory only: it is always safe to discard and recompute
/// from the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionSnapshot {
    /// Width of the window's visible frame.
    pub window_width: i32,
    /// Height of the window's visible frame.
    pub window_height: i32,
    /// Horizontal offset of the visible frame from the display origin,
    /// typically a notch in landscape. Never negative.
    pub window_inset_left: i32,
    /// Vertical offset of the visible frame from the display origin,
    /// typically the status bar. Never negative.
    pub window_inset_top: i32,
    /// Absolute screen x of the surface's top-left corner.
    pub surface_screen_x: i32,
    /// Absolute screen y of the surface's top-left corner.
    pub surface_screen_y: i32,
}

/// Capability seam between the host and a drag implementation.
///
/// The host feeds raw touch events and orientation-change notifications
/// through this trait; [`DraggableAnchor`] is the base implementation, and
/// richer strategies wrap or replace it.
pub trait DragController {
    /// Feeds one raw touch event. Returns true when the event was consumed
    /// as part of a drag gesture and must not reach click handling.
    fn handle_touch(&self, event: TouchEvent) -> bool;

    /// Notifies that the display's rotation/orientation changed.
    fn on_orientation_change(&self);
}

struct AnchorInner {
    host: Rc<dyn HostWindow>,
    surface: Rc<dyn SurfaceHandle>,
    queue: Rc<dyn TaskQueue>,
    density: Rc<dyn DensityProvider>,
    snapshot: PositionSnapshot,
    down: Option<Point>,
    detached: bool,
    pending: SmallVec<[TaskHandle; 2]>,
}

impl AnchorInner {
    fn refresh_snapshot(&mut self) {
        if self.detached {
            return;
        }
        // One combined read: frame and surface position must come from the
        // same platform state, or the snapshot tears.
        let frame = self.surface.visible_frame();
        let (screen_x, screen_y) = self.surface.screen_position();
        self.snapshot = PositionSnapshot {
            window_width: frame.width(),
            window_height: frame.height(),
            window_inset_left: frame.left,
            window_inset_top: frame.top,
            surface_screen_x: screen_x,
            surface_screen_y: screen_y,
        };
    }

    fn is_drag_intent(&self, down_x: f32, up_x: f32, down_y: f32, up_y: f32) -> bool {
        let slop = min_touch_distance(self.density.as_ref());
        (down_x - up_x).abs() >= slop || (down_y - up_y).abs() >= slop
    }

    fn update_location(&mut self, x: f32, y: f32) {
        if self.detached {
            return;
        }
        let x = x as i32;
        let y = y as i32;
        // The positioning system must keep a single anchor corner: mixing
        // gravities makes successive deltas incompatible.
        let gravity = Gravity::TopStart;
        // A torn-down window is an expected race with deferred callbacks.
        let Some(params) = self.host.window_params() else {
            return;
        };
        if params.gravity == gravity && params.x == x && params.y == y {
            return;
        }
        self.host.set_window_params(WindowParams { x, y, gravity });
        self.host.update();
    }

    fn retain_live_pending(&mut self) {
        self.pending
            .retain(|handle| !handle.is_finished() && !handle.is_cancelled());
    }
}

fn handle_touch_event(inner: &Rc<RefCell<AnchorInner>>, event: TouchEvent) -> bool {
    let mut state = inner.borrow_mut();
    if state.detached {
        return false;
    }
    match event.kind {
        TouchEventKind::Down => {
            // The pre-drag baseline: everything downstream measures from
            // the geometry at finger-down.
            state.refresh_snapshot();
            state.down = Some(Point::new(event.raw_x, event.raw_y));
            false
        }
        TouchEventKind::Move => false,
        TouchEventKind::Up => match state.down.take() {
            Some(down) => state.is_drag_intent(down.x, event.raw_x, down.y, event.raw_y),
            None => false,
        },
        TouchEventKind::Cancel => {
            state.down = None;
            false
        }
    }
}

/// Computes the surface's center as a fraction of the window extent, with
/// near-edge positions snapped to exactly 0.0 or 1.0 so a surface parked on
/// an edge stays parked there after re-anchoring.
fn anchor_fraction(start: i32, view_extent: i32, window_extent: i32) -> f32 {
    if (start as f32) < EDGE_SNAP_TOLERANCE_PX {
        0.0
    } else if ((window_extent - (start + view_extent)) as f32).abs() < EDGE_SNAP_TOLERANCE_PX {
        1.0
    } else {
        let center = start as f32 + view_extent as f32 / 2.0;
        center / window_extent as f32
    }
}

/// Base drag controller for one overlay surface.
///
/// Owns the [`PositionSnapshot`], installs itself as the surface's sole
/// touch consumer, and performs the orientation re-anchoring algorithm.
/// All operations run on the host's single UI thread; deferred steps go
/// through the injected [`TaskQueue`].
pub struct DraggableAnchor {
    inner: Rc<RefCell<AnchorInner>>,
}

impl DraggableAnchor {
    /// Begins observing `host`'s decor surface.
    ///
    /// Installs the touch-intent filter as the surface's touch listener and
    /// posts a deferred snapshot refresh, so the baseline is read strictly
    /// after the layout pass that gives the surface its first on-screen
    /// position. Position queries made earlier can return stale values.
    pub fn start(
        host: Rc<dyn HostWindow>,
        queue: Rc<dyn TaskQueue>,
        density: Rc<dyn DensityProvider>,
    ) -> Self {
        let surface = host.decor_view();
        let inner = Rc::new(RefCell::new(AnchorInner {
            host,
            surface: surface.clone(),
            queue: queue.clone(),
            density,
            snapshot: PositionSnapshot::default(),
            down: None,
            detached: false,
            pending: SmallVec::new(),
        }));

        let weak = Rc::downgrade(&inner);
        surface.set_touch_listener(Box::new(move |event| match weak.upgrade() {
            Some(inner) => handle_touch_event(&inner, event),
            None => false,
        }));

        let weak = Rc::downgrade(&inner);
        let handle = queue.post(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().refresh_snapshot();
            }
        }));
        inner.borrow_mut().pending.push(handle);

        Self { inner }
    }

    /// Stops observing: cancels in-flight deferred work and discards the
    /// snapshot. Touch events arriving afterwards are ignored.
    pub fn stop(&self) {
        let mut state = self.inner.borrow_mut();
        state.detached = true;
        for handle in state.pending.drain(..) {
            handle.cancel();
        }
        state.down = None;
        state.snapshot = PositionSnapshot::default();
    }

    /// Re-reads the visible frame and surface position into the snapshot.
    pub fn refresh_snapshot(&self) {
        self.inner.borrow_mut().refresh_snapshot();
    }

    /// Read-only copy of the cached placement.
    pub fn snapshot(&self) -> PositionSnapshot {
        self.inner.borrow().snapshot
    }

    /// True when the travel between down and up exceeds the physical
    /// drag threshold on either axis.
    pub fn is_drag_intent(&self, down_x: f32, up_x: f32, down_y: f32, up_y: f32) -> bool {
        self.inner
            .borrow()
            .is_drag_intent(down_x, up_x, down_y, up_y)
    }

    /// Moves the surface's top-left corner to absolute screen coordinates.
    ///
    /// Input is fractional for the benefit of gesture math and truncated to
    /// integer pixels before applying. Gravity is forced to top-start on
    /// every write. Redundant writes and writes to a torn-down window are
    /// silently skipped.
    pub fn update_location(&self, x: f32, y: f32) {
        self.inner.borrow_mut().update_location(x, y);
    }

    /// Re-anchors the surface after a rotation.
    ///
    /// The anchor fraction is computed immediately from the pre-rotation
    /// snapshot; the new frame is read and the position replayed only after
    /// a settle delay, once the platform has finished its own rotation
    /// layout, followed by one further tick to resynchronize the snapshot.
    pub fn on_orientation_change(&self) {
        let (queue, percent_x, percent_y, view_width) = {
            let mut state = self.inner.borrow_mut();
            if state.detached {
                return;
            }
            // The surface view itself is already laid out for the new
            // orientation; the snapshot still describes the old one.
            let view_width = state.surface.width();
            let view_height = state.surface.height();
            let snapshot = state.snapshot;
            let start_x = snapshot.surface_screen_x - snapshot.window_inset_left;
            let start_y = snapshot.surface_screen_y - snapshot.window_inset_top;
            let percent_x = anchor_fraction(start_x, view_width, snapshot.window_width);
            let percent_y = anchor_fraction(start_y, view_height, snapshot.window_height);
            log::debug!(
                "re-anchoring overlay at ({:.3}, {:.3}) of the new window frame",
                percent_x,
                percent_y
            );
            state.retain_live_pending();
            (state.queue.clone(), percent_x, percent_y, view_width)
        };

        let weak = Rc::downgrade(&self.inner);
        let handle = queue.post_delayed(
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                let (surface, queue) = {
                    let state = inner.borrow();
                    if state.detached {
                        return;
                    }
                    (state.surface.clone(), state.queue.clone())
                };
                let frame = surface.visible_frame();
                let x = frame.width() as f32 * percent_x - view_width as f32 / 2.0;
                // NOTE: the vertical offset reuses the view *width*. Kept
                // as observed in the long-standing behavior this replaces;
                // it only differs for non-square surfaces.
                let y = frame.height() as f32 * percent_y - view_width as f32 / 2.0;
                inner.borrow_mut().update_location(x, y);

                let weak = Rc::downgrade(&inner);
                let refresh = queue.post(Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().refresh_snapshot();
                    }
                }));
                inner.borrow_mut().pending.push(refresh);
            }),
            REANCHOR_DELAY_MS,
        );
        self.inner.borrow_mut().pending.push(handle);
    }
}

impl DragController for DraggableAnchor {
    fn handle_touch(&self, event: TouchEvent) -> bool {
        handle_touch_event(&self.inner, event)
    }

    fn on_orientation_change(&self) {
        DraggableAnchor::on_orientation_change(self);
    }
}
