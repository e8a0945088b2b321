//! Scripted host-window fakes for exercising `DraggableAnchor` end to end.
//!
//! The fakes mirror the platform contract exactly: the surface reports a
//! settable visible frame / screen position, and the host applies stored
//! window params to the surface when `update()` runs, the way a live window
//! manager would.

#![allow(dead_code)]

use floatpane_core::{
    FixedDensity, Gravity, HostWindow, Rect, SurfaceHandle, TouchEvent, TouchEventKind,
    TouchListener, VirtualTaskQueue, WindowParams,
};
use floatpane_drag::DraggableAnchor;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// System density used by every harness: 1dp = 3px.
pub const DENSITY: f32 = 3.0;

pub struct FakeSurface {
    pub frame: Cell<Rect>,
    pub position: Cell<(i32, i32)>,
    pub size: Cell<(i32, i32)>,
    listener: RefCell<Option<TouchListener>>,
}

impl FakeSurface {
    pub fn new(frame: Rect, position: (i32, i32), size: (i32, i32)) -> Rc<Self> {
        Rc::new(Self {
            frame: Cell::new(frame),
            position: Cell::new(position),
            size: Cell::new(size),
            listener: RefCell::new(None),
        })
    }

    /// Delivers one touch event to the installed listener, returning whether
    /// it was consumed.
    pub fn send_touch(&self, kind: TouchEventKind, x: f32, y: f32) -> bool {
        let mut listener = self.listener.borrow_mut();
        match listener.as_mut() {
            Some(listener) => listener(TouchEvent::new(kind, x, y)),
            None => false,
        }
    }
}

impl SurfaceHandle for FakeSurface {
    fn visible_frame(&self) -> Rect {
        self.frame.get()
    }

    fn screen_position(&self) -> (i32, i32) {
        self.position.get()
    }

    fn width(&self) -> i32 {
        self.size.get().0
    }

    fn height(&self) -> i32 {
        self.size.get().1
    }

    fn set_touch_listener(&self, listener: TouchListener) {
        *self.listener.borrow_mut() = Some(listener);
    }
}

pub struct FakeHost {
    pub surface: Rc<FakeSurface>,
    pub params: RefCell<Option<WindowParams>>,
    pub update_calls: Cell<usize>,
}

impl FakeHost {
    pub fn new(surface: Rc<FakeSurface>) -> Rc<Self> {
        Rc::new(Self {
            surface,
            params: RefCell::new(Some(WindowParams {
                x: 0,
                y: 0,
                gravity: Gravity::TopStart,
            })),
            update_calls: Cell::new(0),
        })
    }

    /// Simulates the overlay window being destroyed under the component.
    pub fn tear_down(&self) {
        *self.params.borrow_mut() = None;
    }

    pub fn params(&self) -> Option<WindowParams> {
        *self.params.borrow()
    }
}

impl HostWindow for FakeHost {
    fn decor_view(&self) -> Rc<dyn SurfaceHandle> {
        self.surface.clone()
    }

    fn window_params(&self) -> Option<WindowParams> {
        *self.params.borrow()
    }

    fn set_window_params(&self, params: WindowParams) {
        *self.params.borrow_mut() = Some(params);
    }

    fn update(&self) {
        self.update_calls.set(self.update_calls.get() + 1);
        // The live window moves to wherever the stored params point.
        if let Some(params) = *self.params.borrow() {
            self.surface.position.set((params.x, params.y));
        }
    }
}

pub struct Harness {
    pub surface: Rc<FakeSurface>,
    pub host: Rc<FakeHost>,
    pub queue: Rc<VirtualTaskQueue>,
    pub anchor: DraggableAnchor,
}

pub fn start_anchor(frame: Rect, position: (i32, i32), size: (i32, i32)) -> Harness {
    let surface = FakeSurface::new(frame, position, size);
    let host = FakeHost::new(surface.clone());
    let queue = Rc::new(VirtualTaskQueue::new());
    let anchor = DraggableAnchor::start(
        host.clone(),
        queue.clone(),
        Rc::new(FixedDensity(DENSITY)),
    );
    Harness {
        surface,
        host,
        queue,
        anchor,
    }
}
