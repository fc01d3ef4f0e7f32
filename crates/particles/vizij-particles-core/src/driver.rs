//! Scheduling and observer seams.
//!
//! A host supplies a [`TickDriver`] backed by its display-sync primitive and
//! scroll/resize observers that write into an [`InputSink`]. Nothing here
//! registers global state; everything is handed to the animator explicitly.

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::{InputSink, Viewport};

/// Per-frame callback; receives seconds since the previous tick.
pub type TickCallback = Box<dyn FnMut(f32)>;

pub trait TickDriver {
    /// Begin invoking `callback` once per display frame. Replaces any
    /// previously registered callback.
    fn start(&mut self, callback: TickCallback);
    /// Stop ticking and drop the callback. Idempotent.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Observes document scroll and writes normalised progress into the sink.
pub trait ScrollProvider {
    /// Start observing. Implementations should publish the current progress
    /// immediately.
    fn observe(&mut self, sink: InputSink);
    fn disconnect(&mut self);
}

/// Observes viewport size changes and writes them into the sink.
pub trait ResizeNotifier {
    /// Current viewport, used to pick the device class at mount.
    fn viewport(&self) -> Viewport;
    fn observe(&mut self, sink: InputSink);
    fn disconnect(&mut self);
}

#[derive(Default)]
struct ManualInner {
    callback: Option<TickCallback>,
    running: bool,
    ticks: u64,
}

/// Tick driver advanced by hand. Clones share the same registration, so a
/// test can keep one handle while the animator owns another.
#[derive(Clone, Default)]
pub struct ManualTickDriver {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualTickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick of `dt` seconds. Returns false when stopped.
    pub fn advance(&self, dt: f32) -> bool {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            if !inner.running {
                return false;
            }
            inner.callback.take()
        };
        let Some(mut callback) = callback else {
            return false;
        };
        callback(dt);

        let mut inner = self.inner.borrow_mut();
        inner.ticks += 1;
        // The callback may have stopped or restarted the driver.
        if inner.running && inner.callback.is_none() {
            inner.callback = Some(callback);
        }
        true
    }

    /// Run `frames` ticks of `dt` each; returns how many actually ran.
    pub fn advance_frames(&self, frames: usize, dt: f32) -> usize {
        (0..frames).take_while(|_| self.advance(dt)).count()
    }

    pub fn ticks(&self) -> u64 {
        self.inner.borrow().ticks
    }
}

impl TickDriver for ManualTickDriver {
    fn start(&mut self, callback: TickCallback) {
        let mut inner = self.inner.borrow_mut();
        inner.callback = Some(callback);
        inner.running = true;
    }

    fn stop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.running = false;
        inner.callback = None;
    }

    fn is_running(&self) -> bool {
        self.inner.borrow().running
    }
}

impl std::fmt::Debug for ManualTickDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualTickDriver")
            .field("running", &inner.running)
            .field("ticks", &inner.ticks)
            .finish()
    }
}
