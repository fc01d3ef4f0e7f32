//! Animation state and the input slots written by scroll/resize observers.
//!
//! Observers run outside the frame loop and only ever store primitive values.
//! The frame loop snapshots the slots once at the start of each frame; a later
//! write simply wins.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DeviceClass;

/// Viewport size in CSS/logical pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Normalised document scroll position in `[0, 1]`.
///
/// Documents that do not scroll report 0.
pub fn scroll_progress(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let range = document_height - viewport_height;
    if !range.is_finite() || range <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / range).clamp(0.0, 1.0)
}

#[derive(Debug)]
struct Slots {
    progress: AtomicU32,
    width: AtomicU32,
    height: AtomicU32,
    viewport_dirty: AtomicBool,
}

/// Cloneable write handle shared between observers and the frame loop.
#[derive(Clone, Debug)]
pub struct InputSink {
    slots: Arc<Slots>,
}

/// What the frame loop saw at the start of a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputSnapshot {
    pub progress: f32,
    pub viewport: Viewport,
    pub viewport_changed: bool,
}

impl InputSink {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            slots: Arc::new(Slots {
                progress: AtomicU32::new(0.0f32.to_bits()),
                width: AtomicU32::new(viewport.width),
                height: AtomicU32::new(viewport.height),
                viewport_dirty: AtomicBool::new(false),
            }),
        }
    }

    /// Store scroll progress, clamped to `[0, 1]`.
    pub fn set_scroll_progress(&self, progress: f32) {
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.slots.progress.store(p.to_bits(), Ordering::Relaxed);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.slots.width.store(viewport.width, Ordering::Relaxed);
        self.slots.height.store(viewport.height, Ordering::Relaxed);
        self.slots.viewport_dirty.store(true, Ordering::Release);
    }

    pub fn scroll_progress(&self) -> f32 {
        f32::from_bits(self.slots.progress.load(Ordering::Relaxed))
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.slots.width.load(Ordering::Relaxed),
            self.slots.height.load(Ordering::Relaxed),
        )
    }

    /// Read all slots and clear the viewport-changed flag.
    pub fn snapshot(&self) -> InputSnapshot {
        let viewport_changed = self.slots.viewport_dirty.swap(false, Ordering::Acquire);
        InputSnapshot {
            progress: self.scroll_progress(),
            viewport: self.viewport(),
            viewport_changed,
        }
    }
}

/// Mutable per-frame state owned by the frame loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Latest progress reported by the scroll observer.
    pub target_progress: f32,
    /// Progress actually rendered (eased towards the target on mobile).
    pub progress: f32,
    pub elapsed: f64,
    /// Rotation around the vertical axis, kept in `[0, 2π)`.
    pub rotation_y: f32,
    pub viewport: Viewport,
    pub device_class: DeviceClass,
}

impl AnimationState {
    pub fn new(viewport: Viewport, device_class: DeviceClass) -> Self {
        Self {
            target_progress: 0.0,
            progress: 0.0,
            elapsed: 0.0,
            rotation_y: 0.0,
            viewport,
            device_class,
        }
    }

    pub fn set_target_progress(&mut self, progress: f32) {
        self.target_progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Advance time and ease displayed progress toward the target.
    ///
    /// `lag` is an exponential time constant in seconds; 0 snaps immediately.
    pub fn advance(&mut self, dt: f32, lag: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += f64::from(dt);
        if lag <= 0.0 {
            self.progress = self.target_progress;
        } else {
            let alpha = 1.0 - (-dt / lag).exp();
            self.progress += (self.target_progress - self.progress) * alpha;
        }
        self.progress = self.progress.clamp(0.0, 1.0);
    }
}
