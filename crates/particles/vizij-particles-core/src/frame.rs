//! Per-frame math: progress → keyframe segment, exact-endpoint interpolation,
//! shimmer oscillation, zoom pulse, flicker and camera parameters.

use std::f32::consts::PI;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::DeviceClass;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1200.0;
pub const FOG_DENSITY: f32 = 0.003;

/// Adjacent keyframe pair and the local blend factor between them.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub t: f32,
}

/// Map progress to `(index, t)` with `index` in `[0, keyframe_count - 2]` and `t` in `[0, 1]`.
///
/// Non-finite progress is treated as 0. Fewer than two keyframes yields `(0, 0)`.
pub fn segment_for_progress(progress: f32, keyframe_count: usize) -> Segment {
    if keyframe_count < 2 {
        return Segment { index: 0, t: 0.0 };
    }
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let segments = (keyframe_count - 1) as f32;
    let size = 1.0 / segments;
    let index = ((p / size).floor() as usize).min(keyframe_count - 2);
    let t = ((p - index as f32 * size) / size).clamp(0.0, 1.0);
    Segment { index, t }
}

/// Linear blend that returns `a` exactly at `t = 0` and `b` exactly at `t = 1`.
#[inline]
pub fn lerp_exact(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Blend two equal-length xyz buffers into `out`.
pub fn interpolate_into(out: &mut [f32], from: &[f32], to: &[f32], t: f32) {
    debug_assert_eq!(from.len(), to.len());
    for ((o, a), b) in out.iter_mut().zip(from).zip(to) {
        *o = lerp_exact(*a, *b, t);
    }
}

/// `elapsed * rate` wrapped into `[0, 2π)` before narrowing to `f32`.
#[inline]
fn time_phase(elapsed: f64, rate: f64) -> f32 {
    (elapsed * rate).rem_euclid(TAU) as f32
}

/// Per-axis shimmer offset for particle `i`.
#[inline]
pub fn oscillation(i: usize, elapsed: f64, motion_scale: f32) -> [f32; 3] {
    let fi = i as f32;
    [
        (time_phase(elapsed, 0.9) + fi * 0.0018).sin() * 0.22 * motion_scale,
        (time_phase(elapsed, 0.8) + fi * 0.0014).cos() * 0.2 * motion_scale,
        (time_phase(elapsed, 0.7) + fi * 0.0011).sin() * 0.18 * motion_scale,
    ]
}

/// Add `oscillation` to every particle in an xyz buffer.
pub fn apply_oscillation(positions: &mut [f32], elapsed: f64, motion_scale: f32) {
    for (i, p) in positions.chunks_exact_mut(3).enumerate() {
        let o = oscillation(i, elapsed, motion_scale);
        p[0] += o[0];
        p[1] += o[1];
        p[2] += o[2];
    }
}

/// 0 at keyframes, 1 halfway through a transition.
#[inline]
pub fn zoom_phase(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * PI).sin().max(0.0)
}

/// Slow global shimmer in roughly [0.86, 0.94].
#[inline]
pub fn flicker_opacity(elapsed: f64) -> f32 {
    0.9 + time_phase(elapsed, 1.6).sin() * 0.04
}

/// Width/height with both sides clamped to at least one pixel.
#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Perspective camera looking down -z at the field from `distance`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub fog_density: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov: 60.0,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            distance: 155.0,
            fog_density: FOG_DENSITY,
        }
    }
}

/// Scalar frame state, shared by every adapter.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameMeta {
    pub segment: Segment,
    pub zoom_phase: f32,
    pub camera: CameraParams,
    pub point_size: f32,
    pub opacity: f32,
    /// Rotation around the vertical axis, radians in `[0, 2π)`.
    pub rotation_y: f32,
    /// Seconds since the field started.
    pub elapsed: f64,
    pub device_class: DeviceClass,
    pub particle_count: usize,
}

/// One frame ready for presentation.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub meta: FrameMeta,
}
