//! Core configuration for vizij-particles-core.
//!
//! `Config` carries the tunable constants of the field (budgets, jitter,
//! breakpoints). `DeviceProfile` is derived from it per device class and holds
//! everything the frame loop adapts between desktop and mobile.

use serde::{Deserialize, Serialize};

use crate::error::ParticleError;

/// Viewport widths below this are treated as mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;
/// Viewport widths below this (and at or above the mobile breakpoint) get a wider FOV.
pub const COMPACT_BREAKPOINT: u32 = 1024;
/// Particle budget for desktop devices.
pub const PARTICLE_COUNT: usize = 18_000;
/// Largest accepted particle budget or boundary sample count.
pub const MAX_PARTICLE_COUNT: usize = 1_000_000;

/// Configuration for field sizing and sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Full (desktop) particle budget.
    pub particle_count: usize,
    /// Fraction of the full budget used on mobile.
    pub mobile_ratio: f32,
    pub mobile_breakpoint: u32,
    pub compact_breakpoint: u32,

    /// Fraction of each silhouette's points placed on its boundary.
    pub boundary_fraction: f32,
    /// Size of the dense arc-length boundary set the boundary quota is drawn from.
    pub boundary_samples: usize,
    pub boundary_jitter: f32,
    pub interior_jitter: f32,
    pub depth_jitter: f32,
    /// Rejection-sampling draws allowed per interior point before falling back.
    pub max_attempts_per_point: usize,

    pub sphere_radius: f32,

    /// Seed for the generation RNG. Adapters pick one when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            mobile_ratio: 0.6,
            mobile_breakpoint: MOBILE_BREAKPOINT,
            compact_breakpoint: COMPACT_BREAKPOINT,
            boundary_fraction: 0.25,
            boundary_samples: 2500,
            boundary_jitter: 0.5,
            interior_jitter: 0.2,
            depth_jitter: 0.8,
            max_attempts_per_point: 256,
            sphere_radius: 55.0,
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ParticleError> {
        let invalid = |reason: &str| {
            Err(ParticleError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if self.particle_count == 0 {
            return invalid("particle_count must be > 0");
        }
        if self.particle_count > MAX_PARTICLE_COUNT {
            return invalid("particle_count exceeds MAX_PARTICLE_COUNT");
        }
        if !(0.0..=1.0).contains(&self.mobile_ratio) || self.mobile_ratio == 0.0 {
            return invalid("mobile_ratio must be in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.boundary_fraction) {
            return invalid("boundary_fraction must be in [0, 1]");
        }
        if self.boundary_samples == 0 || self.boundary_samples > MAX_PARTICLE_COUNT {
            return invalid("boundary_samples must be in 1..=MAX_PARTICLE_COUNT");
        }
        if self.max_attempts_per_point == 0 {
            return invalid("max_attempts_per_point must be > 0");
        }
        if self.compact_breakpoint < self.mobile_breakpoint {
            return invalid("compact_breakpoint must not be below mobile_breakpoint");
        }
        Ok(())
    }

    pub fn device_class(&self, viewport_width: u32) -> DeviceClass {
        if viewport_width < self.mobile_breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Particle budget for a device class. Never zero.
    pub fn particle_count_for(&self, class: DeviceClass) -> usize {
        match class {
            DeviceClass::Desktop => self.particle_count,
            DeviceClass::Mobile => {
                ((self.particle_count as f32 * self.mobile_ratio).floor() as usize).max(1)
            }
        }
    }

    pub fn profile(&self, class: DeviceClass) -> DeviceProfile {
        DeviceProfile::new(class, self.particle_count_for(class))
    }

    /// Camera field of view (degrees) for a viewport width.
    pub fn fov_for_width(&self, viewport_width: u32) -> f32 {
        if viewport_width < self.mobile_breakpoint {
            70.0
        } else if viewport_width < self.compact_breakpoint {
            68.0
        } else {
            60.0
        }
    }
}

/// Coarse performance tier inferred from viewport width.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        matches!(self, DeviceClass::Mobile)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    HighPerformance,
    LowPower,
}

/// Per-device-class tuning of the frame loop and the rendering surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub class: DeviceClass,
    pub particle_count: usize,
    pub point_size: f32,
    /// Extra point size at the middle of a transition.
    pub point_size_boost: f32,
    pub motion_scale: f32,
    /// Field rotation around the vertical axis, radians per second.
    pub rotation_rate: f32,
    pub camera_distance: f32,
    /// Extra camera distance at the middle of a transition.
    pub zoom_amount: f32,
    pub max_pixel_ratio: f32,
    pub antialias: bool,
    pub power_preference: PowerPreference,
    /// Time constant for easing displayed progress towards the scroll target; 0 follows directly.
    pub scroll_lag: f32,
}

impl DeviceProfile {
    pub fn new(class: DeviceClass, particle_count: usize) -> Self {
        match class {
            DeviceClass::Desktop => Self {
                class,
                particle_count,
                point_size: 1.8,
                point_size_boost: 0.5,
                motion_scale: 1.0,
                rotation_rate: 0.036,
                camera_distance: 155.0,
                zoom_amount: 18.0,
                max_pixel_ratio: 2.0,
                antialias: true,
                power_preference: PowerPreference::HighPerformance,
                scroll_lag: 0.0,
            },
            DeviceClass::Mobile => Self {
                class,
                particle_count,
                point_size: 2.2,
                point_size_boost: 0.3,
                motion_scale: 0.6,
                rotation_rate: 0.018,
                camera_distance: 170.0,
                zoom_amount: 12.0,
                max_pixel_ratio: 1.5,
                antialias: false,
                power_preference: PowerPreference::LowPower,
                scroll_lag: 0.5,
            },
        }
    }

    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        device_pixel_ratio.min(self.max_pixel_ratio)
    }
}
