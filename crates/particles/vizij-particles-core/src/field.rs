//! FieldEngine: owns the keyframes and render buffers and runs one frame of the
//! morph at a time. Host-agnostic; the animator, the wasm bindings and the
//! Bevy plugin all drive this type.

use std::f32::consts::TAU;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{Config, DeviceClass, DeviceProfile};
use crate::error::ParticleError;
use crate::frame::{
    apply_oscillation, aspect_ratio, flicker_opacity, interpolate_into, segment_for_progress,
    zoom_phase, CameraParams, Frame, FrameMeta, Segment, CAMERA_FAR, CAMERA_NEAR, FOG_DENSITY,
};
use crate::keyframes::KeyframeSequence;
use crate::palette::particle_colors;
use crate::state::{AnimationState, InputSnapshot, Viewport};

/// Seedable generator injected into every keyframe generator.
pub type FieldRng = ChaCha8Rng;

/// Seed used when the config leaves it unset.
pub const DEFAULT_SEED: u64 = 0x5eed_f1e1d;

#[derive(Debug)]
pub struct FieldEngine {
    cfg: Config,
    profile: DeviceProfile,
    keyframes: KeyframeSequence,
    state: AnimationState,
    // Displayed positions, rewritten every frame.
    positions: Vec<f32>,
    colors: Vec<f32>,
    rng: FieldRng,
    meta: FrameMeta,
}

impl FieldEngine {
    /// Build a field for `viewport`, seeding from `cfg.seed` (or `DEFAULT_SEED`).
    pub fn new(cfg: Config, viewport: Viewport) -> Result<Self, ParticleError> {
        let rng = FieldRng::seed_from_u64(cfg.seed.unwrap_or(DEFAULT_SEED));
        Self::with_rng(cfg, viewport, rng)
    }

    pub fn with_rng(
        cfg: Config,
        viewport: Viewport,
        mut rng: FieldRng,
    ) -> Result<Self, ParticleError> {
        cfg.validate()?;
        let class = cfg.device_class(viewport.width);
        let profile = cfg.profile(class);
        let keyframes = KeyframeSequence::morph_sequence(&cfg, profile.particle_count, &mut rng)?;
        log::debug!(
            "particle field ready: {} keyframes x {} particles ({class:?})",
            keyframes.len(),
            keyframes.particle_count()
        );
        let positions = keyframes.first().as_slice().to_vec();
        let colors = particle_colors(keyframes.particle_count());
        let state = AnimationState::new(viewport, class);
        let meta = initial_meta(&cfg, &profile, &state, keyframes.particle_count());
        Ok(Self {
            cfg,
            profile,
            keyframes,
            state,
            positions,
            colors,
            rng,
            meta,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn keyframes(&self) -> &KeyframeSequence {
        &self.keyframes
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn device_class(&self) -> DeviceClass {
        self.state.device_class
    }

    pub fn particle_count(&self) -> usize {
        self.keyframes.particle_count()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn meta(&self) -> &FrameMeta {
        &self.meta
    }

    /// Camera for the current viewport and zoom phase.
    pub fn camera(&self) -> CameraParams {
        camera_for(
            &self.cfg,
            &self.profile,
            self.state.viewport,
            self.meta.zoom_phase,
        )
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            positions: &self.positions,
            colors: &self.colors,
            meta: self.meta,
        }
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.state.set_target_progress(progress);
    }

    /// Record a new viewport; regenerate every keyframe if the device class changed.
    ///
    /// Returns `Ok(true)` when a new sequence was swapped in. On error the
    /// previous viewport, sequence and device class stay in place, so the next
    /// `apply_inputs` with the same viewport retries.
    pub fn sync_viewport(&mut self, viewport: Viewport) -> Result<bool, ParticleError> {
        let class = self.cfg.device_class(viewport.width);
        if class == self.state.device_class {
            self.state.viewport = viewport;
            return Ok(false);
        }
        self.cfg.validate()?;
        let profile = self.cfg.profile(class);
        // Build the replacement completely before touching live state.
        let keyframes =
            KeyframeSequence::morph_sequence(&self.cfg, profile.particle_count, &mut self.rng)?;
        log::debug!(
            "device class {:?} -> {class:?}: regenerated {} particles",
            self.state.device_class,
            keyframes.particle_count()
        );
        self.positions = keyframes.first().as_slice().to_vec();
        self.colors = particle_colors(keyframes.particle_count());
        self.keyframes = keyframes;
        self.profile = profile;
        self.state.device_class = class;
        self.state.viewport = viewport;
        Ok(true)
    }

    /// Apply an observer snapshot. Returns whether keyframes were regenerated.
    pub fn apply_inputs(&mut self, inputs: InputSnapshot) -> Result<bool, ParticleError> {
        self.set_scroll_progress(inputs.progress);
        if inputs.viewport_changed || inputs.viewport != self.state.viewport {
            self.sync_viewport(inputs.viewport)
        } else {
            Ok(false)
        }
    }

    /// Advance by `dt` seconds and recompute the displayed positions.
    pub fn step(&mut self, dt: f32) -> &FrameMeta {
        self.state.advance(dt, self.profile.scroll_lag);
        let segment = segment_for_progress(self.state.progress, self.keyframes.len());
        let (from, to) = self.keyframes.pair(segment.index);
        interpolate_into(&mut self.positions, from.as_slice(), to.as_slice(), segment.t);
        apply_oscillation(&mut self.positions, self.state.elapsed, self.profile.motion_scale);

        let spin = self.profile.rotation_rate * if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.state.rotation_y = (self.state.rotation_y + spin).rem_euclid(TAU);
        self.meta = frame_meta(
            &self.cfg,
            &self.profile,
            &self.state,
            segment,
            self.keyframes.particle_count(),
        );
        &self.meta
    }
}

fn camera_for(cfg: &Config, profile: &DeviceProfile, viewport: Viewport, phase: f32) -> CameraParams {
    CameraParams {
        fov: cfg.fov_for_width(viewport.width),
        aspect: aspect_ratio(viewport.width, viewport.height),
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
        distance: profile.camera_distance + profile.zoom_amount * phase,
        fog_density: FOG_DENSITY,
    }
}

fn frame_meta(
    cfg: &Config,
    profile: &DeviceProfile,
    state: &AnimationState,
    segment: Segment,
    particle_count: usize,
) -> FrameMeta {
    let phase = zoom_phase(segment.t);
    FrameMeta {
        segment,
        zoom_phase: phase,
        camera: camera_for(cfg, profile, state.viewport, phase),
        point_size: profile.point_size + profile.point_size_boost * phase,
        opacity: flicker_opacity(state.elapsed),
        rotation_y: state.rotation_y,
        elapsed: state.elapsed,
        device_class: state.device_class,
        particle_count,
    }
}

fn initial_meta(
    cfg: &Config,
    profile: &DeviceProfile,
    state: &AnimationState,
    particle_count: usize,
) -> FrameMeta {
    frame_meta(
        cfg,
        profile,
        state,
        Segment { index: 0, t: 0.0 },
        particle_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_cfg() -> Config {
        Config {
            particle_count: 200,
            seed: Some(11),
            ..Config::default()
        }
    }

    #[test]
    fn starts_on_the_sphere() {
        let field = FieldEngine::new(small_cfg(), Viewport::new(1440, 900)).expect("field");
        assert_eq!(field.positions(), field.keyframes().first().as_slice());
        assert_eq!(field.colors().len(), 200 * 3);
        assert_eq!(field.device_class(), DeviceClass::Desktop);
    }

    #[test]
    fn rotation_accumulates_with_time() {
        let mut field = FieldEngine::new(small_cfg(), Viewport::new(1440, 900)).expect("field");
        for _ in 0..60 {
            field.step(1.0 / 60.0);
        }
        assert!((field.meta().rotation_y - 0.036).abs() < 1e-4);
    }

    #[test]
    fn crossing_breakpoint_regenerates_with_mobile_budget() {
        let mut field = FieldEngine::new(small_cfg(), Viewport::new(1440, 900)).expect("field");
        assert!(field.sync_viewport(Viewport::new(375, 812)).expect("regen"));
        assert_eq!(field.particle_count(), 120);
        assert_eq!(field.positions().len(), 120 * 3);
        assert_eq!(field.colors().len(), 120 * 3);
    }

    #[test]
    fn rotation_wraps_and_keeps_turning() {
        let mut field = FieldEngine::new(small_cfg(), Viewport::new(1440, 900)).expect("field");
        field.state.rotation_y = TAU - 0.01;
        field.step(1.0);
        let r = field.meta().rotation_y;
        assert!((0.0..TAU).contains(&r));
        assert!((r - 0.026).abs() < 1e-4);
    }

    #[test]
    fn failed_regeneration_keeps_viewport_and_retries() {
        let mut field = FieldEngine::new(small_cfg(), Viewport::new(1440, 900)).expect("field");
        field.cfg.boundary_samples = 0;
        let phone = Viewport::new(375, 812);
        assert!(field.sync_viewport(phone).is_err());
        assert_eq!(field.state().viewport, Viewport::new(1440, 900));
        assert_eq!(field.device_class(), DeviceClass::Desktop);
        assert_eq!(field.particle_count(), 200);

        field.cfg.boundary_samples = 2500;
        let inputs = InputSnapshot {
            progress: 0.0,
            viewport: phone,
            viewport_changed: false,
        };
        assert!(field.apply_inputs(inputs).expect("retry"));
        assert_eq!(field.state().viewport, phone);
        assert_eq!(field.particle_count(), 120);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = Config {
            particle_count: 0,
            ..small_cfg()
        };
        assert!(FieldEngine::new(cfg, Viewport::default()).is_err());
    }
}
