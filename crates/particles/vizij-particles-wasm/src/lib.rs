use std::sync::Once;

use js_sys::{Float32Array, Math, Uint8Array};
use rand::SeedableRng;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_particles_core::palette::{self, GLOW_TEXTURE_SIZE};
use vizij_particles_core::{
    scroll_progress, Config, EmberField, FieldEngine, FieldRng, SurfaceConfig, Viewport,
};

static INIT: Once = Once::new();

fn init_runtime() {
    console_error_panic_hook::set_once();
    INIT.call_once(|| {
        console_log::init_with_level(log::Level::Warn).ok();
    });
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Seed from `Math.random()` when the caller did not pin one.
fn host_seed() -> u64 {
    (Math::random() * 9_007_199_254_740_991.0) as u64
}

/// Scroll-driven particle field. JS owns the frame loop and the WebGL
/// surface: call `update(dt)` once per animation frame, then upload
/// `positions()` and apply the returned camera/material parameters.
#[wasm_bindgen]
pub struct VizijParticles {
    core: FieldEngine,
}

#[wasm_bindgen]
impl VizijParticles {
    /// Create a field for a viewport of `width` x `height` CSS pixels.
    /// Pass a JSON config object or undefined/null for defaults.
    /// Example:
    ///   new VizijParticles({ particle_count: 12000 }, innerWidth, innerHeight)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, width: u32, height: u32) -> Result<VizijParticles, JsError> {
        init_runtime();

        let mut cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        if cfg.seed.is_none() {
            cfg.seed = Some(host_seed());
        }
        let core = FieldEngine::new(cfg, Viewport::new(width, height))
            .map_err(|e| JsError::new(&format!("particle field error: {e}")))?;
        Ok(VizijParticles { core })
    }

    /// Record a resize. Returns true when the device class changed and every
    /// keyframe was regenerated (buffer lengths change; re-upload geometry).
    ///
    /// A failed regeneration is logged and reported as `false`; the previous
    /// keyframes stay live and the next call with the same size retries.
    #[wasm_bindgen(js_name = set_viewport)]
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        match self.core.sync_viewport(Viewport::new(width, height)) {
            Ok(regenerated) => regenerated,
            Err(err) => {
                log::warn!("keeping previous particle keyframes: {err}");
                false
            }
        }
    }

    /// Scroll progress in [0, 1]; out-of-range values are clamped.
    #[wasm_bindgen(js_name = set_scroll_progress)]
    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.core.set_scroll_progress(progress);
    }

    /// Convenience for `scrollY / (scrollHeight - innerHeight)`.
    #[wasm_bindgen(js_name = set_scroll_metrics)]
    pub fn set_scroll_metrics(&mut self, scroll_y: f32, document_height: f32, viewport_height: f32) {
        self.core
            .set_scroll_progress(scroll_progress(scroll_y, document_height, viewport_height));
    }

    /// Advance by dt (seconds). Returns frame metadata JSON (segment, camera,
    /// point size, opacity, rotation, device class, particle count).
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let meta = self.core.step(dt);
        swb::to_value(meta).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Current positions (xyz per particle), copied into a new Float32Array.
    #[wasm_bindgen]
    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.core.positions())
    }

    /// Per-particle RGB in 0..1.
    #[wasm_bindgen]
    pub fn colors(&self) -> Float32Array {
        Float32Array::from(self.core.colors())
    }

    #[wasm_bindgen(js_name = particle_count)]
    pub fn particle_count(&self) -> u32 {
        self.core.particle_count() as u32
    }

    /// Renderer setup (pixel ratio, antialias, power preference, camera) for
    /// the current device class.
    #[wasm_bindgen(js_name = surface_config)]
    pub fn surface_config(&self, device_pixel_ratio: f32) -> Result<JsValue, JsError> {
        let cfg = SurfaceConfig::for_field(&self.core, device_pixel_ratio);
        swb::to_value(&cfg).map_err(|e| JsError::new(&format!("surface config error: {e}")))
    }
}

/// RGBA8 radial glow sprite for point materials (`size` defaults to 96).
#[wasm_bindgen(js_name = glow_texture)]
pub fn glow_texture(size: Option<u32>) -> Uint8Array {
    let pixels = palette::glow_texture(size.unwrap_or(GLOW_TEXTURE_SIZE));
    Uint8Array::from(pixels.as_slice())
}

/// 2D canvas embers. `data()` packs `[x, y, size, opacity, r, g, b]` per ember.
#[wasm_bindgen]
pub struct VizijEmbers {
    core: EmberField,
}

#[wasm_bindgen]
impl VizijEmbers {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: Option<f64>) -> VizijEmbers {
        init_runtime();
        let seed = seed.map(|s| s as u64).unwrap_or_else(host_seed);
        VizijEmbers {
            core: EmberField::new(width, height, FieldRng::seed_from_u64(seed)),
        }
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.core.resize(width, height);
    }

    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) {
        self.core.update(dt);
    }

    #[wasm_bindgen]
    pub fn data(&self) -> Float32Array {
        Float32Array::from(self.core.to_flat().as_slice())
    }

    #[wasm_bindgen]
    pub fn len(&self) -> u32 {
        self.core.len() as u32
    }

    #[wasm_bindgen(js_name = is_empty)]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
