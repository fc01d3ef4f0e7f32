#![cfg(target_arch = "wasm32")]
use js_sys::{Reflect, JSON};
use vizij_particles_wasm::{abi_version, glow_texture, VizijEmbers, VizijParticles};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn small_config() -> JsValue {
    JSON::parse(r#"{ "particle_count": 400, "seed": 5 }"#).unwrap()
}

fn get(obj: &JsValue, key: &str) -> JsValue {
    Reflect::get(obj, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    let field = VizijParticles::new(JsValue::UNDEFINED, 1280, 720);
    assert!(field.is_ok());
}

#[wasm_bindgen_test]
fn update_returns_frame_meta_and_buffers() {
    let mut field = VizijParticles::new(small_config(), 1440, 900).unwrap();
    field.set_scroll_progress(0.125);
    let meta = field.update(0.016).unwrap();
    assert_eq!(get(&meta, "particle_count").as_f64(), Some(400.0));
    assert_eq!(get(&meta, "device_class").as_string().as_deref(), Some("desktop"));
    let camera = get(&meta, "camera");
    assert_eq!(get(&camera, "fov").as_f64(), Some(60.0));

    assert_eq!(field.positions().length(), 400 * 3);
    assert_eq!(field.colors().length(), 400 * 3);
}

#[wasm_bindgen_test]
fn shrinking_below_breakpoint_regenerates() {
    let mut field = VizijParticles::new(small_config(), 1440, 900).unwrap();
    assert!(!field.set_viewport(1100, 900));
    assert!(field.set_viewport(390, 844));
    assert_eq!(field.particle_count(), 240);
    assert_eq!(field.positions().length(), 240 * 3);
}

#[wasm_bindgen_test]
fn scroll_metrics_clamp() {
    let mut field = VizijParticles::new(small_config(), 1440, 900).unwrap();
    field.set_scroll_metrics(99_999.0, 3000.0, 900.0);
    let meta = field.update(0.016).unwrap();
    let segment = get(&meta, "segment");
    assert_eq!(get(&segment, "index").as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn surface_config_caps_pixel_ratio() {
    let field = VizijParticles::new(small_config(), 390, 844).unwrap();
    let cfg = field.surface_config(3.0).unwrap();
    assert_eq!(get(&cfg, "pixel_ratio").as_f64(), Some(1.5));
    assert_eq!(get(&cfg, "antialias").as_bool(), Some(false));
}

#[wasm_bindgen_test]
fn glow_texture_is_rgba() {
    assert_eq!(glow_texture(None).length(), 96 * 96 * 4);
    assert_eq!(glow_texture(Some(8)).length(), 8 * 8 * 4);
}

#[wasm_bindgen_test]
fn embers_pack_seven_floats_each() {
    let mut embers = VizijEmbers::new(1280.0, 720.0, Some(1.0));
    assert_eq!(embers.len(), 50);
    embers.update(0.016);
    assert_eq!(embers.data().length(), 50 * 7);
}

// Negative/error-path tests

/// it should error cleanly on a config that is not an object
#[wasm_bindgen_test]
fn malformed_config_errors() {
    let res = VizijParticles::new(JsValue::from_str("many particles"), 800, 600);
    assert!(res.is_err());
}

/// it should reject a budget too large to allocate
#[wasm_bindgen_test]
fn oversized_budget_errors() {
    let cfg = JSON::parse(r#"{ "particle_count": 2000000 }"#).unwrap();
    assert!(VizijParticles::new(cfg, 800, 600).is_err());
}

/// it should reject a zero particle budget
#[wasm_bindgen_test]
fn zero_budget_errors() {
    let cfg = JSON::parse(r#"{ "particle_count": 0 }"#).unwrap();
    assert!(VizijParticles::new(cfg, 800, 600).is_err());
}
