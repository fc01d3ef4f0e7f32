use approx::assert_relative_eq;
use rand::SeedableRng;
use vizij_particles_core::frame::{
    interpolate_into, oscillation, segment_for_progress, zoom_phase,
};
use vizij_particles_core::{
    Config, DeviceClass, FieldEngine, FieldRng, KeyframeSequence, PointCloud, ShapeKind, Viewport,
};
use vizij_test_fixtures::configs;

fn small_config() -> Config {
    configs::load("small-seeded").expect("small-seeded config")
}

fn desktop() -> Viewport {
    Viewport::new(1440, 900)
}

fn mobile() -> Viewport {
    Viewport::new(390, 844)
}

/// Undo the shimmer so positions can be compared with keyframes.
fn without_oscillation(positions: &[f32], elapsed: f64, motion: f32) -> Vec<f32> {
    positions
        .chunks_exact(3)
        .enumerate()
        .flat_map(|(i, p)| {
            let o = oscillation(i, elapsed, motion);
            [p[0] - o[0], p[1] - o[1], p[2] - o[2]]
        })
        .collect()
}

#[test]
fn midpoint_of_three_keyframes_lands_on_the_middle_one() {
    let k0 = PointCloud::from_points(&[[0.1, 0.2, 0.3], [1.0, 1.0, 1.0]]);
    let k1 = PointCloud::from_points(&[[5.3, -2.7, 0.9], [3.3, 0.7, -0.1]]);
    let k2 = PointCloud::from_points(&[[9.0, 9.0, 9.0], [-4.0, 2.0, 0.5]]);
    let seq = KeyframeSequence::new(vec![k0, k1.clone(), k2.clone()]).expect("valid");

    let seg = segment_for_progress(0.5, seq.len());
    assert_eq!(seg.index, 1);
    assert_eq!(seg.t, 0.0);
    let (from, to) = seq.pair(seg.index);
    let mut out = vec![0.0; 6];
    interpolate_into(&mut out, from.as_slice(), to.as_slice(), seg.t);
    assert_eq!(out.as_slice(), k1.as_slice());

    let seg = segment_for_progress(1.0, seq.len());
    let (from, to) = seq.pair(seg.index);
    interpolate_into(&mut out, from.as_slice(), to.as_slice(), seg.t);
    assert_eq!(out.as_slice(), k2.as_slice());
}

#[test]
fn morph_sequence_has_five_equal_keyframes() {
    let cfg = small_config();
    let mut rng = FieldRng::seed_from_u64(1);
    let seq = KeyframeSequence::morph_sequence(&cfg, 600, &mut rng).expect("sequence");
    assert_eq!(seq.len(), ShapeKind::MORPH_ORDER.len());
    for frame in seq.iter() {
        assert_eq!(frame.len(), 600);
        assert!(frame.as_slice().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn same_seed_gives_same_keyframes() {
    let a = FieldEngine::new(small_config(), desktop()).expect("a");
    let b = FieldEngine::new(small_config(), desktop()).expect("b");
    assert_eq!(a.keyframes(), b.keyframes());
}

#[test]
fn desktop_field_tracks_scroll_and_hits_keyframes() {
    let mut field = FieldEngine::new(small_config(), desktop()).expect("field");
    assert_eq!(field.device_class(), DeviceClass::Desktop);
    let motion = field.profile().motion_scale;

    // 0.25 over five keyframes is exactly the temple
    field.set_scroll_progress(0.25);
    let meta = *field.step(0.5);
    assert_eq!(meta.segment.index, 1);
    assert_relative_eq!(meta.segment.t, 0.0, epsilon = 1e-5);
    let temple = field.keyframes().get(1).expect("temple").as_slice().to_vec();
    let settled = without_oscillation(field.positions(), meta.elapsed, motion);
    for (got, want) in settled.iter().zip(&temple) {
        assert_relative_eq!(*got, *want, epsilon = 1e-3);
    }

    field.set_scroll_progress(1.0);
    let meta = *field.step(0.5);
    assert_eq!(meta.segment.index, 3);
    let diya = field.keyframes().get(4).expect("diya").as_slice().to_vec();
    let settled = without_oscillation(field.positions(), meta.elapsed, motion);
    for (got, want) in settled.iter().zip(&diya) {
        assert_relative_eq!(*got, *want, epsilon = 1e-3);
    }
}

#[test]
fn zoom_and_point_size_peak_mid_transition() {
    let mut field = FieldEngine::new(small_config(), desktop()).expect("field");
    let base_distance = field.profile().camera_distance;
    let base_size = field.profile().point_size;

    field.set_scroll_progress(0.125);
    let mid = *field.step(1.0 / 60.0);
    assert_relative_eq!(mid.zoom_phase, zoom_phase(0.5));
    assert_relative_eq!(mid.camera.distance, base_distance + 18.0, epsilon = 1e-3);
    assert_relative_eq!(mid.point_size, base_size + 0.5, epsilon = 1e-4);

    field.set_scroll_progress(0.0);
    let rest = *field.step(1.0 / 60.0);
    assert_relative_eq!(rest.camera.distance, base_distance);
    assert_relative_eq!(rest.point_size, base_size);
    assert_eq!(rest.camera.fov, 60.0);
}

#[test]
fn mobile_field_is_smaller_and_eases_scroll() {
    let mut field = FieldEngine::new(small_config(), mobile()).expect("field");
    assert_eq!(field.device_class(), DeviceClass::Mobile);
    assert_eq!(field.particle_count(), 360);
    assert_eq!(field.meta().camera.fov, 70.0);

    field.set_scroll_progress(1.0);
    field.step(1.0 / 60.0);
    let eased = field.state().progress;
    assert!(eased > 0.0 && eased < 0.1, "progress jumped to {eased}");

    for _ in 0..600 {
        field.step(1.0 / 60.0);
    }
    assert_relative_eq!(field.state().progress, 1.0, epsilon = 1e-3);
}

#[test]
fn crossing_the_breakpoint_regenerates_every_keyframe() {
    let mut field = FieldEngine::new(small_config(), desktop()).expect("field");
    assert_eq!(field.particle_count(), 600);

    assert!(!field.sync_viewport(Viewport::new(1024, 700)).expect("same class"));
    assert_eq!(field.particle_count(), 600);

    assert!(field.sync_viewport(mobile()).expect("to mobile"));
    assert_eq!(field.particle_count(), 360);
    assert!(field.keyframes().iter().all(|k| k.len() == 360));
    field.step(1.0 / 60.0);
    assert_eq!(field.frame().positions.len(), 360 * 3);
    assert_eq!(field.frame().colors.len(), 360 * 3);

    assert!(field.sync_viewport(desktop()).expect("back to desktop"));
    assert!(field.keyframes().iter().all(|k| k.len() == 600));
}

#[test]
fn tuned_breakpoints_come_from_config() {
    let cfg: Config = configs::load("mobile-tuned").expect("mobile-tuned config");
    let field = FieldEngine::new(cfg.clone(), Viewport::new(700, 900)).expect("field");
    assert_eq!(field.device_class(), DeviceClass::Desktop);
    assert_eq!(field.meta().camera.fov, 68.0);

    let field = FieldEngine::new(cfg, Viewport::new(500, 900)).expect("field");
    assert_eq!(field.device_class(), DeviceClass::Mobile);
    assert_eq!(field.particle_count(), 500);
}

#[test]
fn zero_sized_viewport_keeps_a_finite_camera() {
    let mut field = FieldEngine::new(small_config(), Viewport::new(0, 0)).expect("field");
    let meta = *field.step(1.0 / 60.0);
    assert!(meta.camera.aspect.is_finite() && meta.camera.aspect > 0.0);
}

#[test]
fn long_sessions_keep_rotating_and_shimmering() {
    let mut field = FieldEngine::new(small_config(), desktop()).expect("field");
    // about five days of wall time in one step
    let before = *field.step(455_200.0);
    assert!((0.0..std::f32::consts::TAU).contains(&before.rotation_y));

    let mut after = before;
    for _ in 0..600 {
        after = *field.step(1.0 / 60.0);
    }
    let turned = (after.rotation_y - before.rotation_y).rem_euclid(std::f32::consts::TAU);
    assert!((turned - 0.36).abs() < 1e-3, "turned {turned}");
    assert!((after.elapsed - before.elapsed - 10.0).abs() < 1e-6);
    assert_ne!(after.opacity, before.opacity);
}
