use bevy::prelude::*;
use bevy_vizij_particles::{
    ParticleCamera, ParticleField, ParticleFieldRoot, ParticleMesh, ScrollProgress,
    VizijParticlesPlugin,
};
use vizij_particles_core::{Config, DeviceClass, Viewport};

fn small_plugin() -> VizijParticlesPlugin {
    let config: Config =
        vizij_test_fixtures::configs::load("small-seeded").expect("small-seeded config");
    VizijParticlesPlugin {
        config,
        viewport: Viewport::new(1440, 900),
    }
}

#[test]
fn plugin_inserts_field_resources() {
    let mut app = App::new();
    // it should insert the field, scroll and mesh resources when the plugin is added
    app.add_plugins(MinimalPlugins).add_plugins(small_plugin());

    let field = app.world().get_resource::<ParticleField>().expect("field");
    assert_eq!(field.0.particle_count(), 600);
    assert_eq!(field.0.device_class(), DeviceClass::Desktop);
    assert!(app.world().get_resource::<ScrollProgress>().is_some());
    assert!(app.world().get_resource::<ParticleMesh>().is_some());
}

/// it should skip everything when the config is invalid instead of panicking
#[test]
fn invalid_config_adds_nothing() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(VizijParticlesPlugin {
        config: Config {
            particle_count: 0,
            ..Config::default()
        },
        viewport: Viewport::default(),
    });
    app.update();
    assert!(app.world().get_resource::<ParticleField>().is_none());
}

/// it should advance the field, follow scroll and drive tagged entities
#[test]
fn update_drives_camera_and_root() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(small_plugin());

    let camera = app
        .world_mut()
        .spawn((
            ParticleCamera,
            Transform::default(),
            Projection::Perspective(PerspectiveProjection::default()),
        ))
        .id();
    let root = app
        .world_mut()
        .spawn((ParticleFieldRoot, Transform::default()))
        .id();

    app.world_mut().resource_mut::<ScrollProgress>().0 = 0.125;
    for _ in 0..5 {
        app.update();
    }

    let field = app.world().resource::<ParticleField>();
    let meta = *field.0.meta();
    assert_eq!(meta.segment.index, 0);
    assert!((meta.segment.t - 0.5).abs() < 1e-4);

    let tf = app.world().get::<Transform>(camera).expect("camera transform");
    assert!((tf.translation.z - meta.camera.distance).abs() < 1e-3);
    match app.world().get::<Projection>(camera).expect("projection") {
        Projection::Perspective(p) => {
            assert!((p.fov - meta.camera.fov.to_radians()).abs() < 1e-5);
            assert!((p.aspect_ratio - 1440.0 / 900.0).abs() < 1e-4);
        }
        other => panic!("unexpected projection {other:?}"),
    }

    let root_tf = app.world().get::<Transform>(root).expect("root transform");
    let expected = Quat::from_rotation_y(meta.rotation_y);
    assert!(root_tf.rotation.angle_between(expected) < 1e-4);
}

/// it should lay out one vertex and one colour per particle
#[test]
fn point_mesh_matches_frame() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(small_plugin());
    app.update();

    let field = app.world().resource::<ParticleField>();
    let mesh = bevy_vizij_particles::build_point_mesh(&field.0.frame());
    let positions = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .expect("positions");
    assert_eq!(positions.len(), 600);
    let colors = mesh.attribute(Mesh::ATTRIBUTE_COLOR).expect("colors");
    assert_eq!(colors.len(), 600);
}

/// it should publish the frame's point size, boosted mid-transition
#[test]
fn point_size_follows_zoom() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(small_plugin());
    app.update();
    let resting = app.world().resource::<ParticleMesh>().point_size;
    let base = app.world().resource::<ParticleField>().0.profile().point_size;
    assert!((resting - base).abs() < 1e-6);

    app.world_mut().resource_mut::<ScrollProgress>().0 = 0.125;
    app.update();
    let meta = *app.world().resource::<ParticleField>().0.meta();
    let published = app.world().resource::<ParticleMesh>().point_size;
    assert_eq!(published, meta.point_size);
    assert!(published > base);
}
