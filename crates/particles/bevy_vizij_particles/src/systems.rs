use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::window::PrimaryWindow;

use crate::components::{ParticleCamera, ParticleFieldRoot};
use crate::resources::{ParticleField, ParticleMesh, ScrollProgress};
use vizij_particles_core::{CameraParams, Frame, Viewport};

/// Build a point-list mesh from one frame. Vertex colour alpha carries the
/// frame's flicker opacity.
pub fn build_point_mesh(frame: &Frame<'_>) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    write_frame(&mut mesh, frame);
    mesh
}

fn write_frame(mesh: &mut Mesh, frame: &Frame<'_>) {
    let positions: Vec<[f32; 3]> = frame
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let alpha = frame.meta.opacity;
    let colors: Vec<[f32; 4]> = frame
        .colors
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2], alpha])
        .collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
}

/// Camera placed on +Z at `camera.distance`, looking at the origin.
pub fn camera_transform(camera: &CameraParams) -> Transform {
    Transform::from_xyz(0.0, 0.0, camera.distance).looking_at(Vec3::ZERO, Vec3::Y)
}

pub fn perspective(camera: &CameraParams) -> PerspectiveProjection {
    PerspectiveProjection {
        fov: camera.fov.to_radians(),
        aspect_ratio: camera.aspect,
        near: camera.near,
        far: camera.far,
    }
}

/// Startup: create the particle mesh asset when the render assets exist.
pub fn setup_particle_mesh(
    field: Res<ParticleField>,
    meshes: Option<ResMut<Assets<Mesh>>>,
    mut particle_mesh: ResMut<ParticleMesh>,
) {
    particle_mesh.point_size = field.0.meta().point_size;
    let Some(mut meshes) = meshes else {
        return;
    };
    let handle = meshes.add(build_point_mesh(&field.0.frame()));
    particle_mesh.handle = Some(handle);
}

/// Follow the primary window size; regenerates keyframes on device-class change.
pub fn sync_viewport_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut field: ResMut<ParticleField>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let viewport = Viewport::new(window.width().max(0.0) as u32, window.height().max(0.0) as u32);
    if viewport == field.0.state().viewport {
        return;
    }
    match field.0.sync_viewport(viewport) {
        Ok(true) => debug!("particle field regenerated for {viewport:?}"),
        Ok(false) => {}
        Err(err) => warn!("keeping previous particle keyframes: {err}"),
    }
}

pub fn tick_field_system(
    time: Res<Time>,
    scroll: Res<ScrollProgress>,
    mut field: ResMut<ParticleField>,
) {
    field.0.set_scroll_progress(scroll.0);
    field.0.step(time.delta_seconds());
}

/// Copy camera parameters onto `ParticleCamera` entities and the rotation onto
/// `ParticleFieldRoot` entities.
pub fn apply_camera_system(
    field: Res<ParticleField>,
    mut cameras: Query<
        (&mut Transform, Option<&mut Projection>, Option<&mut FogSettings>),
        With<ParticleCamera>,
    >,
    mut roots: Query<&mut Transform, (With<ParticleFieldRoot>, Without<ParticleCamera>)>,
) {
    let meta = field.0.meta();
    for (mut tf, projection, fog) in cameras.iter_mut() {
        *tf = camera_transform(&meta.camera);
        if let Some(mut projection) = projection {
            *projection = Projection::Perspective(perspective(&meta.camera));
        }
        if let Some(mut fog) = fog {
            fog.falloff = FogFalloff::Exponential {
                density: meta.camera.fog_density,
            };
        }
    }
    for mut tf in roots.iter_mut() {
        tf.rotation = Quat::from_rotation_y(meta.rotation_y);
    }
}

/// Publish the point size and push the displayed positions into the mesh asset.
pub fn upload_mesh_system(
    field: Res<ParticleField>,
    mut particle_mesh: ResMut<ParticleMesh>,
    meshes: Option<ResMut<Assets<Mesh>>>,
) {
    particle_mesh.point_size = field.0.meta().point_size;
    let (Some(handle), Some(mut meshes)) = (particle_mesh.handle.as_ref(), meshes) else {
        return;
    };
    if let Some(mesh) = meshes.get_mut(handle) {
        write_frame(mesh, &field.0.frame());
    }
}
