use bevy::prelude::*;
use vizij_particles_core::FieldEngine;

/// The particle field driven by the plugin's systems.
#[derive(Resource, Debug)]
pub struct ParticleField(pub FieldEngine);

/// Scroll progress in [0, 1], written by the app (scroll input, UI, timeline).
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollProgress(pub f32);

/// Point-list mesh holding the displayed positions and colours.
///
/// `handle` is `None` until the startup system runs with an `Assets<Mesh>`
/// available (never, under `MinimalPlugins`).
///
/// Bevy's built-in materials draw `PointList` vertices at a fixed size, so the
/// frame's point size is published here for a custom point material to read.
#[derive(Resource, Debug, Default)]
pub struct ParticleMesh {
    pub handle: Option<Handle<Mesh>>,
    /// World-space point size for the current frame, including the zoom boost.
    pub point_size: f32,
}
