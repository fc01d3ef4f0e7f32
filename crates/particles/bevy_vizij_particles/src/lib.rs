use bevy::prelude::*;
use vizij_particles_core::{Config, FieldEngine, Viewport};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{ParticleCamera, ParticleFieldRoot};
pub use resources::{ParticleField, ParticleMesh, ScrollProgress};
pub use systems::{build_point_mesh, camera_transform, perspective};

/// Drives a scroll-morphing particle field inside a Bevy app.
///
/// The app writes `ScrollProgress`, tags its camera with `ParticleCamera` and
/// the entity holding `ParticleMesh` with `ParticleFieldRoot`. If the field
/// cannot be built the plugin logs and adds nothing.
pub struct VizijParticlesPlugin {
    pub config: Config,
    /// Viewport used until the primary window reports its size.
    pub viewport: Viewport,
}

impl Default for VizijParticlesPlugin {
    fn default() -> Self {
        Self {
            config: Config::default(),
            viewport: Viewport::default(),
        }
    }
}

impl Plugin for VizijParticlesPlugin {
    fn build(&self, app: &mut App) {
        let field = match FieldEngine::new(self.config.clone(), self.viewport) {
            Ok(field) => field,
            Err(err) => {
                warn!("particle field disabled: {err}");
                return;
            }
        };
        app.insert_resource(ParticleField(field))
            .insert_resource(ScrollProgress::default())
            .insert_resource(ParticleMesh::default())
            .add_systems(Startup, systems::setup_particle_mesh)
            .add_systems(
                Update,
                (
                    systems::sync_viewport_system,
                    systems::tick_field_system,
                    systems::apply_camera_system,
                    systems::upload_mesh_system,
                )
                    .chain(),
            );
    }
}
