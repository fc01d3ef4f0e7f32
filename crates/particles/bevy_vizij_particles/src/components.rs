use bevy::prelude::*;

/// Marker for the camera framing the particle field. Its transform,
/// projection and fog follow the field's camera parameters every frame.
#[derive(Component, Debug, Default)]
pub struct ParticleCamera;

/// Marker for the entity carrying the particle mesh. Receives the field's
/// accumulated rotation around Y.
#[derive(Component, Debug, Default)]
pub struct ParticleFieldRoot;
