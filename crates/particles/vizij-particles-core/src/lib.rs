//! Vizij Particles Core (engine-agnostic)
//!
//! Scroll-driven particle field: silhouettes are sampled into equal-length
//! point clouds, and the field morphs through them as the page scrolls. This
//! crate holds the generators, the per-frame math and the mount lifecycle;
//! rendering is left to adapters (wasm, Bevy) behind `RenderSurface`.

pub mod animator;
pub mod config;
pub mod driver;
pub mod embers;
pub mod error;
pub mod field;
pub mod frame;
pub mod keyframes;
pub mod outline;
pub mod palette;
pub mod sampler;
pub mod shapes;
pub mod state;

// Re-exports for consumers (adapters)
pub use animator::{Animator, MountStatus, RenderSurface, SurfaceConfig, SurfaceFactory};
pub use config::{Config, DeviceClass, DeviceProfile, PowerPreference};
pub use driver::{ManualTickDriver, ResizeNotifier, ScrollProvider, TickCallback, TickDriver};
pub use embers::{Ember, EmberField};
pub use error::{ParticleError, SurfaceError};
pub use field::{FieldEngine, FieldRng, DEFAULT_SEED};
pub use frame::{CameraParams, Frame, FrameMeta, Segment};
pub use keyframes::{KeyframeSequence, PointCloud};
pub use outline::{PathBuilder, ShapeOutline};
pub use sampler::{fill_outline, SamplerParams};
pub use shapes::ShapeKind;
pub use state::{scroll_progress, AnimationState, InputSink, InputSnapshot, Viewport};
