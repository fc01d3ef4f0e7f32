//! Point clouds and the keyframe sequence the field morphs through.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ParticleError;
use crate::shapes::ShapeKind;

/// A fixed-length run of xyz triples describing one silhouette.
///
/// Immutable once generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    positions: Vec<f32>,
}

impl PointCloud {
    /// Wrap a flat xyz buffer. Trailing components that do not form a full
    /// triple are dropped.
    pub fn from_flat(mut positions: Vec<f32>) -> Self {
        let whole = positions.len() / 3 * 3;
        positions.truncate(whole);
        Self { positions }
    }

    pub fn from_points(points: &[[f32; 3]]) -> Self {
        Self {
            positions: points.iter().flat_map(|p| p.iter().copied()).collect(),
        }
    }

    /// Number of particles (not scalar components).
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.positions
    }

    pub fn point(&self, i: usize) -> Option<[f32; 3]> {
        let i3 = i * 3;
        self.positions
            .get(i3..i3 + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    pub fn points(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

/// Ordered keyframes; order defines the morph sequence over progress 0..1.
///
/// Construction guarantees at least two keyframes, all of the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeSequence {
    frames: Vec<PointCloud>,
    particle_count: usize,
}

impl KeyframeSequence {
    pub fn new(frames: Vec<PointCloud>) -> Result<Self, ParticleError> {
        if frames.len() < 2 {
            return Err(ParticleError::TooFewKeyframes {
                count: frames.len(),
            });
        }
        let expected = frames[0].len();
        for (index, frame) in frames.iter().enumerate().skip(1) {
            if frame.len() != expected {
                return Err(ParticleError::KeyframeLengthMismatch {
                    index,
                    expected,
                    found: frame.len(),
                });
            }
        }
        Ok(Self {
            frames,
            particle_count: expected,
        })
    }

    /// Generate one keyframe per shape in `order`, each with `particle_count` points.
    pub fn generate<R: Rng + ?Sized>(
        cfg: &Config,
        order: &[ShapeKind],
        particle_count: usize,
        rng: &mut R,
    ) -> Result<Self, ParticleError> {
        let frames = order
            .iter()
            .map(|kind| kind.generate(cfg, particle_count, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(frames)
    }

    /// The default sphere → temple → flame → lotus → lamp sequence.
    pub fn morph_sequence<R: Rng + ?Sized>(
        cfg: &Config,
        particle_count: usize,
        rng: &mut R,
    ) -> Result<Self, ParticleError> {
        Self::generate(cfg, &ShapeKind::MORPH_ORDER, particle_count, rng)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn get(&self, index: usize) -> Option<&PointCloud> {
        self.frames.get(index)
    }

    pub fn first(&self) -> &PointCloud {
        &self.frames[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointCloud> {
        self.frames.iter()
    }

    /// Adjacent pair `(index, index + 1)`; `index` is clamped to the last pair.
    pub fn pair(&self, index: usize) -> (&PointCloud, &PointCloud) {
        let i = index.min(self.frames.len() - 2);
        (&self.frames[i], &self.frames[i + 1])
    }
}
