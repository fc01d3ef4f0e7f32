//! Shape sampler: turns a `ShapeOutline` into a `PointCloud` that reads as a
//! filled silhouette.
//!
//! Layout of the produced buffer:
//! - `0..edge_quota`: boundary points, evenly strided over a dense arc-length
//!   sampling of the outline, with xy jitter and a little depth.
//! - `edge_quota..count`: interior points from rejection sampling inside the
//!   bounding box, tested with the even-odd predicate.
//!
//! Rejection sampling is capped. When an outline encloses (almost) nothing,
//! the remaining quota is filled from the boundary instead of spinning.

use rand::Rng;

use crate::config::Config;
use crate::error::ParticleError;
use crate::keyframes::PointCloud;
use crate::outline::ShapeOutline;

/// Per-call sampling parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerParams {
    pub count: usize,
    pub scale: f32,
    pub y_offset: f32,
    pub boundary_fraction: f32,
    pub boundary_samples: usize,
    pub boundary_jitter: f32,
    pub interior_jitter: f32,
    pub depth_jitter: f32,
    pub max_attempts_per_point: usize,
}

impl SamplerParams {
    pub fn from_config(cfg: &Config, count: usize, scale: f32, y_offset: f32) -> Self {
        Self {
            count,
            scale,
            y_offset,
            boundary_fraction: cfg.boundary_fraction,
            boundary_samples: cfg.boundary_samples,
            boundary_jitter: cfg.boundary_jitter,
            interior_jitter: cfg.interior_jitter,
            depth_jitter: cfg.depth_jitter,
            max_attempts_per_point: cfg.max_attempts_per_point,
        }
    }

    /// Number of leading points placed on the boundary.
    pub fn edge_quota(&self) -> usize {
        ((self.count as f32 * self.boundary_fraction).floor() as usize).min(self.count)
    }
}

/// Centered uniform noise with total width `width` (so `|x| <= width / 2`).
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * width
}

/// Fill `outline` with `params.count` points.
pub fn fill_outline<R: Rng + ?Sized>(
    outline: &ShapeOutline,
    params: &SamplerParams,
    rng: &mut R,
) -> Result<PointCloud, ParticleError> {
    if outline.is_empty() {
        return Err(ParticleError::EmptyOutline);
    }
    let shape = outline.transformed(params.scale, params.y_offset);
    let count = params.count;
    let edge_quota = params.edge_quota();
    let mut positions = Vec::with_capacity(count * 3);

    let dense = shape.spaced_points(params.boundary_samples.max(1));
    let pick_edge = |i: usize| dense[i * dense.len() / edge_quota.max(1) % dense.len()];

    for i in 0..edge_quota {
        let p = pick_edge(i);
        positions.push(p[0] + jitter(rng, params.boundary_jitter));
        positions.push(p[1] + jitter(rng, params.boundary_jitter));
        positions.push(jitter(rng, params.depth_jitter));
    }

    let interior = count - edge_quota;
    // Bounds exist because the outline has a usable contour.
    let bounds = shape.bounds().ok_or(ParticleError::EmptyOutline)?;
    let mut attempts_left = if bounds.area() > 0.0 {
        interior.saturating_mul(params.max_attempts_per_point)
    } else {
        0
    };

    let mut placed = 0;
    while placed < interior && attempts_left > 0 {
        attempts_left -= 1;
        let x = bounds.min[0] + bounds.width() * rng.gen::<f32>();
        let y = bounds.min[1] + bounds.height() * rng.gen::<f32>();
        if shape.contains([x, y]) {
            positions.push(x + jitter(rng, params.interior_jitter));
            positions.push(y + jitter(rng, params.interior_jitter));
            positions.push(jitter(rng, params.depth_jitter));
            placed += 1;
        }
    }

    if placed < interior {
        log::warn!(
            "interior sampling exhausted after {placed}/{interior} points; filling the rest from the boundary"
        );
        let remaining = interior - placed;
        for k in 0..remaining {
            let p = dense[k * dense.len() / remaining % dense.len()];
            positions.push(p[0] + jitter(rng, params.interior_jitter));
            positions.push(p[1] + jitter(rng, params.interior_jitter));
            positions.push(jitter(rng, params.depth_jitter));
        }
    }

    Ok(PointCloud::from_flat(positions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(count: usize) -> SamplerParams {
        SamplerParams::from_config(&Config::default(), count, 1.0, 0.0)
    }

    #[test]
    fn edge_quota_is_a_quarter() {
        assert_eq!(params(1000).edge_quota(), 250);
        assert_eq!(params(3).edge_quota(), 0);
        assert_eq!(params(4).edge_quota(), 1);
    }

    #[test]
    fn empty_outline_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = fill_outline(&ShapeOutline::default(), &params(10), &mut rng).unwrap_err();
        assert_eq!(err, ParticleError::EmptyOutline);
    }

    #[test]
    fn zero_area_outline_terminates() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // Collinear triangle: bounding box has zero height.
        let flat = ShapeOutline::polygon(vec![[0.0, 0.0], [5.0, 0.0], [10.0, 0.0]]);
        let cloud = fill_outline(&flat, &params(200), &mut rng).expect("fallback fill");
        assert_eq!(cloud.len(), 200);
    }

    #[test]
    fn sliver_outline_terminates_with_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sliver = ShapeOutline::polygon(vec![[0.0, 0.0], [100.0, 100.0], [100.0, 100.0001]]);
        let p = SamplerParams {
            max_attempts_per_point: 2,
            ..params(400)
        };
        let cloud = fill_outline(&sliver, &p, &mut rng).expect("capped fill");
        assert_eq!(cloud.len(), 400);
    }

    #[test]
    fn scale_and_offset_apply() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let square = ShapeOutline::polygon(vec![[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]);
        let p = SamplerParams {
            scale: 10.0,
            y_offset: 2.0,
            ..params(500)
        };
        let cloud = fill_outline(&square, &p, &mut rng).expect("fill");
        // y range is (-1 + 2) * 10 ..= (1 + 2) * 10 = 10..30, plus jitter
        for [x, y, _] in cloud.points() {
            assert!((-10.5..=10.5).contains(&x));
            assert!((9.5..=30.5).contains(&y));
        }
    }
}
