//! Keyframe generators: the sphere plus the outline-based silhouettes
//! (temple, havan kund flame, lotus, diya lamp).
//!
//! Outline coordinates are in a roughly ±45 unit design space; each shape
//! carries its own scale and vertical offset for the sampler.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ParticleError;
use crate::keyframes::PointCloud;
use crate::outline::{PathBuilder, ShapeOutline};
use crate::sampler::{fill_outline, SamplerParams};

/// Golden angle in radians.
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Named silhouettes in the morph sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Sphere,
    Temple,
    HavanKund,
    Lotus,
    Diya,
}

impl ShapeKind {
    pub const MORPH_ORDER: [ShapeKind; 5] = [
        ShapeKind::Sphere,
        ShapeKind::Temple,
        ShapeKind::HavanKund,
        ShapeKind::Lotus,
        ShapeKind::Diya,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Temple => "temple",
            ShapeKind::HavanKund => "havan_kund",
            ShapeKind::Lotus => "lotus",
            ShapeKind::Diya => "diya",
        }
    }

    /// Outline plus `(scale, y_offset)`; `None` for the sphere.
    pub fn outline(self) -> Option<(ShapeOutline, f32, f32)> {
        match self {
            ShapeKind::Sphere => None,
            ShapeKind::Temple => Some((temple_outline(), 1.6, 0.0)),
            ShapeKind::HavanKund => Some((havan_kund_outline(), 1.7, 0.0)),
            ShapeKind::Lotus => Some((lotus_outline(), 1.6, 0.0)),
            ShapeKind::Diya => Some((diya_outline(), 1.5, 5.0)),
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        self,
        cfg: &Config,
        particle_count: usize,
        rng: &mut R,
    ) -> Result<PointCloud, ParticleError> {
        match self.outline() {
            None => Ok(sphere(particle_count, cfg.sphere_radius, rng)),
            Some((outline, scale, y_offset)) => {
                let params = SamplerParams::from_config(cfg, particle_count, scale, y_offset);
                fill_outline(&outline, &params, rng)
            }
        }
    }
}

/// Golden-angle spiral over a sphere; each radius shrinks by up to 6%.
pub fn sphere<R: Rng + ?Sized>(particle_count: usize, radius: f32, rng: &mut R) -> PointCloud {
    let mut positions = Vec::with_capacity(particle_count * 3);
    let denom = particle_count.saturating_sub(1).max(1) as f32;
    for i in 0..particle_count {
        let y = if particle_count == 1 {
            0.0
        } else {
            1.0 - (i as f32 / denom) * 2.0
        };
        let r = (1.0 - y * y).max(0.0).sqrt();
        let theta = GOLDEN_ANGLE * i as f32;
        let spread = radius * (0.94 + rng.gen::<f32>() * 0.06);
        positions.push(spread * r * theta.cos());
        positions.push(spread * y);
        positions.push(spread * r * theta.sin());
    }
    PointCloud::from_flat(positions)
}

fn quad(b: &mut PathBuilder, pts: [[f32; 2]; 4]) {
    b.move_to(pts[0][0], pts[0][1]);
    for p in &pts[1..] {
        b.line_to(p[0], p[1]);
    }
    b.close();
}

fn polyline(b: &mut PathBuilder, pts: &[[f32; 2]]) {
    if let Some((first, rest)) = pts.split_first() {
        b.move_to(first[0], first[1]);
        for p in rest {
            b.line_to(p[0], p[1]);
        }
        b.close();
    }
}

/// Gopuram-style temple: stepped base, tapering tiers, dome and kalasha.
pub fn temple_outline() -> ShapeOutline {
    let mut b = PathBuilder::new();

    // base tiers
    quad(&mut b, [[-45.0, -40.0], [45.0, -40.0], [45.0, -35.0], [-45.0, -35.0]]);
    quad(&mut b, [[-42.0, -35.0], [42.0, -35.0], [42.0, -30.0], [-42.0, -30.0]]);
    quad(&mut b, [[-40.0, -30.0], [40.0, -30.0], [40.0, -25.0], [-40.0, -25.0]]);

    // tower tiers, each 7 units high and 2 units narrower per side at the top
    let mut half = 38.0;
    let mut y = -25.0;
    while half > 8.0 {
        quad(
            &mut b,
            [[-half, y], [half, y], [half - 2.0, y + 7.0], [-(half - 2.0), y + 7.0]],
        );
        half -= 4.0;
        y += 7.0;
    }

    // dome
    b.move_to(-8.0, 31.0)
        .line_to(8.0, 31.0)
        .quadratic_to(10.0, 35.0, 6.0, 38.0)
        .line_to(4.0, 40.0)
        .line_to(-4.0, 40.0)
        .line_to(-6.0, 38.0)
        .quadratic_to(-10.0, 35.0, -8.0, 31.0)
        .close();

    // kalasha
    quad(&mut b, [[-3.0, 40.0], [3.0, 40.0], [2.0, 43.0], [-2.0, 43.0]]);

    b.build()
}

/// Havan kund: stepped platform, fire pit and a layered flame.
pub fn havan_kund_outline() -> ShapeOutline {
    let mut b = PathBuilder::new();

    quad(&mut b, [[-42.0, -40.0], [42.0, -40.0], [40.0, -35.0], [-40.0, -35.0]]);
    quad(&mut b, [[-38.0, -35.0], [38.0, -35.0], [36.0, -30.0], [-36.0, -30.0]]);
    quad(&mut b, [[-34.0, -30.0], [34.0, -30.0], [32.0, -25.0], [-32.0, -25.0]]);

    // fire pit
    quad(&mut b, [[-28.0, -25.0], [28.0, -25.0], [24.0, -18.0], [-24.0, -18.0]]);
    quad(&mut b, [[-22.0, -18.0], [22.0, -18.0], [20.0, -12.0], [-20.0, -12.0]]);

    // main flame
    polyline(
        &mut b,
        &[
            [-18.0, -12.0],
            [-15.0, -8.0],
            [-12.0, -5.0],
            [-10.0, 0.0],
            [-8.0, 6.0],
            [-6.0, 12.0],
            [-5.0, 18.0],
            [-3.0, 24.0],
            [-2.0, 30.0],
            [0.0, 38.0],
            [2.0, 30.0],
            [3.0, 24.0],
            [5.0, 18.0],
            [6.0, 12.0],
            [8.0, 6.0],
            [10.0, 0.0],
            [12.0, -5.0],
            [15.0, -8.0],
            [18.0, -12.0],
        ],
    );

    // side licks, mirrored
    let lick = [
        [8.0, 8.0],
        [10.0, 14.0],
        [12.0, 20.0],
        [13.0, 26.0],
        [12.0, 30.0],
        [9.0, 28.0],
        [7.0, 22.0],
        [6.0, 16.0],
        [5.0, 10.0],
    ];
    let mirrored: Vec<[f32; 2]> = lick.iter().map(|p| [-p[0], p[1]]).collect();
    polyline(&mut b, &mirrored);
    polyline(&mut b, &lick);

    // inner core
    polyline(
        &mut b,
        &[
            [-6.0, -8.0],
            [-4.0, 0.0],
            [-3.0, 8.0],
            [-2.0, 16.0],
            [-1.0, 24.0],
            [0.0, 32.0],
            [1.0, 24.0],
            [2.0, 16.0],
            [3.0, 8.0],
            [4.0, 0.0],
            [6.0, -8.0],
        ],
    );

    b.build()
}

/// Quadratic segments as `(cx, cy, x, y)`.
type QuadSegs<'a> = &'a [[f32; 4]];

fn curved(b: &mut PathBuilder, start: [f32; 2], segs: QuadSegs<'_>) {
    b.move_to(start[0], start[1]);
    for s in segs {
        b.quadratic_to(s[0], s[1], s[2], s[3]);
    }
    b.close();
}

fn mirror_x(segs: QuadSegs<'_>) -> Vec<[f32; 4]> {
    segs.iter().map(|s| [-s[0], s[1], -s[2], s[3]]).collect()
}

/// Lotus: tall centre petal flanked by three mirrored petal pairs and a bottom petal.
pub fn lotus_outline() -> ShapeOutline {
    let mut b = PathBuilder::new();

    curved(
        &mut b,
        [0.0, 35.0],
        &[
            [6.0, 30.0, 8.0, 20.0],
            [10.0, 8.0, 8.0, -4.0],
            [6.0, -12.0, 0.0, -18.0],
            [-6.0, -12.0, -8.0, -4.0],
            [-10.0, 8.0, -8.0, 20.0],
            [-6.0, 30.0, 0.0, 35.0],
        ],
    );

    // right-hand petals; left-hand ones are mirrored
    let petals: [([f32; 2], [[f32; 4]; 5]); 3] = [
        (
            [8.0, 20.0],
            [
                [16.0, 24.0, 22.0, 28.0],
                [28.0, 30.0, 32.0, 26.0],
                [34.0, 20.0, 30.0, 14.0],
                [24.0, 10.0, 16.0, 12.0],
                [10.0, 14.0, 8.0, 20.0],
            ],
        ),
        (
            [8.0, 0.0],
            [
                [18.0, 2.0, 26.0, 6.0],
                [34.0, 10.0, 38.0, 6.0],
                [40.0, 0.0, 36.0, -6.0],
                [28.0, -10.0, 18.0, -8.0],
                [10.0, -6.0, 8.0, 0.0],
            ],
        ),
        (
            [8.0, -10.0],
            [
                [16.0, -12.0, 24.0, -14.0],
                [32.0, -16.0, 34.0, -22.0],
                [32.0, -28.0, 26.0, -30.0],
                [18.0, -28.0, 12.0, -22.0],
                [8.0, -16.0, 8.0, -10.0],
            ],
        ),
    ];
    for (start, segs) in &petals {
        curved(&mut b, [-start[0], start[1]], &mirror_x(segs));
        curved(&mut b, *start, segs);
    }

    curved(
        &mut b,
        [0.0, -18.0],
        &[
            [4.0, -24.0, 8.0, -32.0],
            [6.0, -38.0, 0.0, -40.0],
            [-6.0, -38.0, -8.0, -32.0],
            [-4.0, -24.0, 0.0, -18.0],
        ],
    );

    b.build()
}

/// Diya: teardrop flame over a wide bowl with spouts.
pub fn diya_outline() -> ShapeOutline {
    let mut b = PathBuilder::new();

    // flame
    curved(
        &mut b,
        [0.0, 32.0],
        &[
            [6.0, 28.0, 8.0, 20.0],
            [9.0, 12.0, 8.0, 6.0],
            [6.0, 0.0, 4.0, -4.0],
            [2.0, -6.0, 0.0, -7.0],
            [-2.0, -6.0, -4.0, -4.0],
            [-6.0, 0.0, -8.0, 6.0],
            [-9.0, 12.0, -8.0, 20.0],
            [-6.0, 28.0, 0.0, 32.0],
        ],
    );
    // inner glow
    curved(
        &mut b,
        [0.0, 26.0],
        &[
            [4.0, 23.0, 5.0, 16.0],
            [5.0, 10.0, 4.0, 4.0],
            [2.0, 0.0, 0.0, -2.0],
            [-2.0, 0.0, -4.0, 4.0],
            [-5.0, 10.0, -5.0, 16.0],
            [-4.0, 23.0, 0.0, 26.0],
        ],
    );

    // wick holder
    quad(&mut b, [[-6.0, -7.0], [6.0, -7.0], [7.0, -10.0], [-7.0, -10.0]]);

    // bowl halves
    let bowl = [
        [35.0, -12.0, 38.0, -16.0],
        [40.0, -20.0, 38.0, -24.0],
        [35.0, -28.0, 28.0, -30.0],
    ];
    for sign in [-1.0f32, 1.0] {
        let segs: Vec<[f32; 4]> = if sign < 0.0 {
            mirror_x(&bowl)
        } else {
            bowl.to_vec()
        };
        b.move_to(30.0 * sign, -10.0);
        for s in &segs {
            b.quadratic_to(s[0], s[1], s[2], s[3]);
        }
        b.line_to(8.0 * sign, -32.0).line_to(8.0 * sign, -10.0).close();
    }

    // centre bowl
    quad(&mut b, [[-8.0, -10.0], [8.0, -10.0], [8.0, -32.0], [-8.0, -32.0]]);

    // decorative base rim
    b.move_to(-28.0, -30.0)
        .quadratic_to(-20.0, -34.0, -10.0, -36.0)
        .line_to(10.0, -36.0)
        .quadratic_to(20.0, -34.0, 28.0, -30.0)
        .line_to(28.0, -32.0)
        .quadratic_to(18.0, -36.0, 0.0, -38.0)
        .quadratic_to(-18.0, -36.0, -28.0, -32.0)
        .close();

    // spouts
    let spout = [
        [36.0, -16.0, 42.0, -12.0],
        [45.0, -8.0, 43.0, -4.0],
        [40.0, -6.0, 35.0, -8.0],
        [32.0, -12.0, 30.0, -18.0],
    ];
    curved(&mut b, [-30.0, -18.0], &mirror_x(&spout));
    curved(&mut b, [30.0, -18.0], &spout);

    b.build()
}
