//! Rising 2D embers drawn over the page on a plain canvas.
//!
//! Motion constants are per 60 Hz frame; `update` scales them by `dt * 60`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DeviceClass, MOBILE_BREAKPOINT};
use crate::field::FieldRng;

pub const EMBER_GOLD: u32 = 0xD4AF37;
pub const EMBER_SAFFRON: u32 = 0xFF9933;

/// Canvas layer opacity applied on top of each ember's own alpha.
pub const EMBER_LAYER_OPACITY: f32 = 0.6;
/// Shadow blur radius used for the glow, in pixels.
pub const EMBER_GLOW_BLUR: f32 = 10.0;

const MOBILE_MAX: usize = 20;
const DESKTOP_MAX: usize = 50;
const MOBILE_AREA_PER_EMBER: f32 = 30_000.0;
const DESKTOP_AREA_PER_EMBER: f32 = 15_000.0;

/// Number of embers for a canvas of `width` x `height` pixels.
pub fn ember_count(width: f32, height: f32, class: DeviceClass) -> usize {
    let area = (width.max(0.0) * height.max(0.0)).max(0.0);
    let (cap, per) = match class {
        DeviceClass::Mobile => (MOBILE_MAX, MOBILE_AREA_PER_EMBER),
        DeviceClass::Desktop => (DESKTOP_MAX, DESKTOP_AREA_PER_EMBER),
    };
    ((area / per).floor() as usize).min(cap)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ember {
    pub x: f32,
    pub y: f32,
    /// Radius in pixels, 1..4.
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub opacity: f32,
    /// `0xRRGGBB`.
    pub color: u32,
    pub life: f32,
    pub decay: f32,
}

impl Ember {
    fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        Self {
            x: rng.gen::<f32>() * width,
            y: height + rng.gen::<f32>() * 100.0,
            size: rng.gen::<f32>() * 3.0 + 1.0,
            speed_y: rng.gen::<f32>() * 0.5 + 0.2,
            speed_x: (rng.gen::<f32>() - 0.5) * 0.5,
            opacity: rng.gen::<f32>() * 0.5 + 0.2,
            color: if rng.gen::<f32>() > 0.5 {
                EMBER_GOLD
            } else {
                EMBER_SAFFRON
            },
            life: 1.0,
            decay: rng.gen::<f32>() * 0.002 + 0.001,
        }
    }

    fn expired(&self) -> bool {
        self.life <= 0.0 || self.y < -10.0
    }
}

/// Fixed-size pool of embers for one canvas.
#[derive(Clone, Debug)]
pub struct EmberField {
    embers: Vec<Ember>,
    width: f32,
    height: f32,
    rng: FieldRng,
}

impl EmberField {
    /// Size the pool from the canvas area; the device class follows the
    /// 768 px breakpoint.
    pub fn new(width: f32, height: f32, mut rng: FieldRng) -> Self {
        let class = if width < MOBILE_BREAKPOINT as f32 {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        };
        let count = ember_count(width, height, class);
        let embers = (0..count)
            .map(|_| Ember::spawn(&mut rng, width, height))
            .collect();
        Self {
            embers,
            width,
            height,
            rng,
        }
    }

    pub fn embers(&self) -> &[Ember] {
        &self.embers
    }

    pub fn len(&self) -> usize {
        self.embers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embers.is_empty()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Canvas resized. The pool keeps its size; positions scale with the canvas.
    pub fn resize(&mut self, width: f32, height: f32) {
        let sx = if self.width > 0.0 { width / self.width } else { 1.0 };
        let sy = if self.height > 0.0 { height / self.height } else { 1.0 };
        for e in &mut self.embers {
            e.x *= sx;
            e.y *= sy;
        }
        self.width = width;
        self.height = height;
    }

    pub fn update(&mut self, dt: f32) {
        let k = if dt.is_finite() { dt.max(0.0) * 60.0 } else { 0.0 };
        let (width, height) = (self.width, self.height);
        for e in &mut self.embers {
            e.y -= e.speed_y * k;
            e.x += e.speed_x * k;
            e.life -= e.decay * k;
            e.opacity = e.life.max(0.0);
            // horizontal flicker
            e.speed_x += (self.rng.gen::<f32>() - 0.5) * 0.1 * k;
            if e.expired() {
                *e = Ember::spawn(&mut self.rng, width, height);
            }
        }
    }

    /// Flat `[x, y, size, opacity, r, g, b]` per ember for canvas hosts.
    pub fn to_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.embers.len() * 7);
        for e in &self.embers {
            let [r, g, b] = crate::palette::hex_to_rgb(e.color);
            out.extend_from_slice(&[e.x, e.y, e.size, e.opacity, r, g, b]);
        }
        out
    }
}
