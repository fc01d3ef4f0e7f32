//! Ember palette and the glow sprite used for additive point rendering.

/// Deep saffron/ember tones, cycled per particle.
pub const PALETTE: [u32; 4] = [0xC2641F, 0xA54B1A, 0x8C3A13, 0xE07A3F];

/// Default glow sprite edge length in pixels.
pub const GLOW_TEXTURE_SIZE: u32 = 96;

/// (offset, rgba) stops of the radial glow gradient; alpha in 0..1.
const GLOW_STOPS: [(f32, [f32; 4]); 3] = [
    (0.0, [255.0, 210.0, 160.0, 0.96]),
    (0.4, [229.0, 141.0, 65.0, 0.7]),
    (1.0, [0.0, 0.0, 0.0, 0.0]),
];

/// Convert `0xRRGGBB` into linear 0..1 components.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Per-particle RGB buffer (`count * 3`), cycling through `PALETTE`.
pub fn particle_colors(count: usize) -> Vec<f32> {
    let rgb: Vec<[f32; 3]> = PALETTE.iter().map(|&h| hex_to_rgb(h)).collect();
    (0..count).flat_map(|i| rgb[i % rgb.len()]).collect()
}

fn gradient_at(offset: f32) -> [f32; 4] {
    let offset = offset.clamp(0.0, 1.0);
    for pair in GLOW_STOPS.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if offset <= o1 {
            let t = if o1 > o0 { (offset - o0) / (o1 - o0) } else { 0.0 };
            return [
                c0[0] + (c1[0] - c0[0]) * t,
                c0[1] + (c1[1] - c0[1]) * t,
                c0[2] + (c1[2] - c0[2]) * t,
                c0[3] + (c1[3] - c0[3]) * t,
            ];
        }
    }
    GLOW_STOPS[GLOW_STOPS.len() - 1].1
}

/// Square RGBA8 radial glow, centre bright and edges transparent.
pub fn glow_texture(size: u32) -> Vec<u8> {
    let size = size.max(1);
    let half = size as f32 / 2.0;
    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let c = gradient_at((dx * dx + dy * dy).sqrt() / half);
            out.push(c[0].round() as u8);
            out.push(c[1].round() as u8);
            out.push(c[2].round() as u8);
            out.push((c[3] * 255.0).round() as u8);
        }
    }
    out
}
