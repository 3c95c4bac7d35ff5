use beachfire_common::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Filter, Texture, Wrap};

/// Settings for the procedural sand texture.
#[derive(Debug, Clone, PartialEq)]
pub struct SandParams {
    /// Width and height in pixels.
    pub size: u32,
    pub base: Rgb,
    /// Number of light grains scattered over the base colour.
    pub grains: u32,
    pub max_radius: f32,
    pub max_alpha: f32,
}

impl Default for SandParams {
    fn default() -> Self {
        Self {
            size: 256,
            base: Rgb::from_hex(0xd2b48c),
            grains: 50_000,
            max_radius: 1.5,
            max_alpha: 0.1,
        }
    }
}

/// Paint a tileable-looking sand texture: a flat tan base with many tiny,
/// faint white discs blended over it.
pub fn generate_sand(params: &SandParams, seed: u64) -> Texture {
    let size = params.size.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut canvas = vec![[params.base.r, params.base.g, params.base.b]; (size * size) as usize];

    for _ in 0..params.grains {
        let cx = rng.random::<f32>() * size as f32;
        let cy = rng.random::<f32>() * size as f32;
        let radius = rng.random::<f32>() * params.max_radius;
        let alpha = rng.random::<f32>() * params.max_alpha;
        splat_disc(&mut canvas, size, cx, cy, radius, alpha);
    }

    let rgba = canvas
        .iter()
        .flat_map(|[r, g, b]| [to_u8(*r), to_u8(*g), to_u8(*b), 255])
        .collect();

    tracing::debug!(size, grains = params.grains, "sand texture generated");
    Texture {
        name: "sand".into(),
        width: size,
        height: size,
        rgba,
        wrap: Wrap::Repeat,
        filter: Filter::Linear,
    }
}

/// Blend a white disc into the canvas with a one-pixel soft edge.
fn splat_disc(canvas: &mut [[f32; 3]], size: u32, cx: f32, cy: f32, radius: f32, alpha: f32) {
    let reach = radius + 0.5;
    let x0 = (cx - reach).floor().max(0.0) as u32;
    let y0 = (cy - reach).floor().max(0.0) as u32;
    let x1 = ((cx + reach).ceil() as u32).min(size - 1);
    let y1 = ((cy + reach).ceil() as u32).min(size - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            let coverage = (reach - d).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let a = alpha * coverage;
            let px = &mut canvas[(y * size + x) as usize];
            for c in px.iter_mut() {
                *c = *c * (1.0 - a) + a;
            }
        }
    }
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SandParams {
        SandParams {
            size: 32,
            grains: 2_000,
            ..SandParams::default()
        }
    }

    #[test]
    fn sand_has_requested_size() {
        let t = generate_sand(&small(), 1);
        assert_eq!((t.width, t.height), (32, 32));
        assert_eq!(t.rgba.len(), 32 * 32 * 4);
        assert_eq!(t.wrap, Wrap::Repeat);
    }

    #[test]
    fn grains_only_lighten_the_base() {
        let params = small();
        let t = generate_sand(&params, 2);
        let base = [to_u8(params.base.r), to_u8(params.base.g), to_u8(params.base.b)];
        let mut lighter = 0;
        for px in t.rgba.chunks_exact(4) {
            for c in 0..3 {
                assert!(px[c] >= base[c]);
            }
            assert_eq!(px[3], 255);
            if px[0] > base[0] {
                lighter += 1;
            }
        }
        assert!(lighter > 0);
    }

    #[test]
    fn no_grains_is_flat_base() {
        let params = SandParams {
            size: 8,
            grains: 0,
            ..SandParams::default()
        };
        let t = generate_sand(&params, 0);
        let first = t.pixel(0, 0).unwrap();
        assert!(t.rgba.chunks_exact(4).all(|px| px == first));
        assert_eq!(first, [0xd2, 0xb4, 0x8c, 255]);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        assert_eq!(generate_sand(&small(), 5).rgba, generate_sand(&small(), 5).rgba);
    }
}
