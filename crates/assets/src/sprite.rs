use beachfire_common::Rgb;
use std::path::Path;

use crate::{AssetError, Filter, Texture, Wrap};

/// Pixel size of one generated placeholder cell (1:2 like the sprite quads).
const PLACEHOLDER_CELL: (u32, u32) = (32, 64);

/// Load a sprite sheet image. The image must split evenly into the grid.
pub fn load_sprite_sheet(
    path: impl AsRef<Path>,
    columns: u32,
    rows: u32,
) -> Result<Texture, AssetError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    if columns == 0 || rows == 0 || width % columns != 0 || height % rows != 0 {
        return Err(AssetError::UnevenGrid {
            width,
            height,
            columns,
            rows,
        });
    }
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite".into());
    tracing::debug!(%name, width, height, "sprite sheet loaded");
    Ok(Texture {
        name,
        width,
        height,
        rgba: image.into_raw(),
        wrap: Wrap::Clamp,
        filter: Filter::Nearest,
    })
}

/// Generate a stand-in sheet: one tinted figure per cell whose arm swings a
/// little further each frame, on a transparent background.
pub fn placeholder_sprite_sheet(name: &str, columns: u32, rows: u32, tint: Rgb) -> Texture {
    let columns = columns.max(1);
    let rows = rows.max(1);
    let (cw, ch) = PLACEHOLDER_CELL;
    let width = cw * columns;
    let height = ch * rows;
    let mut rgba = vec![0u8; (width * height * 4) as usize];

    let body = [
        (tint.r * 255.0) as u8,
        (tint.g * 255.0) as u8,
        (tint.b * 255.0) as u8,
        255,
    ];
    let skin = [224, 172, 105, 255];

    let mut fill = |x0: u32, y0: u32, x1: u32, y1: u32, colour: [u8; 4]| {
        for y in y0..y1.min(height) {
            for x in x0..x1.min(width) {
                let i = ((y * width + x) * 4) as usize;
                rgba[i..i + 4].copy_from_slice(&colour);
            }
        }
    };

    let frames = columns * rows;
    for frame in 0..frames {
        let ox = (frame % columns) * cw;
        let oy = (frame / columns) * ch;
        // Head, torso, legs.
        fill(ox + 12, oy + 6, ox + 20, oy + 14, skin);
        fill(ox + 10, oy + 14, ox + 22, oy + 38, body);
        fill(ox + 11, oy + 38, ox + 15, oy + 58, body);
        fill(ox + 17, oy + 38, ox + 21, oy + 58, body);
        // Arm raised by frame.
        let lift = (frame * 16 / frames.max(1)).min(16);
        fill(ox + 22, oy + 30 - lift, ox + 26, oy + 34 - lift / 2, skin);
    }

    Texture {
        name: format!("{name}-placeholder"),
        width,
        height,
        rgba,
        wrap: Wrap::Clamp,
        filter: Filter::Nearest,
    }
}

/// Load the sheet at `path`, or fall back to a generated placeholder when the
/// file is missing or unusable.
pub fn load_or_placeholder(
    path: impl AsRef<Path>,
    columns: u32,
    rows: u32,
    tint: Rgb,
) -> Texture {
    let path = path.as_ref();
    match load_sprite_sheet(path, columns, rows) {
        Ok(texture) => texture,
        Err(e) => {
            tracing::warn!(path = %path.display(), "sprite sheet unavailable, using placeholder: {e}");
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "sprite".into());
            placeholder_sprite_sheet(&name, columns, rows, tint)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_matches_grid() {
        let t = placeholder_sprite_sheet("pete", 4, 2, Rgb::from_hex(0x3366cc));
        assert_eq!(t.width, 4 * PLACEHOLDER_CELL.0);
        assert_eq!(t.height, 2 * PLACEHOLDER_CELL.1);
        assert_eq!(t.filter, Filter::Nearest);
        // Corner is transparent, torso is opaque.
        assert_eq!(t.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(t.pixel(15, 20).unwrap()[3], 255);
    }

    #[test]
    fn missing_file_falls_back() {
        let t = load_or_placeholder("/definitely/not/here/Andy.png", 4, 2, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(t.name, "Andy-placeholder");
        assert_eq!(t.rgba.len(), (t.width * t.height * 4) as usize);
    }

    #[test]
    fn uneven_grid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.png");
        Texture::solid("odd", 10, 10, [0, 0, 0, 255]).save_png(&path).unwrap();
        assert!(matches!(
            load_sprite_sheet(&path, 4, 2),
            Err(AssetError::UnevenGrid { .. })
        ));
    }
}
