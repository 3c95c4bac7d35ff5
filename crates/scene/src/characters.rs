use beachfire_anim::{AnimError, Flipbook, FlipbookSprite, SheetLayout, UvRect};
use beachfire_common::{Rgb, Transform};
use beachfire_input::MAX_SPRITE_COUNT;
use glam::{Quat, Vec3};
use std::f32::consts::PI;

use crate::SceneError;
use crate::campfire::{CAMPFIRE_POSITION, SITTING_LOG_DISTANCE, SITTING_LOG_Z};

pub const SHEET_COLUMNS: u32 = 4;
pub const SHEET_ROWS: u32 = 2;
pub const TOTAL_FRAMES: u32 = 8;
/// Unscaled size of the sprite quad, 1:2 to match a sheet cell.
pub const SPRITE_SIZE: (f32, f32) = (2.0, 4.0);
pub const SPRITE_SCALE: f32 = 0.35;
pub const UV_INSET: f32 = 0.015;
pub const DEFAULT_FRAME_DURATION: f32 = 0.8;

/// Radius of the arc extra characters sit on, in front of the fire.
const OUTER_RING_RADIUS: f32 = 2.5;
/// Slots available on the outer ring.
const OUTER_RING_SLOTS: usize = MAX_SPRITE_COUNT as usize - 2;

/// Static description of one character sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPreset {
    pub name: &'static str,
    /// Sheet path relative to the asset root.
    pub sheet: &'static str,
    /// Colour of the generated sheet used when the image is missing.
    pub tint: Rgb,
    pub facing_right: bool,
    pub start_frame: u32,
}

impl CharacterPreset {
    pub const PETE: Self = Self {
        name: "pete",
        sheet: "images/PeteSprite.png",
        tint: Rgb::from_hex(0x3b6ea5),
        facing_right: false,
        start_frame: 0,
    };

    pub const ANDY: Self = Self {
        name: "andy",
        sheet: "images/AndySprite.png",
        tint: Rgb::from_hex(0xa5553b),
        facing_right: true,
        start_frame: 4,
    };

    pub const ALL: [Self; 2] = [Self::PETE, Self::ANDY];
}

/// Where a roster slot puts its character, relative to the fire.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Seat {
    preset: CharacterPreset,
    position: Vec3,
    facing_right: bool,
    start_frame: u32,
}

/// Seat of the `index`-th character. The first two sit on the logs either
/// side of the fire; the rest fill an arc in front of it, alternating
/// presets.
fn seat(index: usize) -> Seat {
    let y = SPRITE_SIZE.1 * SPRITE_SCALE / 2.0;
    match index {
        0 => Seat {
            preset: CharacterPreset::PETE,
            position: Vec3::new(-SITTING_LOG_DISTANCE, y, SITTING_LOG_Z),
            facing_right: CharacterPreset::PETE.facing_right,
            start_frame: CharacterPreset::PETE.start_frame,
        },
        1 => Seat {
            preset: CharacterPreset::ANDY,
            position: Vec3::new(SITTING_LOG_DISTANCE, y, SITTING_LOG_Z),
            facing_right: CharacterPreset::ANDY.facing_right,
            start_frame: CharacterPreset::ANDY.start_frame,
        },
        _ => {
            let k = (index - 2) % OUTER_RING_SLOTS;
            let theta = PI * (k + 1) as f32 / (OUTER_RING_SLOTS + 1) as f32;
            Seat {
                preset: CharacterPreset::ALL[index % 2],
                position: Vec3::new(
                    theta.cos() * OUTER_RING_RADIUS,
                    y,
                    theta.sin() * OUTER_RING_RADIUS,
                ),
                facing_right: theta.cos() > 0.0,
                start_frame: (index as u32 * 4) % TOTAL_FRAMES,
            }
        }
    }
}

/// One animated, camera-facing character sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub preset: CharacterPreset,
    pub sprite: FlipbookSprite,
    /// Position relative to the characters group.
    pub position: Vec3,
    pub facing_right: bool,
    rotation: Quat,
}

impl Character {
    fn seated(seat: Seat, frame_duration: f32) -> Result<Self, AnimError> {
        let layout = SheetLayout::new(SHEET_COLUMNS, SHEET_ROWS, TOTAL_FRAMES)?;
        let flipbook = Flipbook::new(layout, seat.start_frame, frame_duration, UV_INSET)?;
        Ok(Self {
            preset: seat.preset,
            sprite: FlipbookSprite::new(flipbook),
            position: seat.position,
            facing_right: seat.facing_right,
            rotation: Quat::IDENTITY,
        })
    }

    /// Advance the animation and turn toward `viewpoint`.
    pub fn update(&mut self, delta: f32, group_origin: Vec3, viewpoint: Vec3) {
        let world = group_origin + self.position;
        self.rotation = self.sprite.advance(delta, world, viewpoint);
    }

    /// Negative X scale mirrors the sheet for right-facing characters.
    pub fn scale(&self) -> Vec3 {
        let x = if self.facing_right { -SPRITE_SCALE } else { SPRITE_SCALE };
        Vec3::new(x, SPRITE_SCALE, 1.0)
    }

    /// Transform relative to the group.
    pub fn local_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale(),
        }
    }

    pub fn frame(&self) -> u32 {
        self.sprite.flipbook.frame()
    }

    pub fn uv(&self) -> UvRect {
        self.sprite.flipbook.uv()
    }
}

/// The seated characters around the campfire.
#[derive(Debug, Clone, PartialEq)]
pub struct Characters {
    pub group: Transform,
    pub members: Vec<Character>,
    frame_duration: f32,
}

impl Characters {
    /// Seat the first `count` characters of the roster. Counts above the
    /// maximum are clamped.
    pub fn start(count: u8, frame_duration: f32) -> Result<Self, SceneError> {
        tracing::info!(count, "characters: starting initialization");
        let count = count.min(MAX_SPRITE_COUNT) as usize;
        let members = (0..count)
            .map(|i| Character::seated(seat(i), frame_duration))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| SceneError::Init {
                component: "characters",
                source,
            })?;
        tracing::info!("characters: initialization complete");
        Ok(Self {
            group: Transform::from_position(CAMPFIRE_POSITION),
            members,
            frame_duration,
        })
    }

    pub fn update(&mut self, delta: f32, viewpoint: Vec3) {
        let origin = self.group.position;
        for member in &mut self.members {
            member.update(delta, origin, viewpoint);
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pair_sits_on_the_logs() {
        let chars = Characters::start(2, DEFAULT_FRAME_DURATION).unwrap();
        assert_eq!(chars.len(), 2);
        let pete = &chars.members[0];
        let andy = &chars.members[1];
        assert_eq!(pete.preset.name, "pete");
        assert_eq!(andy.preset.name, "andy");
        assert_eq!(pete.position.x, -SITTING_LOG_DISTANCE);
        assert_eq!(andy.position.x, SITTING_LOG_DISTANCE);
        assert_eq!(pete.frame(), 0);
        assert_eq!(andy.frame(), 4);
        assert_eq!(chars.group.position, CAMPFIRE_POSITION);
    }

    #[test]
    fn right_facing_characters_are_mirrored() {
        let chars = Characters::start(2, DEFAULT_FRAME_DURATION).unwrap();
        assert!(chars.members[0].scale().x > 0.0);
        assert!(chars.members[1].scale().x < 0.0);
        assert_eq!(chars.members[1].scale().y, SPRITE_SCALE);
    }

    #[test]
    fn count_selects_roster_prefix() {
        assert!(Characters::start(0, DEFAULT_FRAME_DURATION).unwrap().is_empty());
        let five = Characters::start(5, DEFAULT_FRAME_DURATION).unwrap();
        let names: Vec<_> = five.members.iter().map(|c| c.preset.name).collect();
        assert_eq!(names, ["pete", "andy", "pete", "andy", "pete"]);
        assert_eq!(Characters::start(200, DEFAULT_FRAME_DURATION).unwrap().len(), 8);
    }

    #[test]
    fn seats_do_not_overlap() {
        let all = Characters::start(MAX_SPRITE_COUNT, DEFAULT_FRAME_DURATION).unwrap();
        for (i, a) in all.members.iter().enumerate() {
            for b in &all.members[i + 1..] {
                assert!(a.position.distance(b.position) > 0.5);
            }
        }
    }

    #[test]
    fn frames_advance_on_duration() {
        let mut chars = Characters::start(2, DEFAULT_FRAME_DURATION).unwrap();
        let eye = Vec3::new(0.0, 2.0, 8.0);
        chars.update(0.5, eye);
        assert_eq!(chars.members[0].frame(), 0);
        chars.update(0.35, eye);
        assert_eq!(chars.members[0].frame(), 1);
        assert_eq!(chars.members[1].frame(), 5);
    }

    #[test]
    fn characters_face_camera() {
        let mut chars = Characters::start(2, DEFAULT_FRAME_DURATION).unwrap();
        let eye = Vec3::new(0.0, 2.0, 8.0);
        chars.update(0.0, eye);
        for c in &chars.members {
            let world = chars.group.position + c.position;
            let normal = c.local_transform().rotation * Vec3::Z;
            let to_eye = Vec3::new(eye.x - world.x, 0.0, eye.z - world.z).normalize();
            assert!(normal.dot(to_eye) > 0.999);
        }
    }

    #[test]
    fn invalid_duration_fails_start() {
        assert!(matches!(
            Characters::start(2, 0.0),
            Err(SceneError::Init { component: "characters", .. })
        ));
    }
}
