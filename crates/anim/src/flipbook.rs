use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::AnimError;

/// Grid arrangement of frames on a sprite sheet, read left-to-right then
/// top-to-bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub columns: u32,
    pub rows: u32,
    pub total_frames: u32,
}

impl SheetLayout {
    pub fn new(columns: u32, rows: u32, total_frames: u32) -> Result<Self, AnimError> {
        if columns == 0 || rows == 0 {
            return Err(AnimError::EmptyGrid { columns, rows });
        }
        let cells = columns.saturating_mul(rows);
        if total_frames == 0 || total_frames > cells {
            return Err(AnimError::TooManyFrames {
                frames: total_frames,
                cells,
            });
        }
        Ok(Self {
            columns,
            rows,
            total_frames,
        })
    }

    /// Layout that uses every cell of the grid.
    pub fn full(columns: u32, rows: u32) -> Result<Self, AnimError> {
        Self::new(columns, rows, columns.saturating_mul(rows))
    }

    /// Texture-space rectangle of `frame`, shrunk by `inset` on every edge.
    ///
    /// UV origin is the bottom-left of the sheet while row 0 is its top row,
    /// so the V range is flipped.
    pub fn uv_rect(&self, frame: u32, inset: f32) -> UvRect {
        let column = frame % self.columns;
        let row = frame / self.columns;
        let width = 1.0 / self.columns as f32;
        let height = 1.0 / self.rows as f32;

        let u0 = column as f32 * width;
        let u1 = (column + 1) as f32 * width;
        let v1 = 1.0 - row as f32 * height;
        let v0 = v1 - height;

        UvRect {
            u0: u0 + inset,
            v0: v0 + inset,
            u1: u1 - inset,
            v1: v1 - inset,
        }
    }
}

/// Axis-aligned rectangle in texture space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    pub const FULL: Self = Self {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    /// Corner coordinates in quad vertex order: bottom-left, bottom-right,
    /// top-left, top-right.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        [
            [self.u0, self.v0],
            [self.u1, self.v0],
            [self.u0, self.v1],
            [self.u1, self.v1],
        ]
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.u0, self.v0, self.u1, self.v1]
    }
}

/// Sprite-sheet animation state: which frame is showing and how long it has
/// been showing.
#[derive(Debug, Clone, PartialEq)]
pub struct Flipbook {
    layout: SheetLayout,
    frame: u32,
    elapsed: f32,
    frame_duration: f32,
    inset: f32,
    uv: UvRect,
}

impl Flipbook {
    pub fn new(
        layout: SheetLayout,
        start_frame: u32,
        frame_duration: f32,
        inset: f32,
    ) -> Result<Self, AnimError> {
        if start_frame >= layout.total_frames {
            return Err(AnimError::StartFrameOutOfRange {
                frame: start_frame,
                total: layout.total_frames,
            });
        }
        if !(frame_duration.is_finite() && frame_duration > 0.0) {
            return Err(AnimError::InvalidFrameDuration(frame_duration));
        }
        let min_cell = (1.0 / layout.columns as f32).min(1.0 / layout.rows as f32);
        if !(inset >= 0.0 && inset * 2.0 < min_cell) {
            return Err(AnimError::InsetTooLarge {
                inset,
                columns: layout.columns,
                rows: layout.rows,
            });
        }

        Ok(Self {
            layout,
            frame: start_frame,
            elapsed: 0.0,
            frame_duration,
            inset,
            uv: layout.uv_rect(start_frame, inset),
        })
    }

    /// Accumulate `delta` seconds. Returns `true` when the frame changed.
    ///
    /// At most one frame is advanced per call and the accumulator is reset
    /// rather than carried over, so a long stall does not skip frames.
    pub fn advance(&mut self, delta: f32) -> bool {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
        if self.elapsed < self.frame_duration {
            return false;
        }
        self.elapsed = 0.0;
        self.frame = (self.frame + 1) % self.layout.total_frames;
        self.uv = self.layout.uv_rect(self.frame, self.inset);
        true
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn layout(&self) -> SheetLayout {
        self.layout
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn uv(&self) -> UvRect {
        self.uv
    }
}

/// Keeps a sprite upright while turning it toward a viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Billboard {
    yaw: f32,
}

impl Billboard {
    /// Turn about the vertical axis so the sprite's +Z normal points at
    /// `viewpoint`. When the viewpoint is straight above or below, the
    /// previous yaw is kept.
    pub fn face(&mut self, position: Vec3, viewpoint: Vec3) -> Quat {
        let dx = viewpoint.x - position.x;
        let dz = viewpoint.z - position.z;
        if dx.abs() > f32::EPSILON || dz.abs() > f32::EPSILON {
            self.yaw = dx.atan2(dz);
        }
        self.rotation()
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

/// A flip-book animation attached to a camera-facing quad.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipbookSprite {
    pub flipbook: Flipbook,
    pub billboard: Billboard,
}

impl FlipbookSprite {
    pub fn new(flipbook: Flipbook) -> Self {
        Self {
            flipbook,
            billboard: Billboard::default(),
        }
    }

    /// Advance the animation and re-face the viewpoint. Facing is updated on
    /// every call, frame changes only when enough time has accumulated.
    pub fn advance(&mut self, delta: f32, position: Vec3, viewpoint: Vec3) -> Quat {
        if self.flipbook.advance(delta) {
            tracing::trace!(frame = self.flipbook.frame(), "sprite frame advanced");
        }
        self.billboard.face(position, viewpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.015;

    fn sheet() -> SheetLayout {
        SheetLayout::full(4, 2).unwrap()
    }

    #[test]
    fn layout_validation() {
        assert!(SheetLayout::new(0, 2, 1).is_err());
        assert!(SheetLayout::new(4, 2, 9).is_err());
        assert!(SheetLayout::new(4, 2, 0).is_err());
        assert_eq!(SheetLayout::new(4, 2, 6).unwrap().total_frames, 6);
    }

    #[test]
    fn flipbook_validation() {
        assert!(matches!(
            Flipbook::new(sheet(), 8, 0.8, EPS),
            Err(AnimError::StartFrameOutOfRange { .. })
        ));
        assert!(matches!(
            Flipbook::new(sheet(), 0, 0.0, EPS),
            Err(AnimError::InvalidFrameDuration(_))
        ));
        assert!(matches!(
            Flipbook::new(sheet(), 0, 0.8, 0.3),
            Err(AnimError::InsetTooLarge { .. })
        ));
    }

    #[test]
    fn first_frame_uv_rect() {
        let uv = sheet().uv_rect(0, EPS);
        assert!((uv.u0 - EPS).abs() < 1e-6);
        assert!((uv.u1 - (0.25 - EPS)).abs() < 1e-6);
        assert!((uv.v0 - (0.5 + EPS)).abs() < 1e-6);
        assert!((uv.v1 - (1.0 - EPS)).abs() < 1e-6);
    }

    #[test]
    fn second_row_uv_rect() {
        // Frame 5 is column 1 of the bottom row.
        let uv = sheet().uv_rect(5, 0.0);
        assert_eq!(uv, UvRect { u0: 0.25, v0: 0.0, u1: 0.5, v1: 0.5 });
    }

    #[test]
    fn corners_follow_quad_order() {
        let uv = UvRect { u0: 0.1, v0: 0.2, u1: 0.3, v1: 0.4 };
        assert_eq!(uv.corners(), [[0.1, 0.2], [0.3, 0.2], [0.1, 0.4], [0.3, 0.4]]);
    }

    #[test]
    fn advance_waits_for_full_frame_duration() {
        let mut fb = Flipbook::new(sheet(), 0, 0.8, EPS).unwrap();
        assert!(!fb.advance(0.5));
        assert_eq!(fb.frame(), 0);
        assert!(fb.advance(0.35));
        assert_eq!(fb.frame(), 1);
        assert_eq!(fb.uv(), sheet().uv_rect(1, EPS));
    }

    #[test]
    fn long_stall_advances_one_frame() {
        let mut fb = Flipbook::new(sheet(), 0, 0.8, EPS).unwrap();
        assert!(fb.advance(10.0));
        assert_eq!(fb.frame(), 1);
        assert!(!fb.advance(0.1));
    }

    #[test]
    fn frame_index_cycles_back_to_start() {
        for start in [0, 4, 7] {
            let mut fb = Flipbook::new(sheet(), start, 0.5, EPS).unwrap();
            for _ in 0..sheet().total_frames {
                fb.advance(0.5);
                assert!(fb.frame() < sheet().total_frames);
            }
            assert_eq!(fb.frame(), start);
        }
    }

    #[test]
    fn billboard_faces_viewpoint_about_vertical_axis() {
        let mut b = Billboard::default();
        let q = b.face(Vec3::ZERO, Vec3::new(5.0, 3.0, 0.0));
        let normal = q * Vec3::Z;
        assert!((normal - Vec3::X).length() < 1e-5);
        // Up stays up.
        assert!(((q * Vec3::Y) - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn billboard_keeps_yaw_when_viewer_overhead() {
        let mut b = Billboard::default();
        b.face(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        let yaw = b.yaw();
        b.face(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(b.yaw(), yaw);
    }

    #[test]
    fn sprite_refaces_every_call() {
        let fb = Flipbook::new(sheet(), 0, 0.8, EPS).unwrap();
        let mut sprite = FlipbookSprite::new(fb);
        sprite.advance(0.01, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(sprite.billboard.yaw(), 0.0);
        sprite.advance(0.01, Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0));
        assert!((sprite.billboard.yaw() + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(sprite.flipbook.frame(), 0);
    }
}
