use beachfire_common::{Rgb, Transform};
use glam::{Mat4, Vec2, Vec3};

/// Side length of the sand plane.
pub const BEACH_SIZE: f32 = 30.0;
/// How many times the sand texture repeats across the plane.
pub const SAND_REPEAT: f32 = 8.0;

const OCEAN_SIZE: f32 = 2000.0;
const OCEAN_LEVEL: f32 = -0.15;
const OCEAN_COLOR: Rgb = Rgb::from_hex(0x0b3d5c);
const SWELL_AMPLITUDE: f32 = 0.05;
const SWELL_SPEED: f32 = 0.4;

/// Sand plane that travels with the camera so it never runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct Beach {
    pub transform: Transform,
    pub size: f32,
}

impl Default for Beach {
    fn default() -> Self {
        Self::start()
    }
}

impl Beach {
    pub fn start() -> Self {
        tracing::info!("beach: initialized");
        Self {
            transform: Transform::default(),
            size: BEACH_SIZE,
        }
    }

    /// Recentre under the camera, keeping the plane on the ground.
    pub fn update(&mut self, camera_position: Vec3) {
        self.transform.position = Vec3::new(camera_position.x, 0.0, camera_position.z);
    }

    /// Texture offset that keeps the sand pattern fixed in world space
    /// while the plane moves.
    pub fn uv_offset(&self) -> Vec2 {
        let p = self.transform.position;
        Vec2::new(p.x, -p.z) / self.size * SAND_REPEAT
    }

    /// Matrix of a unit XZ quad stretched to the beach.
    pub fn matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_scale(Vec3::new(self.size, 1.0, self.size))
    }
}

/// Water plane under the beach with a slow vertical swell.
#[derive(Debug, Clone, PartialEq)]
pub struct Ocean {
    pub transform: Transform,
    pub size: f32,
    pub color: Rgb,
    elapsed: f32,
}

impl Default for Ocean {
    fn default() -> Self {
        Self::start()
    }
}

impl Ocean {
    pub fn start() -> Self {
        tracing::info!("ocean: initialized");
        Self {
            transform: Transform::from_position(Vec3::new(0.0, OCEAN_LEVEL, 0.0)),
            size: OCEAN_SIZE,
            color: OCEAN_COLOR,
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, delta: f32) {
        self.elapsed += delta;
        self.transform.position.y = OCEAN_LEVEL + (self.elapsed * SWELL_SPEED).sin() * SWELL_AMPLITUDE;
    }

    pub fn matrix(&self) -> Mat4 {
        self.transform.matrix() * Mat4::from_scale(Vec3::new(self.size, 1.0, self.size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Direction the light travels, toward the origin.
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

/// Background colour and the two global lights.
#[derive(Debug, Clone, PartialEq)]
pub struct Sky {
    pub clear_color: Rgb,
    /// Unit vector from the scene toward the sun.
    pub dir_to_light: Vec3,
    pub sun: DirectionalLight,
    pub ambient: AmbientLight,
}

impl Default for Sky {
    fn default() -> Self {
        Self::start()
    }
}

impl Sky {
    /// Distance the sun light is placed at along `dir_to_light`.
    pub const SUN_DISTANCE: f32 = 100.0;

    pub fn start() -> Self {
        tracing::info!("sky: initialized");
        let dir_to_light = Vec3::new(0.3, 0.6, -0.75).normalize();
        Self {
            clear_color: Rgb::from_hex(0x000033),
            dir_to_light,
            sun: DirectionalLight {
                position: dir_to_light * Self::SUN_DISTANCE,
                color: Rgb::from_hex(0xffffff),
                intensity: 2.0,
            },
            ambient: AmbientLight {
                color: Rgb::from_hex(0x404040),
                intensity: 0.5,
            },
        }
    }

    /// Re-aim the sun along the current light direction.
    pub fn update(&mut self) {
        self.sun.position = self.dir_to_light * Self::SUN_DISTANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beach_follows_camera_on_ground() {
        let mut beach = Beach::start();
        beach.update(Vec3::new(1.5, 2.0, 7.0));
        assert_eq!(beach.transform.position, Vec3::new(1.5, 0.0, 7.0));
        let corner = beach.matrix().transform_point3(Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(corner, Vec3::new(1.5 + BEACH_SIZE / 2.0, 0.0, 7.0 + BEACH_SIZE / 2.0));
    }

    #[test]
    fn sand_pattern_is_world_anchored() {
        let mut beach = Beach::start();
        assert_eq!(beach.uv_offset(), Vec2::ZERO);
        beach.update(Vec3::new(BEACH_SIZE / SAND_REPEAT, 0.0, 0.0));
        assert!((beach.uv_offset().x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ocean_swell_is_bounded() {
        let mut ocean = Ocean::start();
        let mut heights = Vec::new();
        for _ in 0..200 {
            ocean.update(0.05);
            let y = ocean.transform.position.y;
            assert!((y - OCEAN_LEVEL).abs() <= SWELL_AMPLITUDE + 1e-6);
            heights.push(y);
        }
        assert!(heights.iter().any(|y| *y > OCEAN_LEVEL));
        assert!(heights.iter().any(|y| *y < OCEAN_LEVEL));
    }

    #[test]
    fn sun_sits_along_light_direction() {
        let mut sky = Sky::start();
        sky.update();
        assert!((sky.sun.position.length() - Sky::SUN_DISTANCE).abs() < 1e-3);
        assert!(sky.sun.direction().dot(sky.dir_to_light) < -0.999);
        assert_eq!(sky.clear_color, Rgb::from_hex(0x000033));
    }
}
