use beachfire_input::ZoomDirection;
use glam::{Mat4, Vec3};

/// Distance moved along the view direction per zoom step.
const ZOOM_STEP: f32 = 0.5;
/// Zoom is rejected unless the new distance to the target lies strictly
/// inside this range.
const ZOOM_LIMITS: (f32, f32) = (3.0, 15.0);

/// Fixed-target camera that can only dolly toward or away from its target.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 8.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.3,
            far: 4000.0,
        }
    }
}

impl CameraRig {
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Move one step along the view direction. Returns `false` and leaves the
    /// camera untouched when the step would leave the allowed distance band.
    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        let sign = match direction {
            ZoomDirection::In => 1.0,
            ZoomDirection::Out => -1.0,
        };
        let candidate = self.position + self.forward() * (sign * ZOOM_STEP);
        let distance = candidate.distance(self.target);
        if distance > ZOOM_LIMITS.0 && distance < ZOOM_LIMITS.1 {
            self.position = candidate;
            tracing::debug!(distance, "camera zoomed");
            true
        } else {
            tracing::trace!(distance, "zoom rejected");
            false
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite() && self.aspect.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = CameraRig::default();
        assert!(cam.position.y > 0.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
        assert!((cam.distance() - 65f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn zoom_in_moves_closer() {
        let mut cam = CameraRig::default();
        let before = cam.distance();
        assert!(cam.zoom(ZoomDirection::In));
        assert!((before - cam.distance() - ZOOM_STEP).abs() < 1e-4);
    }

    #[test]
    fn zoom_stops_at_limits() {
        let mut cam = CameraRig::default();
        for _ in 0..100 {
            cam.zoom(ZoomDirection::In);
        }
        assert!(cam.distance() > ZOOM_LIMITS.0);
        let closest = cam.position;
        assert!(!cam.zoom(ZoomDirection::In));
        assert_eq!(cam.position, closest);

        for _ in 0..100 {
            cam.zoom(ZoomDirection::Out);
        }
        assert!(cam.distance() < ZOOM_LIMITS.1);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = CameraRig::default();
        cam.resize(1000, 500);
        assert_eq!(cam.aspect, 2.0);
        cam.resize(10, 0);
        assert!(cam.aspect.is_finite());
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = CameraRig::default();
        assert!(cam.forward().dot(cam.right()).abs() < 1e-5);
        assert!(cam.forward().dot(cam.up()).abs() < 1e-5);
        assert!(cam.up().y > 0.0);
    }
}
