use beachfire_common::EulerRotation;

/// Wind sway applied on top of a static orientation.
///
/// X receives `sin(t + phase) * strength`, Z receives
/// `(cos(t + phase) - 1) * strength * z_ratio`. Y is never touched, which
/// keeps objects laid out around a circle at their authored angle. Both
/// terms vanish at `t + phase = 0`, so the baseline is returned unchanged
/// there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSway {
    pub strength: f32,
    pub z_ratio: f32,
}

impl Default for WindSway {
    fn default() -> Self {
        Self {
            strength: 0.02,
            z_ratio: 0.5,
        }
    }
}

impl WindSway {
    pub fn apply(&self, baseline: EulerRotation, time: f32, phase: f32) -> EulerRotation {
        let theta = time + phase;
        EulerRotation {
            x: baseline.x + theta.sin() * self.strength,
            y: baseline.y,
            z: baseline.z + (theta.cos() - 1.0) * self.strength * self.z_ratio,
        }
    }
}

/// Flickering light intensity: a fast sine plus caller-supplied noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flicker {
    pub base: f32,
    pub speed: f32,
    pub amplitude: f32,
    /// Half-width of the noise range callers should sample from.
    pub noise: f32,
}

impl Flicker {
    /// Flicker used for the campfire point light.
    pub fn campfire() -> Self {
        Self {
            base: 5.0,
            speed: 15.0,
            amplitude: 0.3,
            noise: 0.1,
        }
    }

    /// Intensity at `time`. `noise` is clamped to the configured range.
    pub fn intensity(&self, time: f32, noise: f32) -> f32 {
        let noise = noise.clamp(-self.noise, self.noise);
        self.base + (time * self.speed).sin() * self.amplitude + noise
    }

    pub fn bounds(&self) -> (f32, f32) {
        let spread = self.amplitude + self.noise;
        (self.base - spread, self.base + spread)
    }
}
