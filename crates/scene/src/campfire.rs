use beachfire_anim::{Emitter, EmitterConfig, Flicker};
use beachfire_common::{EulerRotation, Rgb, Transform};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::prop::Prop;
use crate::{SceneError, splitmix64};

pub const CAMPFIRE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 4.0);

const LOG_LENGTH: f32 = 0.8;
const LOG_RADIUS: f32 = 0.08;
const LOG_COLOR: Rgb = Rgb::from_hex(0x4a3520);
const LOG_EMISSIVE: f32 = 0.2;

const SITTING_LOG_LENGTH: f32 = 1.8;
pub const SITTING_LOG_RADIUS: f32 = 0.35;
/// Distance of the sitting logs from the fire centre along X.
pub const SITTING_LOG_DISTANCE: f32 = 2.2;
/// Z offset of the sitting logs from the fire centre.
pub const SITTING_LOG_Z: f32 = -1.0;

const LIGHT_HEIGHT: f32 = 0.5;
const LIGHT_DISTANCE: f32 = 15.0;
const LIGHT_COLOR: Rgb = Rgb::from_hex(0xff6600);

/// Which of the campfire's particle effects an emitter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Fire,
    Smoke,
    Embers,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [ParticleKind::Fire, ParticleKind::Smoke, ParticleKind::Embers];

    pub fn config(self) -> EmitterConfig {
        match self {
            ParticleKind::Fire => EmitterConfig::fire(),
            ParticleKind::Smoke => EmitterConfig::smoke(),
            ParticleKind::Embers => EmitterConfig::embers(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParticleKind::Fire => "fire",
            ParticleKind::Smoke => "smoke",
            ParticleKind::Embers => "embers",
        }
    }
}

/// One particle effect of the campfire.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub kind: ParticleKind,
    pub emitter: Emitter,
}

/// Omnidirectional light with linear falloff to zero at `distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    pub distance: f32,
}

/// Logs, the flickering fire light and three particle effects.
#[derive(Debug, Clone)]
pub struct Campfire {
    pub group: Transform,
    pub logs: Vec<Prop>,
    pub light: PointLight,
    pub particles: Vec<ParticleSystem>,
    flicker: Flicker,
    elapsed: f32,
    rng: StdRng,
}

impl Campfire {
    pub fn start(seed: u64) -> Result<Self, SceneError> {
        tracing::info!("campfire: starting initialization");

        let mut logs = fire_logs();
        logs.extend(sitting_logs());

        let mut particles = Vec::with_capacity(ParticleKind::ALL.len());
        let mut emitter_seed = seed;
        for kind in ParticleKind::ALL {
            emitter_seed = splitmix64(emitter_seed);
            let emitter = Emitter::new(kind.config(), emitter_seed).map_err(|source| {
                SceneError::Init {
                    component: "campfire",
                    source,
                }
            })?;
            particles.push(ParticleSystem { kind, emitter });
        }

        let flicker = Flicker::campfire();
        tracing::info!("campfire: initialization complete");
        Ok(Self {
            group: Transform::from_position(CAMPFIRE_POSITION),
            logs,
            light: PointLight {
                position: Vec3::new(0.0, LIGHT_HEIGHT, 0.0),
                color: LIGHT_COLOR,
                intensity: flicker.base,
                distance: LIGHT_DISTANCE,
            },
            particles,
            flicker,
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(splitmix64(emitter_seed)),
        })
    }

    pub fn update(&mut self, delta: f32) {
        self.elapsed += delta;

        let noise = (self.rng.random::<f32>() - 0.5) * 2.0 * self.flicker.noise;
        self.light.intensity = self.flicker.intensity(self.elapsed, noise);

        for system in &mut self.particles {
            system.emitter.step(delta);
        }

        // The fire never moves, whatever happened to the group.
        self.group.position = CAMPFIRE_POSITION;
    }

    pub fn matrix(&self) -> Mat4 {
        self.group.matrix()
    }

    pub fn light_world_position(&self) -> Vec3 {
        self.matrix().transform_point3(self.light.position)
    }

    /// Visit every log with its world matrix.
    pub fn for_each_prop(&self, mut visit: impl FnMut(Mat4, &Prop)) {
        let root = self.matrix();
        for log in &self.logs {
            visit(log.world(root), log);
        }
    }

    pub fn particle_count(&self) -> usize {
        self.particles.iter().map(|s| s.emitter.len()).sum()
    }

    pub fn system(&self, kind: ParticleKind) -> Option<&ParticleSystem> {
        self.particles.iter().find(|s| s.kind == kind)
    }
}

/// Two flat logs under three leaning ones in a tepee.
fn fire_logs() -> Vec<Prop> {
    let flat = EulerRotation::new(0.0, 0.0, FRAC_PI_2);
    let placements = [
        (Vec3::new(-0.2, 0.05, 0.0), flat),
        (Vec3::new(0.2, 0.05, 0.0), flat),
        (
            Vec3::new(-0.15, 0.1, -0.15),
            EulerRotation::new(PI * 0.15, PI * 0.25, 0.0),
        ),
        (
            Vec3::new(0.15, 0.1, -0.15),
            EulerRotation::new(PI * 0.15, -PI * 0.25, 0.0),
        ),
        (Vec3::new(0.0, 0.1, 0.2), EulerRotation::new(PI * 0.15, PI, 0.0)),
    ];
    placements
        .into_iter()
        .map(|(pos, rot)| {
            Prop::cylinder(LOG_RADIUS, LOG_LENGTH, Transform::from_euler(pos, rot), LOG_COLOR)
                .with_emissive(LOG_EMISSIVE)
        })
        .collect()
}

/// Seats on either side of the fire.
fn sitting_logs() -> Vec<Prop> {
    [-SITTING_LOG_DISTANCE, SITTING_LOG_DISTANCE]
        .into_iter()
        .map(|x| {
            let transform = Transform::from_euler(
                Vec3::new(x, SITTING_LOG_RADIUS, SITTING_LOG_Z),
                EulerRotation::new(0.0, 0.0, FRAC_PI_2),
            );
            Prop::cylinder(SITTING_LOG_RADIUS, SITTING_LOG_LENGTH, transform, LOG_COLOR)
                .with_emissive(LOG_EMISSIVE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campfire_builds_all_parts() {
        let fire = Campfire::start(1).unwrap();
        assert_eq!(fire.logs.len(), 7);
        assert_eq!(fire.particles.len(), 3);
        assert_eq!(fire.particle_count(), 100 + 50 + 20);
        assert_eq!(fire.group.position, CAMPFIRE_POSITION);
    }

    #[test]
    fn seed_drives_particles() {
        let a = Campfire::start(7).unwrap();
        let b = Campfire::start(7).unwrap();
        let c = Campfire::start(8).unwrap();
        let fire = |f: &Campfire| f.system(ParticleKind::Fire).unwrap().emitter.positions().to_vec();
        assert_eq!(fire(&a), fire(&b));
        assert_ne!(fire(&a), fire(&c));
    }

    #[test]
    fn light_flickers_within_bounds() {
        let mut fire = Campfire::start(3).unwrap();
        let (lo, hi) = Flicker::campfire().bounds();
        let mut seen = Vec::new();
        for _ in 0..120 {
            fire.update(1.0 / 60.0);
            assert!(fire.light.intensity >= lo - 1e-5 && fire.light.intensity <= hi + 1e-5);
            seen.push(fire.light.intensity);
        }
        assert!(seen.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn group_position_is_pinned() {
        let mut fire = Campfire::start(0).unwrap();
        fire.group.position = Vec3::new(9.0, 9.0, 9.0);
        fire.update(0.016);
        assert_eq!(fire.group.position, CAMPFIRE_POSITION);
    }

    #[test]
    fn light_sits_above_fire() {
        let fire = Campfire::start(0).unwrap();
        let p = fire.light_world_position();
        assert_eq!(p, Vec3::new(0.0, LIGHT_HEIGHT, CAMPFIRE_POSITION.z));
    }

    #[test]
    fn sitting_logs_flank_fire() {
        let logs = sitting_logs();
        assert_eq!(logs[0].local.position.x, -SITTING_LOG_DISTANCE);
        assert_eq!(logs[1].local.position.x, SITTING_LOG_DISTANCE);
        assert_eq!(logs[0].local.scale.y, SITTING_LOG_LENGTH);
    }
}
