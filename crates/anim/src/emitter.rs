use beachfire_common::Rgb;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::AnimError;

/// Full width of the horizontal velocity range given to a respawned particle.
const HORIZONTAL_VELOCITY_RANGE: f32 = 0.1;
/// Full width of the per-step horizontal jitter added to surviving particles.
const DRIFT_RANGE: f32 = 0.01;
/// Respawned particles start in the bottom fraction of the system height.
const SPAWN_BAND: f32 = 0.2;
/// Material opacity before the first step.
const INITIAL_OPACITY: f32 = 0.8;

/// Static settings of one particle system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Pool size. Fixed for the lifetime of the emitter.
    pub count: usize,
    /// Rendered point size in world units.
    pub size: f32,
    /// Height of the effect; particles spawn in its bottom fifth.
    pub height: f32,
    /// Radius of the spawn disk.
    pub radius: f32,
    pub color: Rgb,
    /// Upper bound of the vertical spawn velocity.
    pub speed: f32,
    /// Upper bound of a sampled particle lifetime, in seconds.
    pub lifetime: f32,
}

impl EmitterConfig {
    pub const FIRE_HEIGHT: f32 = 1.2;
    pub const FIRE_RADIUS: f32 = 0.3;

    pub fn fire() -> Self {
        Self {
            count: 100,
            size: 0.2,
            height: Self::FIRE_HEIGHT,
            radius: Self::FIRE_RADIUS,
            color: Rgb::from_hex(0xff4400),
            speed: 2.0,
            lifetime: 1.0,
        }
    }

    pub fn smoke() -> Self {
        Self {
            count: 50,
            size: 0.3,
            height: Self::FIRE_HEIGHT * 2.0,
            radius: Self::FIRE_RADIUS * 1.5,
            color: Rgb::from_hex(0x666666),
            speed: 0.5,
            lifetime: 2.0,
        }
    }

    pub fn embers() -> Self {
        Self {
            count: 20,
            size: 0.05,
            height: Self::FIRE_HEIGHT * 1.5,
            radius: Self::FIRE_RADIUS * 2.0,
            color: Rgb::from_hex(0xff2200),
            speed: 1.0,
            lifetime: 1.5,
        }
    }

    fn validate(&self) -> Result<(), AnimError> {
        if self.count == 0 {
            return Err(AnimError::EmptyPool);
        }
        for (field, value) in [
            ("size", self.size),
            ("height", self.height),
            ("radius", self.radius),
            ("speed", self.speed),
            ("lifetime", self.lifetime),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnimError::InvalidEmitterParam { field, value });
            }
        }
        Ok(())
    }
}

/// Fixed-capacity recycling particle pool.
///
/// Particle state lives in three parallel buffers (position, velocity,
/// remaining lifetime) that are allocated once in [`Emitter::new`] and then
/// rewritten in place every step. The whole pool shares one opacity value,
/// taken from the last surviving particle of the most recent step.
#[derive(Debug, Clone)]
pub struct Emitter {
    config: EmitterConfig,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    lifetimes: Vec<f32>,
    opacity: f32,
    rng: StdRng,
}

impl Emitter {
    /// Build an emitter and scatter its initial particles. The seed drives
    /// every random draw the emitter makes, so equal seeds replay equally.
    pub fn new(config: EmitterConfig, seed: u64) -> Result<Self, AnimError> {
        config.validate()?;
        let count = config.count;
        let mut emitter = Self {
            config,
            positions: vec![Vec3::ZERO; count],
            velocities: vec![Vec3::ZERO; count],
            lifetimes: vec![0.0; count],
            opacity: INITIAL_OPACITY,
            rng: StdRng::seed_from_u64(seed),
        };
        for i in 0..count {
            emitter.respawn(i);
        }
        tracing::debug!(count, seed, "emitter initialised");
        Ok(emitter)
    }

    /// Advance every particle by `delta` seconds.
    ///
    /// Non-finite or negative deltas are ignored.
    pub fn step(&mut self, delta: f32) {
        if !(delta.is_finite() && delta >= 0.0) {
            tracing::warn!(delta, "ignoring invalid emitter delta");
            return;
        }

        let max_lifetime = self.config.lifetime;
        for i in 0..self.lifetimes.len() {
            self.lifetimes[i] -= delta;

            if self.lifetimes[i] <= 0.0 {
                self.respawn(i);
                continue;
            }

            let drift = Vec3::new(
                (self.rng.random::<f32>() - 0.5) * DRIFT_RANGE,
                0.0,
                (self.rng.random::<f32>() - 0.5) * DRIFT_RANGE,
            );
            self.positions[i] += self.velocities[i] * delta + drift;
            self.opacity = (self.lifetimes[i] / max_lifetime).min(1.0);
        }
    }

    fn respawn(&mut self, i: usize) {
        let theta = self.rng.random::<f32>() * TAU;
        let r = self.rng.random::<f32>() * self.config.radius;
        self.positions[i] = Vec3::new(
            theta.cos() * r,
            self.rng.random::<f32>() * self.config.height * SPAWN_BAND,
            theta.sin() * r,
        );
        self.velocities[i] = Vec3::new(
            (self.rng.random::<f32>() - 0.5) * HORIZONTAL_VELOCITY_RANGE,
            self.rng.random::<f32>() * self.config.speed,
            (self.rng.random::<f32>() - 0.5) * HORIZONTAL_VELOCITY_RANGE,
        );
        self.lifetimes[i] = self.rng.random::<f32>() * self.config.lifetime;
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.lifetimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lifetimes.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn lifetimes(&self) -> &[f32] {
        &self.lifetimes
    }

    /// Shared opacity of the whole pool.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Top of the band new particles spawn in.
    pub fn spawn_ceiling(&self) -> f32 {
        self.config.height * SPAWN_BAND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(seed: u64) -> Emitter {
        Emitter::new(EmitterConfig::fire(), seed).unwrap()
    }

    fn within_spawn_volume(e: &Emitter, p: Vec3) -> bool {
        let horizontal = (p.x * p.x + p.z * p.z).sqrt();
        horizontal <= e.config().radius + 1e-5 && p.y >= 0.0 && p.y <= e.spawn_ceiling()
    }

    #[test]
    fn pool_size_matches_config() {
        let e = fire(1);
        assert_eq!(e.len(), 100);
        assert_eq!(e.positions().len(), 100);
        assert_eq!(e.velocities().len(), 100);
        assert_eq!(e.lifetimes().len(), 100);
        assert_eq!(e.opacity(), INITIAL_OPACITY);
    }

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = EmitterConfig::smoke();
        cfg.count = 0;
        assert_eq!(Emitter::new(cfg, 0).unwrap_err(), AnimError::EmptyPool);

        let mut cfg = EmitterConfig::smoke();
        cfg.lifetime = 0.0;
        assert!(matches!(
            Emitter::new(cfg, 0),
            Err(AnimError::InvalidEmitterParam { field: "lifetime", .. })
        ));
    }

    #[test]
    fn initial_particles_start_in_spawn_volume() {
        let e = fire(9);
        for p in e.positions() {
            assert!(within_spawn_volume(&e, *p), "{p:?}");
        }
    }

    #[test]
    fn lifetime_counts_down_until_respawn() {
        let mut e = fire(42);
        let initial = e.lifetimes().to_vec();
        let dt = 0.01;
        let steps = 20;
        for _ in 0..steps {
            e.step(dt);
        }
        let elapsed = dt * steps as f32;
        let mut checked = 0;
        for (before, after) in initial.iter().zip(e.lifetimes()) {
            if *before > elapsed + 1e-3 {
                assert!((before - elapsed - after).abs() < 1e-4);
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn lifetimes_never_negative() {
        let mut e = fire(3);
        for _ in 0..500 {
            e.step(1.0 / 60.0);
            for l in e.lifetimes() {
                assert!(*l >= 0.0 && *l < e.config().lifetime, "{l}");
            }
        }
    }

    #[test]
    fn respawned_particles_land_in_spawn_volume() {
        let mut e = fire(11);
        // One step longer than the max lifetime expires every particle.
        e.step(e.config().lifetime + 0.01);
        for p in e.positions() {
            assert!(within_spawn_volume(&e, *p), "{p:?}");
        }
        for v in e.velocities() {
            assert!(v.x.abs() <= HORIZONTAL_VELOCITY_RANGE / 2.0);
            assert!(v.z.abs() <= HORIZONTAL_VELOCITY_RANGE / 2.0);
            assert!(v.y >= 0.0 && v.y < e.config().speed);
        }
    }

    #[test]
    fn survivors_move_by_velocity() {
        let mut e = fire(5);
        let before = e.positions().to_vec();
        let vel = e.velocities().to_vec();
        let lifetimes = e.lifetimes().to_vec();
        let dt = 0.05;
        e.step(dt);
        for i in 0..e.len() {
            if lifetimes[i] > dt + 1e-4 {
                let expected = before[i] + vel[i] * dt;
                let moved = e.positions()[i];
                assert!((moved.y - expected.y).abs() < 1e-5);
                assert!((moved.x - expected.x).abs() <= DRIFT_RANGE / 2.0 + 1e-5);
                assert!((moved.z - expected.z).abs() <= DRIFT_RANGE / 2.0 + 1e-5);
            }
        }
    }

    #[test]
    fn opacity_follows_last_survivor() {
        let mut e = fire(8);
        let before = e.lifetimes().to_vec();
        let dt = 0.01;
        e.step(dt);
        let last = (0..before.len())
            .rev()
            .find(|&i| before[i] - dt > 0.0)
            .expect("at least one survivor");
        let expected = (e.lifetimes()[last] / e.config().lifetime).min(1.0);
        assert_eq!(e.opacity(), expected);
    }

    #[test]
    fn opacity_kept_when_nothing_survives() {
        let mut e = fire(8);
        e.step(0.01);
        let opacity = e.opacity();
        e.step(e.config().lifetime + 1.0);
        assert_eq!(e.opacity(), opacity);
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = fire(77);
        let mut b = fire(77);
        for _ in 0..100 {
            a.step(0.016);
            b.step(0.016);
        }
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.lifetimes(), b.lifetimes());
        assert_eq!(a.opacity(), b.opacity());
    }

    #[test]
    fn invalid_delta_is_ignored() {
        let mut e = fire(2);
        let before = e.lifetimes().to_vec();
        e.step(f32::NAN);
        e.step(-1.0);
        assert_eq!(e.lifetimes(), before.as_slice());
    }

    #[test]
    fn presets_are_valid() {
        for cfg in [EmitterConfig::fire(), EmitterConfig::smoke(), EmitterConfig::embers()] {
            assert!(Emitter::new(cfg, 0).is_ok());
        }
    }
}
