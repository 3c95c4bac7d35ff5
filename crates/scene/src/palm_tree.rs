use beachfire_anim::WindSway;
use beachfire_common::{EulerRotation, Rgb, Transform};
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::prop::Prop;

pub const PALM_POSITION: Vec3 = Vec3::new(-4.0, 0.0, 2.0);

const TRUNK_HEIGHT: f32 = 4.5;
const TRUNK_RADIUS: f32 = 0.4;
const TRUNK_SEGMENTS: usize = 4;
const TAPER: f32 = 0.1;
/// Total bend of the trunk, 15 degrees.
const BEND_ANGLE: f32 = PI / 12.0;
const BARK_DETAILS: usize = 20;
const BARK_RADIUS: f32 = 0.05;
const BARK_LENGTH: f32 = 0.3;

const FRONDS: usize = 12;
const FROND_LENGTH: f32 = 3.0;
const FROND_TILT: f32 = FRAC_PI_4;
const STEM_RADIUS: f32 = 0.035;
const LEAF_PAIRS: usize = 12;
const LEAF_RADIUS: f32 = 0.2;
const LEAF_LENGTH: f32 = 1.5;
/// Phase step between neighbouring fronds.
const FROND_PHASE_STEP: f32 = 0.1;
/// Half-width of the random lean applied to the whole tree.
const LEAN_SPREAD: f32 = 0.05;

const TRUNK_COLOR: Rgb = Rgb::from_hex(0x4a3728);
const BARK_COLOR: Rgb = Rgb::from_hex(0x3a2718);
const STEM_COLOR: Rgb = Rgb::from_hex(0x2d5a27);
const LEAF_COLOR: Rgb = Rgb::from_hex(0x1a4f1a);

/// One frond of the crown: its authored orientation and the swayed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frond {
    pub baseline: EulerRotation,
    pub rotation: EulerRotation,
}

/// Palm tree with a bent, tapering trunk and a crown of swaying fronds.
#[derive(Debug, Clone, PartialEq)]
pub struct PalmTree {
    pub group: Transform,
    /// Trunk segments and bark details, relative to `group`.
    pub trunk: Vec<Prop>,
    /// Crown placement relative to `group`.
    pub crown: Transform,
    pub fronds: Vec<Frond>,
    /// Stem and leaves shared by every frond, relative to the frond.
    pub frond_parts: Vec<Prop>,
    sway: WindSway,
    elapsed: f32,
}

impl PalmTree {
    pub fn start(seed: u64) -> Self {
        tracing::info!("palm tree: starting initialization");
        let mut rng = StdRng::seed_from_u64(seed);

        let mut trunk = trunk_segments();
        trunk.extend(bark_details(&mut rng));

        let fronds = (0..FRONDS)
            .map(|i| {
                let angle = i as f32 / FRONDS as f32 * TAU;
                let baseline = EulerRotation::new(
                    angle.sin() * FROND_TILT,
                    angle,
                    angle.cos() * FROND_TILT,
                );
                Frond {
                    baseline,
                    rotation: baseline,
                }
            })
            .collect();

        let lean = EulerRotation::new(
            (rng.random::<f32>() - 0.5) * 2.0 * LEAN_SPREAD,
            FRAC_PI_4,
            (rng.random::<f32>() - 0.5) * 2.0 * LEAN_SPREAD,
        );

        tracing::info!("palm tree: initialization complete");
        Self {
            group: Transform::from_euler(PALM_POSITION, lean),
            trunk,
            crown: Transform::from_euler(
                Vec3::new(0.0, TRUNK_HEIGHT, 0.0),
                EulerRotation::new(BEND_ANGLE, 0.0, 0.0),
            ),
            fronds,
            frond_parts: frond_parts(),
            sway: WindSway::default(),
            elapsed: 0.0,
        }
    }

    /// Sway every frond around its baseline.
    pub fn update(&mut self, delta: f32) {
        self.elapsed += delta;
        for (i, frond) in self.fronds.iter_mut().enumerate() {
            let phase = i as f32 * FROND_PHASE_STEP;
            frond.rotation = self.sway.apply(frond.baseline, self.elapsed, phase);
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.group.matrix()
    }

    /// World matrix of frond `index`.
    pub fn frond_matrix(&self, index: usize) -> Option<Mat4> {
        let frond = self.fronds.get(index)?;
        Some(self.matrix() * self.crown.matrix() * Mat4::from_quat(frond.rotation.to_quat()))
    }

    /// Visit every prop of the tree with its world matrix.
    pub fn for_each_prop(&self, mut visit: impl FnMut(Mat4, &Prop)) {
        let root = self.matrix();
        for prop in &self.trunk {
            visit(prop.world(root), prop);
        }
        for index in 0..self.fronds.len() {
            if let Some(frond) = self.frond_matrix(index) {
                for part in &self.frond_parts {
                    visit(part.world(frond), part);
                }
            }
        }
    }

    pub fn prop_count(&self) -> usize {
        self.trunk.len() + self.fronds.len() * self.frond_parts.len()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

fn trunk_segments() -> Vec<Prop> {
    let height = TRUNK_HEIGHT / TRUNK_SEGMENTS as f32;
    (0..TRUNK_SEGMENTS)
        .map(|i| {
            // Mean of the segment's bottom and top radii.
            let radius = TRUNK_RADIUS * (1.0 - (i as f32 + 0.5) * TAPER);
            let bend = i as f32 / TRUNK_SEGMENTS as f32 * BEND_ANGLE;
            let transform = Transform::from_euler(
                Vec3::new(0.0, i as f32 * height + height / 2.0, 0.0),
                EulerRotation::new(bend, 0.0, 0.0),
            );
            Prop::cylinder(radius, height, transform, TRUNK_COLOR)
        })
        .collect()
}

fn bark_details(rng: &mut StdRng) -> Vec<Prop> {
    (0..BARK_DETAILS)
        .map(|_| {
            let angle = rng.random::<f32>() * TAU;
            let height = rng.random::<f32>() * TRUNK_HEIGHT;
            let inset = TRUNK_RADIUS - BARK_RADIUS;
            let transform = Transform::from_euler(
                Vec3::new(angle.cos() * inset, height, angle.sin() * inset),
                EulerRotation::new(
                    rng.random::<f32>() * 0.5,
                    angle,
                    FRAC_PI_2 + rng.random::<f32>() * 0.5,
                ),
            );
            Prop::cylinder(BARK_RADIUS, BARK_LENGTH, transform, BARK_COLOR)
        })
        .collect()
}

/// A stem along +X with leaf pairs fanning out on both sides.
fn frond_parts() -> Vec<Prop> {
    let mut parts = Vec::with_capacity(1 + LEAF_PAIRS * 2);
    parts.push(Prop::cylinder(
        STEM_RADIUS,
        FROND_LENGTH,
        Transform::from_euler(
            Vec3::new(FROND_LENGTH / 2.0, 0.0, 0.0),
            EulerRotation::new(0.0, 0.0, FRAC_PI_2),
        ),
        STEM_COLOR,
    ));
    for i in 0..LEAF_PAIRS {
        for side in [-1.0f32, 1.0] {
            let transform = Transform::from_euler(
                Vec3::new(i as f32 / LEAF_PAIRS as f32 * FROND_LENGTH, 0.0, 0.0),
                EulerRotation::new(FRAC_PI_2, 0.0, FRAC_PI_4 * side + i as f32 * 0.1),
            )
            .with_scale(Vec3::new(0.5, 1.0, 0.1));
            parts.push(Prop::cone(LEAF_RADIUS, LEAF_LENGTH, transform, LEAF_COLOR));
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop::Shape;

    #[test]
    fn tree_structure() {
        let tree = PalmTree::start(1);
        assert_eq!(tree.trunk.len(), TRUNK_SEGMENTS + BARK_DETAILS);
        assert_eq!(tree.fronds.len(), FRONDS);
        assert_eq!(tree.frond_parts.len(), 1 + LEAF_PAIRS * 2);
        assert_eq!(tree.group.position, PALM_POSITION);
        let mut visited = 0;
        tree.for_each_prop(|_, _| visited += 1);
        assert_eq!(visited, tree.prop_count());
    }

    #[test]
    fn trunk_tapers_and_bends() {
        let segments = trunk_segments();
        for pair in segments.windows(2) {
            assert!(pair[1].local.scale.x < pair[0].local.scale.x);
            assert!(pair[1].local.position.y > pair[0].local.position.y);
        }
        assert!(segments[0].local.rotation.abs_diff_eq(glam::Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn leaves_are_cones() {
        let parts = frond_parts();
        assert_eq!(parts[0].shape, Shape::Cylinder);
        assert!(parts[1..].iter().all(|p| p.shape == Shape::Cone));
    }

    #[test]
    fn lean_is_small_and_seeded() {
        let a = PalmTree::start(5);
        let b = PalmTree::start(5);
        assert_eq!(a.group, b.group);
        let (x, y, z) = a.group.rotation.to_euler(glam::EulerRot::XYZ);
        assert!(x.abs() <= LEAN_SPREAD + 1e-4);
        assert!(z.abs() <= LEAN_SPREAD + 1e-4);
        assert!((y - FRAC_PI_4).abs() < 0.1);
    }

    #[test]
    fn sway_keeps_yaw_and_starts_at_baseline() {
        let mut tree = PalmTree::start(2);
        tree.update(0.0);
        assert_eq!(tree.fronds[0].rotation, tree.fronds[0].baseline);
        for _ in 0..30 {
            tree.update(0.1);
        }
        for frond in &tree.fronds {
            assert_eq!(frond.rotation.y, frond.baseline.y);
            assert!((frond.rotation.x - frond.baseline.x).abs() <= 0.02 + 1e-6);
            assert!((frond.rotation.z - frond.baseline.z).abs() <= 0.02 + 1e-6);
        }
        assert_ne!(tree.fronds[3].rotation, tree.fronds[3].baseline);
    }

    #[test]
    fn crown_sits_on_trunk() {
        let tree = PalmTree::start(0);
        let m = tree.frond_matrix(0).unwrap();
        let top = m.transform_point3(Vec3::ZERO);
        assert!(top.y > TRUNK_HEIGHT - 0.5);
        assert!(tree.frond_matrix(FRONDS).is_none());
    }
}
