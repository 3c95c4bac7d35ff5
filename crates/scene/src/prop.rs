use beachfire_common::{Rgb, Transform};
use glam::Mat4;

/// Primitive a prop is drawn with. Both are unit-sized and centred on the
/// origin; the prop transform scales them into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Cube,
    /// Diameter 1, height 1, axis along +Y.
    Cylinder,
    /// Base diameter 1 at y = -0.5, apex at y = 0.5.
    Cone,
}

/// A static, lit piece of scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop {
    pub shape: Shape,
    /// Transform relative to the owning component's group.
    pub local: Transform,
    pub color: Rgb,
    /// Self-illumination added on top of lighting, 0 for none.
    pub emissive: f32,
}

impl Prop {
    /// Cylinder of the given radius and length, placed by `transform`.
    pub fn cylinder(radius: f32, length: f32, transform: Transform, color: Rgb) -> Self {
        Self {
            shape: Shape::Cylinder,
            local: Transform {
                scale: transform.scale * glam::Vec3::new(radius * 2.0, length, radius * 2.0),
                ..transform
            },
            color,
            emissive: 0.0,
        }
    }

    /// Cone with base `radius`, apex `length` above the base.
    pub fn cone(radius: f32, length: f32, transform: Transform, color: Rgb) -> Self {
        Self {
            shape: Shape::Cone,
            ..Self::cylinder(radius, length, transform, color)
        }
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    /// World matrix given the parent's world matrix.
    pub fn world(&self, parent: Mat4) -> Mat4 {
        parent * self.local.matrix()
    }
}
