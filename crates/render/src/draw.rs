use beachfire_anim::UvRect;
use beachfire_common::Rgb;
use beachfire_scene::beach::SAND_REPEAT;
use beachfire_scene::characters::SPRITE_SIZE;
use beachfire_scene::{Prop, SceneRoot, Shape};
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::RenderView;

/// Texture a quad samples from. Backends map keys to uploaded textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKey {
    Sand,
    /// Sprite sheet of the named character preset.
    Character(&'static str),
}

/// Unit meshes the lit pipeline draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Cube,
    Cylinder,
    Cone,
    /// Unit square in the XZ plane facing +Y.
    Plane,
}

impl From<Shape> for MeshKind {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Cube => MeshKind::Cube,
            Shape::Cylinder => MeshKind::Cylinder,
            Shape::Cone => MeshKind::Cone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub mesh: MeshKind,
    pub model: Mat4,
    pub color: [f32; 4],
    pub emissive: f32,
}

/// One camera-facing, additively blended point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleInstance {
    pub position: Vec3,
    pub size: f32,
    /// Alpha carries the emitter opacity.
    pub color: [f32; 4],
}

/// Unit quad in the XY plane facing +Z, textured through `uv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    pub model: Mat4,
    pub uv: UvRect,
    pub texture: TextureKey,
    pub tint: [f32; 4],
    /// Sprites are drawn unlit; the ground takes scene lighting.
    pub lit: bool,
}

/// Light colours are premultiplied by their intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: [f32; 3],
    /// Direction the sunlight travels.
    pub sun_direction: Vec3,
    pub sun_color: [f32; 3],
    pub point_position: Vec3,
    pub point_color: [f32; 3],
    /// Range beyond which the point light contributes nothing.
    pub point_distance: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: [0.25; 3],
            sun_direction: Vec3::NEG_Y,
            sun_color: [0.0; 3],
            point_position: Vec3::ZERO,
            point_color: [0.0; 3],
            point_distance: 1.0,
        }
    }
}

fn premultiplied(color: Rgb, intensity: f32) -> [f32; 3] {
    let c = color.scaled(intensity);
    [c.r, c.g, c.b]
}

/// Everything a backend needs to draw one frame, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub clear_color: [f32; 4],
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub camera_right: Vec3,
    pub camera_up: Vec3,
    pub lighting: Lighting,
    pub meshes: Vec<MeshInstance>,
    pub particles: Vec<ParticleInstance>,
    /// Opaque-with-cutout quads: the beach and character sprites.
    pub quads: Vec<TexturedQuad>,
}

impl DrawList {
    pub fn build(scene: &SceneRoot, view: &RenderView) -> Self {
        let mut list = Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            view_proj: view.view_projection(),
            eye: view.eye,
            camera_right: view.right(),
            camera_up: view.up(),
            lighting: Lighting::default(),
            meshes: Vec::new(),
            particles: Vec::new(),
            quads: Vec::new(),
        };

        if let Some(sky) = &scene.sky {
            list.clear_color = sky.clear_color.with_alpha(1.0);
            list.lighting.ambient = premultiplied(sky.ambient.color, sky.ambient.intensity);
            list.lighting.sun_direction = sky.sun.direction();
            list.lighting.sun_color = premultiplied(sky.sun.color, sky.sun.intensity);
        }

        if let Some(ocean) = &scene.ocean {
            list.meshes.push(MeshInstance {
                mesh: MeshKind::Plane,
                model: ocean.matrix(),
                color: ocean.color.with_alpha(1.0),
                emissive: 0.0,
            });
        }

        if let Some(beach) = &scene.beach {
            let offset = beach.uv_offset();
            list.quads.push(TexturedQuad {
                model: beach.matrix() * Mat4::from_rotation_x(-FRAC_PI_2),
                uv: UvRect {
                    u0: offset.x,
                    v0: offset.y,
                    u1: offset.x + SAND_REPEAT,
                    v1: offset.y + SAND_REPEAT,
                },
                texture: TextureKey::Sand,
                tint: [1.0; 4],
                lit: true,
            });
        }

        if let Some(campfire) = &scene.campfire {
            campfire.for_each_prop(|model, prop| list.push_prop(model, prop));

            list.lighting.point_position = campfire.light_world_position();
            list.lighting.point_color =
                premultiplied(campfire.light.color, campfire.light.intensity);
            list.lighting.point_distance = campfire.light.distance;

            let root = campfire.matrix();
            for system in &campfire.particles {
                let config = system.emitter.config();
                let color = config.color.with_alpha(system.emitter.opacity());
                list.particles.extend(system.emitter.positions().iter().map(|p| {
                    ParticleInstance {
                        position: root.transform_point3(*p),
                        size: config.size,
                        color,
                    }
                }));
            }
        }

        if let Some(characters) = &scene.characters {
            let root = characters.group.matrix();
            let plane = Mat4::from_scale(Vec3::new(SPRITE_SIZE.0, SPRITE_SIZE.1, 1.0));
            for member in &characters.members {
                list.quads.push(TexturedQuad {
                    model: root * member.local_transform().matrix() * plane,
                    uv: member.uv(),
                    texture: TextureKey::Character(member.preset.name),
                    tint: [1.0; 4],
                    lit: false,
                });
            }
        }

        if let Some(palm_tree) = &scene.palm_tree {
            palm_tree.for_each_prop(|model, prop| list.push_prop(model, prop));
        }

        tracing::trace!(
            meshes = list.meshes.len(),
            particles = list.particles.len(),
            quads = list.quads.len(),
            "draw list built"
        );
        list
    }

    fn push_prop(&mut self, model: Mat4, prop: &Prop) {
        self.meshes.push(MeshInstance {
            mesh: prop.shape.into(),
            model,
            color: prop.color.with_alpha(1.0),
            emissive: prop.emissive,
        });
    }

    pub fn instance_count(&self) -> usize {
        self.meshes.len() + self.particles.len() + self.quads.len()
    }

    /// Textures referenced by this frame, without duplicates.
    pub fn textures(&self) -> Vec<TextureKey> {
        let mut keys: Vec<_> = self.quads.iter().map(|q| q.texture).collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beachfire_scene::SceneConfig;

    fn scene() -> SceneRoot {
        let mut scene = SceneRoot::start(SceneConfig::default());
        scene.update(1.0 / 60.0).unwrap();
        scene
    }

    #[test]
    fn every_component_contributes() {
        let scene = scene();
        let list = DrawList::build(&scene, &RenderView::from_camera(&scene.camera));
        let palm = scene.palm_tree.as_ref().unwrap().prop_count();
        let logs = scene.campfire.as_ref().unwrap().logs.len();
        assert_eq!(list.meshes.len(), 1 + logs + palm);
        assert_eq!(list.particles.len(), 170);
        // Beach plus two characters.
        assert_eq!(list.quads.len(), 3);
        assert_eq!(
            list.textures(),
            vec![
                TextureKey::Sand,
                TextureKey::Character("andy"),
                TextureKey::Character("pete")
            ]
        );
    }

    #[test]
    fn empty_scene_draws_nothing() {
        let scene = SceneRoot::empty(SceneConfig::default());
        let list = DrawList::build(&scene, &RenderView::from_camera(&scene.camera));
        assert_eq!(list.instance_count(), 0);
        assert_eq!(list.lighting, Lighting::default());
    }

    #[test]
    fn beach_quad_faces_up() {
        let scene = scene();
        let list = DrawList::build(&scene, &RenderView::from_camera(&scene.camera));
        let beach = list.quads.iter().find(|q| q.texture == TextureKey::Sand).unwrap();
        let normal = beach.model.transform_vector3(Vec3::Z).normalize();
        assert!((normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn particles_sit_around_the_fire() {
        let scene = scene();
        let list = DrawList::build(&scene, &RenderView::from_camera(&scene.camera));
        let fire = scene.campfire.as_ref().unwrap().group.position;
        for p in &list.particles {
            assert!(p.position.distance(fire) < 4.0);
            assert!(p.color[3] >= 0.0 && p.color[3] <= 1.0);
        }
    }

    #[test]
    fn light_follows_flicker() {
        let scene = scene();
        let list = DrawList::build(&scene, &RenderView::from_camera(&scene.camera));
        let light = &scene.campfire.as_ref().unwrap().light;
        let expected = light.color.scaled(light.intensity);
        assert!((list.lighting.point_color[0] - expected.r).abs() < 1e-6);
        assert_eq!(list.lighting.point_distance, light.distance);
    }
}
