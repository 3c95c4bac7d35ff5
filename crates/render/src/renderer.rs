use beachfire_scene::{CameraRig, SceneRoot, SceneSummary};
use glam::{Mat4, Vec3};
use std::fmt::Write;

use crate::DrawList;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&CameraRig::default())
    }
}

impl RenderView {
    pub fn from_camera(camera: &CameraRig) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            fov_degrees: camera.fov_degrees,
            aspect: camera.aspect,
            near: camera.near,
            far: camera.far,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far);
        proj * view
    }

    pub fn right(&self) -> Vec3 {
        (self.target - self.eye).cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross((self.target - self.eye).normalize_or_zero())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    type Output;

    /// Render one frame of the given scene from the given view.
    fn render(&self, scene: &SceneRoot, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable description of what would be drawn.
/// Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneRoot, view: &RenderView) -> String {
        let list = DrawList::build(scene, view);
        let summary = SceneSummary::of(scene);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Scene State (t={:.2}s, seed={}) ===",
            summary.elapsed, summary.seed
        );
        let _ = writeln!(out, "Components: {}", summary.components);
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        let _ = writeln!(
            out,
            "Draw: meshes={} particles={} quads={}",
            list.meshes.len(),
            list.particles.len(),
            list.quads.len()
        );

        if let Some(campfire) = &scene.campfire {
            let _ = writeln!(out, "  [light] intensity={:.2}", campfire.light.intensity);
            for system in &campfire.particles {
                let _ = writeln!(
                    out,
                    "  [{}] count={} opacity={:.2}",
                    system.kind.name(),
                    system.emitter.len(),
                    system.emitter.opacity()
                );
            }
        }
        if let Some(characters) = &scene.characters {
            for member in &characters.members {
                let p = characters.group.position + member.position;
                let _ = writeln!(
                    out,
                    "  [{}] frame={} pos=({:.2}, {:.2}, {:.2}) yaw={:.2}",
                    member.preset.name,
                    member.frame(),
                    p.x,
                    p.y,
                    p.z,
                    member.sprite.billboard.yaw()
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beachfire_scene::SceneConfig;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = SceneRoot::empty(SceneConfig::default());
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("t=0.00s"));
        assert!(output.contains("Components: 0"));
        assert!(output.contains("meshes=0"));
    }

    #[test]
    fn debug_renderer_full_scene() {
        let mut scene = SceneRoot::start(SceneConfig::default());
        scene.update(0.1).unwrap();
        let view = RenderView::from_camera(&scene.camera);
        let output = DebugTextRenderer::new().render(&scene, &view);
        assert!(output.contains("Components: 6"));
        assert!(output.contains("[fire] count=100"));
        assert!(output.contains("[pete] frame=0"));
        assert!(output.contains("[andy] frame=4"));
    }

    #[test]
    fn render_view_matches_camera() {
        let camera = CameraRig::default();
        let view = RenderView::from_camera(&camera);
        assert_eq!(view.view_projection(), camera.view_projection());
        assert!(view.right().dot(view.up()).abs() < 1e-5);
        assert_eq!(view.fov_degrees, 60.0);
    }
}
