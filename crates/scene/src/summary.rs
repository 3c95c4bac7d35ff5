use crate::{ParticleKind, SceneRoot};

/// Read-only snapshot of scene state for logs and the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub elapsed: f32,
    pub seed: u64,
    pub components: usize,
    pub camera_distance: f32,
    pub particles: usize,
    pub fire_opacity: Option<f32>,
    pub light_intensity: Option<f32>,
    pub characters: usize,
    /// Current frame of every character, in roster order.
    pub character_frames: Vec<u32>,
    pub props: usize,
}

impl SceneSummary {
    pub fn of(scene: &SceneRoot) -> Self {
        let campfire = scene.campfire.as_ref();
        let characters = scene.characters.as_ref();
        let props = campfire.map_or(0, |c| c.logs.len())
            + scene.palm_tree.as_ref().map_or(0, |p| p.prop_count());
        Self {
            elapsed: scene.elapsed(),
            seed: scene.config().seed,
            components: scene.component_count(),
            camera_distance: scene.camera.distance(),
            particles: campfire.map_or(0, |c| c.particle_count()),
            fire_opacity: campfire
                .and_then(|c| c.system(ParticleKind::Fire))
                .map(|s| s.emitter.opacity()),
            light_intensity: campfire.map(|c| c.light.intensity),
            characters: characters.map_or(0, |c| c.len()),
            character_frames: characters
                .map(|c| c.members.iter().map(|m| m.frame()).collect())
                .unwrap_or_default(),
            props,
        }
    }
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: t={:.2}s seed={} components={} camera_distance={:.2} particles={} characters={} frames={:?} props={}",
            self.elapsed,
            self.seed,
            self.components,
            self.camera_distance,
            self.particles,
            self.characters,
            self.character_frames,
            self.props
        )?;
        if let Some(i) = self.light_intensity {
            write!(f, " light={i:.2}")?;
        }
        if let Some(o) = self.fire_opacity {
            write!(f, " fire_opacity={o:.2}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneConfig;

    #[test]
    fn summary_of_started_scene() {
        let scene = SceneRoot::start(SceneConfig::default());
        let s = SceneSummary::of(&scene);
        assert_eq!(s.components, 6);
        assert_eq!(s.particles, 170);
        assert_eq!(s.characters, 2);
        assert_eq!(s.character_frames, vec![0, 4]);
        let text = s.to_string();
        assert!(text.contains("components=6"));
        assert!(text.contains("light="));
    }

    #[test]
    fn summary_of_empty_scene() {
        let scene = SceneRoot::empty(SceneConfig::default());
        let s = SceneSummary::of(&scene);
        assert_eq!(s.components, 0);
        assert_eq!(s.light_intensity, None);
        assert!(!s.to_string().contains("light="));
    }
}
