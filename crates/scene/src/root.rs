use beachfire_input::Action;
use glam::Vec3;

use crate::{
    Beach, CameraRig, Campfire, Characters, Ocean, PalmTree, SceneConfig, SceneError, Sky,
    splitmix64,
};

/// Owner of every scene component.
///
/// Components are optional: if start-up fails part way, the ones built
/// before the failure stay in the scene and keep animating. Nothing outside
/// the root holds a reference to them.
#[derive(Debug)]
pub struct SceneRoot {
    pub camera: CameraRig,
    pub sky: Option<Sky>,
    pub ocean: Option<Ocean>,
    pub beach: Option<Beach>,
    pub campfire: Option<Campfire>,
    pub characters: Option<Characters>,
    pub palm_tree: Option<PalmTree>,
    config: SceneConfig,
    elapsed: f32,
    startup_error: Option<SceneError>,
}

impl SceneRoot {
    /// Scene with a camera and nothing else.
    pub fn empty(config: SceneConfig) -> Self {
        Self {
            camera: CameraRig::default(),
            sky: None,
            ocean: None,
            beach: None,
            campfire: None,
            characters: None,
            palm_tree: None,
            config,
            elapsed: 0.0,
            startup_error: None,
        }
    }

    /// Build every component in update order. A failure is logged and
    /// stops the build; whatever was built before it is kept.
    pub fn start(config: SceneConfig) -> Self {
        tracing::info!(?config, "scene: starting initialization");
        let mut scene = Self::empty(config);
        match scene.build() {
            Ok(()) => tracing::info!("scene: initialization complete"),
            Err(e) => {
                tracing::error!("error during scene component initialization: {e}");
                scene.startup_error = Some(e);
            }
        }
        scene
    }

    fn build(&mut self) -> Result<(), SceneError> {
        let fire_seed = splitmix64(self.config.seed);
        let palm_seed = splitmix64(fire_seed);

        self.sky = Some(Sky::start());
        self.ocean = Some(Ocean::start());
        self.beach = Some(Beach::start());
        self.campfire = Some(Campfire::start(fire_seed)?);
        self.characters = Some(Characters::start(
            self.config.sprite_count,
            self.config.character_frame_duration,
        )?);
        self.palm_tree = Some(PalmTree::start(palm_seed));
        Ok(())
    }

    /// Advance every component by `delta` seconds in the fixed order sky,
    /// ocean, beach, campfire, characters, palm tree.
    pub fn update(&mut self, delta: f32) -> Result<(), SceneError> {
        if !(delta.is_finite() && delta >= 0.0) {
            return Err(SceneError::InvalidDelta(delta));
        }
        self.elapsed += delta;
        let eye = self.camera.position;

        if let Some(sky) = &mut self.sky {
            sky.update();
        }
        if let Some(ocean) = &mut self.ocean {
            ocean.update(delta);
        }
        if let Some(beach) = &mut self.beach {
            beach.update(eye);
        }
        if let Some(campfire) = &mut self.campfire {
            campfire.update(delta);
            if !campfire.light.intensity.is_finite() {
                return Err(SceneError::NonFinite {
                    component: "campfire",
                });
            }
        }
        if let Some(characters) = &mut self.characters {
            characters.update(delta, eye);
        }
        if let Some(palm_tree) = &mut self.palm_tree {
            palm_tree.update(delta);
        }

        if !self.camera.is_finite() {
            return Err(SceneError::NonFinite { component: "camera" });
        }
        Ok(())
    }

    /// Apply a user action. Returns `true` when the scene changed.
    /// Recording and overlay actions belong to the host and are ignored.
    pub fn apply(&mut self, action: &Action) -> Result<bool, SceneError> {
        match action {
            Action::Zoom(direction) => Ok(self.camera.zoom(*direction)),
            Action::Resize { width, height } => {
                self.camera.resize(*width, *height);
                Ok(true)
            }
            Action::SelectSpriteCount(count) => {
                self.set_sprite_count(*count)?;
                Ok(true)
            }
            Action::StartRecording
            | Action::StopRecording
            | Action::ToggleOverlay
            | Action::Noop => Ok(false),
        }
    }

    /// Reseat the characters with a new count.
    pub fn set_sprite_count(&mut self, count: u8) -> Result<(), SceneError> {
        let characters = Characters::start(count, self.config.character_frame_duration)?;
        self.config.sprite_count = characters.len() as u8;
        tracing::info!(count = characters.len(), "sprite count changed");
        self.characters = Some(characters);
        Ok(())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Scene time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn startup_error(&self) -> Option<&SceneError> {
        self.startup_error.as_ref()
    }

    pub fn eye(&self) -> Vec3 {
        self.camera.position
    }

    /// Number of components that were built.
    pub fn component_count(&self) -> usize {
        [
            self.sky.is_some(),
            self.ocean.is_some(),
            self.beach.is_some(),
            self.campfire.is_some(),
            self.characters.is_some(),
            self.palm_tree.is_some(),
        ]
        .into_iter()
        .filter(|built| *built)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beachfire_input::ZoomDirection;

    #[test]
    fn start_builds_everything() {
        let scene = SceneRoot::start(SceneConfig::default());
        assert_eq!(scene.component_count(), 6);
        assert!(scene.startup_error().is_none());
        assert_eq!(scene.characters.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn failed_start_keeps_earlier_components() {
        let config = SceneConfig {
            character_frame_duration: -1.0,
            ..SceneConfig::default()
        };
        let mut scene = SceneRoot::start(config);
        assert!(scene.campfire.is_some());
        assert!(scene.characters.is_none());
        assert!(scene.palm_tree.is_none());
        assert!(matches!(
            scene.startup_error(),
            Some(SceneError::Init { component: "characters", .. })
        ));
        // What was built still animates.
        scene.update(0.1).unwrap();
    }

    #[test]
    fn update_rejects_invalid_delta() {
        let mut scene = SceneRoot::start(SceneConfig::default());
        assert!(matches!(scene.update(f32::NAN), Err(SceneError::InvalidDelta(_))));
        assert!(matches!(scene.update(-0.1), Err(SceneError::InvalidDelta(_))));
        assert_eq!(scene.elapsed(), 0.0);
    }

    #[test]
    fn beach_tracks_camera_after_zoom() {
        let mut scene = SceneRoot::start(SceneConfig::default());
        assert!(scene.apply(&Action::Zoom(ZoomDirection::In)).unwrap());
        scene.update(0.016).unwrap();
        let beach = scene.beach.as_ref().unwrap();
        assert_eq!(beach.transform.position.z, scene.camera.position.z);
        assert_eq!(beach.transform.position.y, 0.0);
    }

    #[test]
    fn scrolling_down_moves_toward_target() {
        let mut scene = SceneRoot::start(SceneConfig::default());
        let before = scene.camera.distance();
        assert!(scene.apply(&Action::from_wheel(120.0)).unwrap());
        assert!(scene.camera.distance() < before);
        assert!(scene.apply(&Action::from_wheel(-120.0)).unwrap());
        assert!((scene.camera.distance() - before).abs() < 1e-4);
    }

    #[test]
    fn sprite_count_action_reseats_characters() {
        let mut scene = SceneRoot::start(SceneConfig::default());
        assert!(scene.apply(&Action::SelectSpriteCount(6)).unwrap());
        assert_eq!(scene.characters.as_ref().unwrap().len(), 6);
        assert_eq!(scene.config().sprite_count, 6);
    }

    #[test]
    fn host_actions_are_ignored() {
        let mut scene = SceneRoot::start(SceneConfig::default());
        assert!(!scene.apply(&Action::StartRecording).unwrap());
        assert!(!scene.apply(&Action::Noop).unwrap());
    }

    #[test]
    fn same_seed_same_scene() {
        let mut a = SceneRoot::start(SceneConfig::default().with_seed(9));
        let mut b = SceneRoot::start(SceneConfig::default().with_seed(9));
        for _ in 0..60 {
            a.update(1.0 / 60.0).unwrap();
            b.update(1.0 / 60.0).unwrap();
        }
        let fa = a.campfire.as_ref().unwrap();
        let fb = b.campfire.as_ref().unwrap();
        assert_eq!(fa.light.intensity, fb.light.intensity);
        assert_eq!(fa.particles[0].emitter.positions(), fb.particles[0].emitter.positions());
        assert_eq!(a.palm_tree.as_ref().unwrap().group, b.palm_tree.as_ref().unwrap().group);
    }
}
