use crate::SceneRoot;

/// Frames whose camera position is logged at start-up.
const LOGGED_FRAMES: u64 = 5;

/// Drives [`SceneRoot::update`] once per rendered frame.
///
/// A failing frame is logged and skipped; the next tick runs normally.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    frame_count: u64,
    failed_frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the scene by `delta` seconds. Returns `false` if the frame
    /// failed.
    pub fn tick(&mut self, scene: &mut SceneRoot, delta: f32) -> bool {
        let _span = tracing::info_span!("frame", n = self.frame_count).entered();

        if self.frame_count < LOGGED_FRAMES {
            let p = scene.camera.position;
            tracing::info!(
                "rendering frame {} - camera position: {}, {}, {}",
                self.frame_count,
                p.x,
                p.y,
                p.z
            );
        }
        self.frame_count += 1;

        match scene.update(delta) {
            Ok(()) => true,
            Err(e) => {
                self.failed_frames += 1;
                tracing::error!("error during scene update: {e}");
                false
            }
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }
}
