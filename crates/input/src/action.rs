/// Largest sprite count selectable from the keyboard.
pub const MAX_SPRITE_COUNT: u8 = 8;

/// Direction of a wheel zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Toward the look-at target.
    In,
    /// Away from the look-at target.
    Out,
}

/// A high-level action produced by the window layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the camera one zoom step.
    Zoom(ZoomDirection),
    /// The drawable surface changed size.
    Resize { width: u32, height: u32 },
    /// Choose how many character sprites are shown; persisted for next start.
    SelectSpriteCount(u8),
    StartRecording,
    StopRecording,
    /// Show or hide the on-screen controls.
    ToggleOverlay,
    /// No-op (used for input that isn't bound).
    Noop,
}

impl Action {
    /// Map a vertical wheel delta. Positive deltas (scrolling down) zoom in.
    pub fn from_wheel(delta_y: f32) -> Self {
        if delta_y > 0.0 {
            Action::Zoom(ZoomDirection::In)
        } else if delta_y < 0.0 {
            Action::Zoom(ZoomDirection::Out)
        } else {
            Action::Noop
        }
    }

    /// Map a typed character. Digits `0..=8` select a sprite count.
    pub fn from_char(c: char) -> Self {
        match c.to_digit(10) {
            Some(d) if d <= MAX_SPRITE_COUNT as u32 => Action::SelectSpriteCount(d as u8),
            _ => {
                tracing::trace!(?c, "unbound key");
                Action::Noop
            }
        }
    }

    /// Map a resize, ignoring zero-sized (minimised) surfaces.
    pub fn from_resize(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            Action::Noop
        } else {
            Action::Resize { width, height }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_direction() {
        assert_eq!(Action::from_wheel(120.0), Action::Zoom(ZoomDirection::In));
        assert_eq!(Action::from_wheel(-3.0), Action::Zoom(ZoomDirection::Out));
        assert_eq!(Action::from_wheel(0.0), Action::Noop);
    }

    #[test]
    fn digit_keys_select_sprite_count() {
        assert_eq!(Action::from_char('0'), Action::SelectSpriteCount(0));
        assert_eq!(Action::from_char('8'), Action::SelectSpriteCount(8));
        assert_eq!(Action::from_char('9'), Action::Noop);
        assert_eq!(Action::from_char('x'), Action::Noop);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        assert_eq!(Action::from_resize(0, 600), Action::Noop);
        assert_eq!(
            Action::from_resize(800, 600),
            Action::Resize {
                width: 800,
                height: 600
            }
        );
    }
}
