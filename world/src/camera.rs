//! Vertical follow camera.

use sky_chaser_core::tuning;

use crate::levels::LevelBounds;

/// Tracks the world-space y coordinate shown at the top of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Camera {
    offset_y: f32,
}

impl Camera {
    /// Places the camera directly on its target.
    pub(crate) fn snapped(player_center_y: f32, bounds: &LevelBounds) -> Self {
        Self {
            offset_y: target_offset(player_center_y, bounds),
        }
    }

    /// Eases the camera toward keeping the player in the lower third of the view.
    pub(crate) fn follow(&mut self, player_center_y: f32, bounds: &LevelBounds) {
        let target = target_offset(player_center_y, bounds);
        self.offset_y += (target - self.offset_y) * tuning::CAMERA_EASING;
        self.offset_y = clamp_offset(self.offset_y, bounds);
    }

    pub(crate) const fn offset_y(&self) -> f32 {
        self.offset_y
    }
}

fn target_offset(player_center_y: f32, bounds: &LevelBounds) -> f32 {
    let desired = player_center_y - tuning::VIEWPORT_HEIGHT * 2.0 / 3.0;
    clamp_offset(desired, bounds)
}

fn clamp_offset(offset: f32, bounds: &LevelBounds) -> f32 {
    let lowest = (bounds.bottom - tuning::VIEWPORT_HEIGHT).max(bounds.top);
    offset.clamp(bounds.top, lowest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tall_level() -> LevelBounds {
        LevelBounds {
            top: -800.0,
            bottom: 600.0,
        }
    }

    #[test]
    fn camera_never_scrolls_above_level_top() {
        let bounds = tall_level();
        let mut camera = Camera::snapped(-2_000.0, &bounds);
        assert_eq!(camera.offset_y(), -800.0);

        for _ in 0..200 {
            camera.follow(-5_000.0, &bounds);
            assert!(camera.offset_y() >= bounds.top);
        }
    }

    #[test]
    fn camera_rests_at_level_bottom_near_ground() {
        let bounds = tall_level();
        let camera = Camera::snapped(525.0, &bounds);
        assert_eq!(camera.offset_y(), 0.0);
    }

    #[test]
    fn camera_eases_toward_target() {
        let bounds = tall_level();
        let mut camera = Camera::snapped(525.0, &bounds);
        camera.follow(-100.0, &bounds);

        let target = -100.0 - 400.0;
        assert!((camera.offset_y() - target * 0.1).abs() < 1e-4);
    }
}
