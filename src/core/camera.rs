//! Camera - viewport tracking with vertical hysteresis
//!
//! Horizontal position is a fixed offset behind the player. Vertically the
//! player may roam inside a band of the viewport; only the excess beyond a
//! band edge moves the camera, so the player re-enters at the boundary
//! rather than snapping to center.

use crate::types::{CAMERA_BACK, CAMERA_BAND_HIGH, CAMERA_BAND_LOW, CAMERA_GROUND_MARGIN};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World x of the viewport's left edge, in blocks.
    pub left: f64,
    /// World y of the viewport's bottom edge, in blocks.
    pub bottom: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self { left: -CAMERA_BACK, bottom: 0.0 }
    }

    /// Re-center on a freshly spawned player.
    pub fn reset(&mut self, player_x: f64, player_y: f64, view_h_blocks: f64) {
        self.left = player_x - CAMERA_BACK;
        self.bottom = (player_y - view_h_blocks * CAMERA_BAND_LOW).max(-CAMERA_GROUND_MARGIN);
    }

    /// Track the player for one frame. `view_h_blocks` is the viewport
    /// height in world blocks.
    pub fn track(&mut self, player_x: f64, player_y: f64, view_h_blocks: f64) {
        self.left = player_x - CAMERA_BACK;

        let band_low = self.bottom + view_h_blocks * CAMERA_BAND_LOW;
        let band_high = self.bottom + view_h_blocks * CAMERA_BAND_HIGH;

        if player_y < band_low {
            self.bottom -= band_low - player_y;
        } else if player_y > band_high {
            self.bottom += player_y - band_high;
        }
        if self.bottom < -CAMERA_GROUND_MARGIN {
            self.bottom = -CAMERA_GROUND_MARGIN;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
