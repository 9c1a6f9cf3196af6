//! Camera tracking and visibility
//!
//! The camera follows the higher of the player-derived target and the hazard
//! line, smoothed with a fixed per-tick lerp. That lerp is a single-pole
//! low-pass filter tied to the tick rate, not a physically exact spring.
//!
//! The camera's Y marks the bottom edge of the visible window. Its X is
//! stored with an overlap correction so that a viewport narrower or wider
//! than the logical scene never shows past the world edges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{Rect, lerp};

/// Physical viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Smoothed camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraController {
    /// Raw node position (focal point minus half the overlap on X)
    node: Vec2,
    scene_size: Vec2,
}

impl CameraController {
    pub fn new(scene_size: Vec2, focal: Vec2, viewport: Viewport) -> Self {
        let mut camera = Self {
            node: focal,
            scene_size,
        };
        camera.set_position(focal, viewport);
        camera
    }

    /// Scene units hidden (positive) or exposed (negative) horizontally when
    /// the scene is scaled to fill the viewport height
    pub fn overlap_amount(&self, viewport: Viewport) -> f32 {
        if viewport.height <= 0.0 || self.scene_size.y <= 0.0 {
            return 0.0;
        }
        let scale = viewport.height / self.scene_size.y;
        let scaled_width = self.scene_size.x * scale;
        let scaled_overlap = scaled_width - viewport.width;
        scaled_overlap / scale
    }

    /// Camera focal point
    pub fn position(&self, viewport: Viewport) -> Vec2 {
        Vec2::new(self.node.x + self.overlap_amount(viewport) / 2.0, self.node.y)
    }

    pub fn set_position(&mut self, focal: Vec2, viewport: Viewport) {
        self.node = Vec2::new(focal.x - self.overlap_amount(viewport) / 2.0, focal.y);
    }

    /// Move one step toward `max(player_y - lead * viewport.height, hazard_y)`
    pub fn update(&mut self, player_y: f32, hazard_y: f32, viewport: Viewport, lead: f32, lerp_factor: f32) -> Vec2 {
        let current = self.position(viewport);
        let target_y = (player_y - viewport.height * lead).max(hazard_y);
        let y = lerp(current.y, target_y, lerp_factor);
        let focal = Vec2::new(self.scene_size.x / 2.0, y);
        self.set_position(focal, viewport);
        focal
    }

    /// Visible window in world space
    pub fn view_rect(&self, viewport: Viewport) -> Rect {
        let focal = self.position(viewport);
        let visible_width = self.scene_size.x - self.overlap_amount(viewport);
        Rect {
            min: Vec2::new(focal.x - visible_width / 2.0, focal.y),
            max: Vec2::new(focal.x + visible_width / 2.0, focal.y + self.scene_size.y),
        }
    }

    /// An item is visible if it intersects the view, or sits at or above
    /// `forward_visibility` times the camera's Y.
    pub fn is_visible(&self, bounds: &Rect, item_y: f32, viewport: Viewport, forward_visibility: f32) -> bool {
        if self.view_rect(viewport).intersects(bounds) {
            return true;
        }
        item_y >= self.position(viewport).y * forward_visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    const SCENE: Vec2 = Vec2::new(SCENE_WIDTH, SCENE_HEIGHT);

    fn item(y: f32) -> Rect {
        Rect::from_center(Vec2::new(SCENE_WIDTH / 2.0, y), Vec2::new(100.0, 20.0))
    }

    #[test]
    fn test_overlap_zero_for_matching_aspect() {
        let vp = Viewport::new(SCENE_WIDTH / 2.0, SCENE_HEIGHT / 2.0);
        let camera = CameraController::new(SCENE, Vec2::new(SCENE_WIDTH / 2.0, 0.0), vp);
        assert!(camera.overlap_amount(vp).abs() < 1e-3);
    }

    #[test]
    fn test_overlap_for_narrow_device() {
        // 3:4 scene on a 9:16 screen hides part of the width
        let vp = Viewport::new(1080.0, 1920.0);
        let camera = CameraController::new(SCENE, Vec2::new(SCENE_WIDTH / 2.0, 0.0), vp);
        let overlap = camera.overlap_amount(vp);
        assert!(overlap > 0.0);
        // Focal point round-trips through the correction
        assert!((camera.position(vp).x - SCENE_WIDTH / 2.0).abs() < 1e-3);
        let rect = camera.view_rect(vp);
        assert!((rect.max.x - rect.min.x - (SCENE_WIDTH - overlap)).abs() < 1e-2);
    }

    #[test]
    fn test_update_lerps_toward_player_target() {
        let vp = Viewport::new(SCENE_WIDTH, SCENE_HEIGHT);
        let mut camera = CameraController::new(SCENE, Vec2::new(SCENE_WIDTH / 2.0, 0.0), vp);
        let player_y = 1000.0 + SCENE_HEIGHT * 0.4;
        let focal = camera.update(player_y, -500.0, vp, 0.4, 0.2);
        assert!((focal.y - 200.0).abs() < 1e-2);
        let focal = camera.update(player_y, -500.0, vp, 0.4, 0.2);
        assert!((focal.y - 360.0).abs() < 1e-2);
    }

    #[test]
    fn test_camera_never_lags_the_hazard_target() {
        let vp = Viewport::new(SCENE_WIDTH, SCENE_HEIGHT);
        let mut camera = CameraController::new(SCENE, Vec2::new(SCENE_WIDTH / 2.0, 0.0), vp);
        // Player stationary near the bottom, hazard above the player target
        for _ in 0..200 {
            camera.update(0.0, 800.0, vp, 0.4, 0.2);
        }
        assert!((camera.position(vp).y - 800.0).abs() < 1.0);
    }

    #[test]
    fn test_visibility_scenario() {
        let vp = Viewport::new(SCENE_WIDTH, 500.0);
        let camera = CameraController::new(SCENE, Vec2::new(SCENE_WIDTH / 2.0, 100.0), vp);
        assert!(camera.is_visible(&item(30.0), 30.0, vp, 0.25));
        assert!(!camera.is_visible(&item(10.0), 10.0, vp, 0.25));
    }

    #[test]
    fn test_item_inside_view_is_visible() {
        let vp = Viewport::new(SCENE_WIDTH, SCENE_HEIGHT);
        let camera = CameraController::new(SCENE, Vec2::new(SCENE_WIDTH / 2.0, 100.0), vp);
        assert!(camera.is_visible(&item(150.0), 150.0, vp, 0.25));
        // Straddling the bottom edge still counts as intersecting
        assert!(camera.is_visible(&item(95.0), 95.0, vp, 10.0));
    }
}
