//! Rising hazard (lava) line
//!
//! The line climbs at a constant rate but is clamped into a band around the
//! camera bottom: it never lags more than the floor margin below it and never
//! jumps more than the ceiling margin above it. While playing, the hazard
//! also drives the background explosions and the red-alert pulse.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use super::scheduler::Deferred;
use super::state::{Cue, Session, VisualKind};
use crate::consts::RED_ALERT_PERIOD;

/// Number of distinct explosion cues
pub const EXPLOSION_VARIANTS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardTracker {
    /// Current hazard line
    pub y: f32,
    since_explosion: f32,
    next_explosion: f32,
    red_alert_time: f32,
}

impl HazardTracker {
    pub fn new(y: f32, first_explosion_delay: f32) -> Self {
        Self {
            y,
            since_explosion: 0.0,
            next_explosion: first_explosion_delay,
            red_alert_time: 0.0,
        }
    }

    /// Contact predicate: the player is below `y + margin`
    #[inline]
    pub fn is_touching(&self, player_y: f32, margin: f32) -> bool {
        player_y < self.y + margin
    }

    /// Move the line up by `velocity * dt`, then clamp it into
    /// `[camera_bottom - floor_margin, camera_bottom + ceiling_margin]`
    pub fn advance(
        &mut self,
        dt: f32,
        velocity: f32,
        camera_bottom: f32,
        floor_margin: f32,
        ceiling_margin: f32,
    ) -> f32 {
        let stepped = self.y + velocity * dt;
        self.y = stepped
            .max(camera_bottom - floor_margin)
            .min(camera_bottom + ceiling_margin);
        self.y
    }

    /// Returns true when a background explosion should fire this tick and
    /// rolls the next interval.
    pub fn explosion_due(&mut self, dt: f32, rng: &mut SimRng, min: f32, max: f32) -> bool {
        self.since_explosion += dt;
        if self.since_explosion > self.next_explosion {
            self.next_explosion = rng.real(min, max);
            self.since_explosion = 0.0;
            true
        } else {
            false
        }
    }

    /// Advance the red-alert pulse; returns a blend factor in `0..=1`
    pub fn red_alert(&mut self, dt: f32) -> f32 {
        self.red_alert_time += dt;
        let phase = self.red_alert_time * std::f32::consts::TAU / RED_ALERT_PERIOD;
        (phase.sin() + 1.0) / 2.0
    }
}

/// Per-tick hazard stage while playing: move the line, pulse the alert,
/// and maybe set off a background explosion.
pub fn update_hazard(session: &mut Session, dt: f32) {
    let camera = session.camera_position();
    let t = &session.tuning;
    let (velocity, floor, ceiling) = (t.hazard_velocity, t.hazard_floor_margin, t.hazard_ceiling_margin);
    session.hazard.advance(dt, velocity, camera.y, floor, ceiling);
    session.red_alert = session.hazard.red_alert(dt);

    let (min, max) = (t.explosion_interval_min, t.explosion_interval_max);
    if session.hazard.explosion_due(dt, &mut session.rng, min, max) {
        random_explosion(session);
    }
}

fn random_explosion(session: &mut Session) {
    let camera = session.camera_position();
    let height = session.viewport.height;
    let pos = Vec2::new(
        session.rng.real(0.0, camera.x * 2.0),
        session.rng.real(camera.y - height * 0.75, camera.y + height),
    );
    let n = session.rng.index(EXPLOSION_VARIANTS);
    session.cue(Cue::Explosion(n as u8));
    let lifetime = session.tuning.explosion_lifetime;
    let handle = session.spawn_visual(VisualKind::Explosion, pos, 0.25 * (n + 1) as f32);
    session.scheduler.schedule(lifetime, Deferred::RemoveVisual(handle));
    if n == EXPLOSION_VARIANTS - 1 {
        session.shake(session.tuning.shake_random_explosion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rises_at_constant_rate() {
        let mut hazard = HazardTracker::new(0.0, 1.0);
        hazard.advance(0.5, 120.0, 100.0, 125.0, 180.0);
        assert_eq!(hazard.y, 60.0);
    }

    #[test]
    fn test_floor_pulls_hazard_up_to_camera() {
        let mut hazard = HazardTracker::new(-5000.0, 1.0);
        hazard.advance(1.0 / 60.0, 120.0, 1000.0, 125.0, 180.0);
        assert_eq!(hazard.y, 875.0);
    }

    #[test]
    fn test_ceiling_never_exceeded() {
        let mut hazard = HazardTracker::new(0.0, 1.0);
        for _ in 0..10_000 {
            hazard.advance(1.0 / 60.0, 120.0, 100.0, 125.0, 180.0);
            assert!(hazard.y <= 100.0 + 180.0);
        }
        assert_eq!(hazard.y, 280.0);
    }

    #[test]
    fn test_contact_margin() {
        let hazard = HazardTracker::new(0.0, 1.0);
        assert!(hazard.is_touching(179.0, 180.0));
        assert!(!hazard.is_touching(180.0, 180.0));
    }

    #[test]
    fn test_explosion_timing() {
        let mut hazard = HazardTracker::new(0.0, 1.0);
        let mut rng = SimRng::new(9);
        assert!(!hazard.explosion_due(0.6, &mut rng, 0.1, 0.5));
        assert!(hazard.explosion_due(0.6, &mut rng, 0.1, 0.5));
        // Next interval is at most 0.5s
        assert!(hazard.explosion_due(0.51, &mut rng, 0.1, 0.5));
    }

    #[test]
    fn test_red_alert_range() {
        let mut hazard = HazardTracker::new(0.0, 1.0);
        for _ in 0..500 {
            let blend = hazard.red_alert(1.0 / 60.0);
            assert!((0.0..=1.0).contains(&blend));
        }
    }
}
