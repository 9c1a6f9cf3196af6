//! Data-driven game balance
//!
//! Every tuned constant the simulation reads lives here. Missing JSON fields
//! fall back to the shipped defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Footprint (full width/height) of one overlay shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Footprint {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// Footprints for each layout shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeFootprints {
    pub arrow: Footprint,
    pub five_across: Footprint,
    pub diagonal: Footprint,
    pub cross: Footprint,
}

/// Footprint table. Breakable platforms share the platform layouts and
/// special coins share the coin layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintTable {
    pub platform: ShapeFootprints,
    pub coin: ShapeFootprints,
}

impl Default for FootprintTable {
    fn default() -> Self {
        Self {
            platform: ShapeFootprints {
                arrow: Footprint::new(780.0, 560.0),
                five_across: Footprint::new(1100.0, 180.0),
                diagonal: Footprint::new(900.0, 720.0),
                cross: Footprint::new(600.0, 600.0),
            },
            coin: ShapeFootprints {
                arrow: Footprint::new(620.0, 520.0),
                five_across: Footprint::new(900.0, 140.0),
                diagonal: Footprint::new(720.0, 720.0),
                cross: Footprint::new(540.0, 540.0),
            },
        }
    }
}

/// Game balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Lives at session start
    pub lives: u32,

    // === Player impulses (floors on vertical velocity, scaled by game_gain) ===
    pub game_gain: f32,
    pub jump_velocity: f32,
    pub boost_velocity: f32,
    pub super_boost_velocity: f32,
    /// Downward acceleration (units/s², negative)
    pub gravity: f32,
    /// Horizontal velocity per unit of smoothed tilt
    pub tilt_gain: f32,
    /// Weight of the newest tilt sample in the exponential filter
    pub tilt_smoothing: f32,

    // === Camera ===
    /// Per-tick lerp factor toward the target
    pub camera_lerp: f32,
    /// Camera sits this fraction of the viewport height below the player
    pub camera_lead: f32,
    /// Items at or above `camera_y * forward_visibility` are never culled
    pub forward_visibility: f32,

    // === Level ===
    /// Extend once the camera passes `level_top - scene_height * extend_threshold`
    pub extend_threshold: f32,
    /// Height of one background segment
    pub segment_height: f32,

    // === Hazard ===
    pub hazard_velocity: f32,
    /// Hazard never lags more than this below the camera bottom
    pub hazard_floor_margin: f32,
    /// Hazard never rises more than this above the camera bottom
    pub hazard_ceiling_margin: f32,
    /// Player touches the hazard when `player.y < hazard.y + contact_margin`
    pub hazard_contact_margin: f32,
    pub explosion_interval_min: f32,
    pub explosion_interval_max: f32,
    pub first_explosion_delay: f32,

    // === Timings (seconds) ===
    pub bomb_delay: f32,
    pub smoke_trail_lifetime: f32,
    pub trail_fade: f32,
    pub explosion_lifetime: f32,
    pub particle_lifetime: f32,

    // === Shake amounts ===
    pub shake_boost: f32,
    pub shake_lava: f32,
    pub shake_bomb: f32,
    pub shake_game_over: f32,
    pub shake_random_explosion: f32,

    // === Catalog ===
    pub footprints: FootprintTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lives: 3,

            game_gain: 2.5,
            jump_velocity: 650.0,
            boost_velocity: 1200.0,
            super_boost_velocity: 1700.0,
            gravity: -1470.0,
            tilt_gain: 1000.0,
            tilt_smoothing: 0.75,

            camera_lerp: 0.2,
            camera_lead: 0.40,
            forward_visibility: 0.25,

            extend_threshold: 0.55,
            segment_height: SCENE_HEIGHT,

            hazard_velocity: 120.0,
            hazard_floor_margin: 125.0,
            hazard_ceiling_margin: 180.0,
            hazard_contact_margin: 180.0,
            explosion_interval_min: 0.1,
            explosion_interval_max: 0.5,
            first_explosion_delay: 1.0,

            bomb_delay: 2.0,
            smoke_trail_lifetime: 3.0,
            trail_fade: 1.0,
            explosion_lifetime: 2.0,
            particle_lifetime: 1.0,

            shake_boost: 40.0,
            shake_lava: 50.0,
            shake_bomb: 100.0,
            shake_game_over: 200.0,
            shake_random_explosion: 10.0,

            footprints: FootprintTable::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning (lives={}, gain={})", tuning.lives, tuning.game_gain);
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every documented range
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, value })
            }
        }

        fn unit(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, value })
            }
        }

        if self.lives == 0 {
            return Err(TuningError::OutOfRange {
                field: "lives",
                value: 0.0,
            });
        }
        positive("game_gain", self.game_gain)?;
        positive("jump_velocity", self.jump_velocity)?;
        positive("boost_velocity", self.boost_velocity)?;
        positive("super_boost_velocity", self.super_boost_velocity)?;
        if self.gravity >= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "gravity",
                value: self.gravity,
            });
        }
        unit("tilt_smoothing", self.tilt_smoothing)?;
        unit("camera_lerp", self.camera_lerp)?;
        unit("camera_lead", self.camera_lead)?;
        unit("forward_visibility", self.forward_visibility)?;
        unit("extend_threshold", self.extend_threshold)?;
        positive("segment_height", self.segment_height)?;
        positive("hazard_velocity", self.hazard_velocity)?;
        positive("hazard_contact_margin", self.hazard_contact_margin)?;
        if self.hazard_ceiling_margin < -self.hazard_floor_margin {
            return Err(TuningError::OutOfRange {
                field: "hazard_ceiling_margin",
                value: self.hazard_ceiling_margin,
            });
        }
        positive("explosion_interval_min", self.explosion_interval_min)?;
        if self.explosion_interval_max < self.explosion_interval_min {
            return Err(TuningError::OutOfRange {
                field: "explosion_interval_max",
                value: self.explosion_interval_max,
            });
        }
        positive("bomb_delay", self.bomb_delay)?;
        positive("smoke_trail_lifetime", self.smoke_trail_lifetime)?;
        positive("trail_fade", self.trail_fade)?;
        positive("explosion_lifetime", self.explosion_lifetime)?;
        positive("particle_lifetime", self.particle_lifetime)?;

        // Footprints are checked by the catalog itself
        crate::sim::OverlayCatalog::new(&self.footprints)?;
        Ok(())
    }

    /// Velocity floor for a normal jump
    #[inline]
    pub fn jump(&self) -> f32 {
        self.jump_velocity * self.game_gain
    }

    /// Velocity floor for a special-coin or hazard boost
    #[inline]
    pub fn boost(&self) -> f32 {
        self.boost_velocity * self.game_gain
    }

    /// Velocity floor for the launch out of the countdown
    #[inline]
    pub fn super_boost(&self) -> f32 {
        self.super_boost_velocity * self.game_gain
    }

    /// Shake amounts are scaled by the game gain like the impulses
    #[inline]
    pub fn shake(&self, amount: f32) -> f32 {
        amount * self.game_gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_impulse_ordering() {
        let t = Tuning::default();
        assert!(t.jump() < t.boost());
        assert!(t.boost() < t.super_boost());
        assert_eq!(t.jump(), 650.0 * 2.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t = Tuning::from_json(r#"{ "lives": 5, "hazard_velocity": 90.0 }"#).unwrap();
        assert_eq!(t.lives, 5);
        assert_eq!(t.hazard_velocity, 90.0);
        assert_eq!(t.camera_lerp, 0.2);
    }

    #[test]
    fn test_rejects_bad_lerp() {
        let err = Tuning::from_json(r#"{ "camera_lerp": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "camera_lerp",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_lives() {
        assert!(Tuning::from_json(r#"{ "lives": 0 }"#).is_err());
    }

    #[test]
    fn test_rejects_zero_height_footprint() {
        let mut t = Tuning::default();
        t.footprints.coin.cross.height = 0.0;
        assert!(matches!(t.validate(), Err(TuningError::Catalog(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ lives: "),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let mut t = Tuning::default();
        t.lives = 7;
        let json = t.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.lives, 7);
        assert_eq!(back.footprints, t.footprints);
    }
}
