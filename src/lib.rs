//! Drop Charge - vertical endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, camera, state machines, collisions)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and catalog errors
//!
//! Rendering, audio and input sampling live outside this crate. The simulation
//! talks to them through [`sim::TickInput`] and the [`sim::GameEvent`] queue.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{CatalogError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical scene dimensions (world units)
    pub const SCENE_WIDTH: f32 = 1536.0;
    pub const SCENE_HEIGHT: f32 = 2048.0;

    /// Player body
    pub const PLAYER_START_X: f32 = SCENE_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = 400.0;
    pub const PLAYER_WIDTH: f32 = 96.0;
    pub const PLAYER_HEIGHT: f32 = 140.0;

    /// Hazard boundary starts well below the player
    pub const HAZARD_START_Y: f32 = -600.0;

    /// Placement policy (percent, sampled 1..=100)
    pub const PLATFORM_PERCENT: u32 = 60;
    pub const PLAIN_PLATFORM_PERCENT: u32 = 75;
    pub const PLAIN_COIN_PERCENT: u32 = 75;

    /// Red alert pulse period (seconds)
    pub const RED_ALERT_PERIOD: f32 = 1.93725;
}

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle centred on `center` with the given full size
    #[inline]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Linear interpolation from `from` toward `to` by `t`
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
