//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by item ID)
//! - No rendering, audio or platform dependencies; those are fed through
//!   the [`GameEvent`] queue

pub mod camera;
pub mod catalog;
pub mod collision;
pub mod flow;
pub mod fsm;
pub mod hazard;
pub mod level;
pub mod physics;
pub mod player;
pub mod rng;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use camera::{CameraController, Viewport};
pub use catalog::{Archetype, Category, ItemKind, OverlayCatalog, Shape, Variant};
pub use collision::{BodyRef, ContactEvent, ContactOutcome, resolve_contact};
pub use flow::FlowState;
pub use fsm::{State, StateMachine};
pub use hazard::HazardTracker;
pub use level::{ItemId, LevelGenerator, OverlayInstance};
pub use player::{PlayerAnim, PlayerBody, PlayerState, TiltFilter};
pub use rng::SimRng;
pub use scheduler::{Deferred, Scheduler};
pub use state::{Cue, Effect, GameEvent, GameState, Music, Session, VisualHandle, VisualKind};
pub use tick::{TickInput, check_loss, handle_tap, tick};
