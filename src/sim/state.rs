//! Game state and core simulation types
//!
//! [`Session`] is the simulation context every state action and per-tick
//! stage works against. [`GameState`] wraps it together with the two state
//! machines. A new session replaces the old one wholesale on restart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::{CameraController, Viewport};
use super::catalog::OverlayCatalog;
use super::flow::FlowState;
use super::fsm::StateMachine;
use super::hazard::HazardTracker;
use super::level::{ItemId, LevelGenerator, OverlayInstance};
use super::player::{PlayerBody, PlayerState, TiltFilter};
use super::rng::SimRng;
use super::scheduler::Scheduler;
use crate::consts::*;
use crate::error::TuningError;
use crate::tuning::Tuning;

/// Handle to a transient visual owned by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Transient visuals the core spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    Explosion,
    PlayerTrail,
    SmokeTrail,
    CollectNormal,
    CollectSpecial,
    BrokenPlatform,
}

/// Audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    BombDrop,
    TickTock,
    SuperBoost,
    Boost,
    Jump,
    Coin,
    Brick,
    HitLava,
    PlayerDie,
    /// Explosion variant `0..4`
    Explosion(u8),
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Music {
    Title,
    /// Game track with the alarm loop
    Game,
}

/// Fire-and-forget presentation effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    ScreenShake { amount: f32 },
    PlatformShake { item: ItemId },
    /// Item was consumed: shrink it out and drop its sprite
    ShrinkAndRemove { item: ItemId, pos: Vec2 },
    /// Countdown UI scales out
    HideCountdown,
    /// Armed device appears and starts its idle bounce
    ArmedDeviceIdle { pos: Vec2 },
    RemoveArmedDevice,
    TrailEmission { enabled: bool },
    GameOverBanner { pos: Vec2 },
    Music(Music),
}

/// Everything the presentation layer needs to hear about, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue(Cue),
    Effect(Effect),
    SpawnVisual {
        handle: VisualHandle,
        kind: VisualKind,
        pos: Vec2,
        intensity: f32,
    },
    StopVisual { handle: VisualHandle },
    RemoveVisual { handle: VisualHandle },
    /// A new background segment starts at `base_y`
    BackgroundSegment { base_y: f32 },
}

/// Simulation context for one session
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub catalog: OverlayCatalog,
    pub rng: SimRng,
    pub lives: u32,
    /// Coins collected
    pub score: u32,
    /// Elapsed simulation time (seconds)
    pub clock: f64,
    pub scene_size: Vec2,
    pub viewport: Viewport,
    pub player: PlayerBody,
    pub level: LevelGenerator,
    pub camera: CameraController,
    pub hazard: HazardTracker,
    pub scheduler: Scheduler,
    pub tilt: TiltFilter,
    /// Red-alert tint blend for background content
    pub red_alert: f32,
    /// Where the armed device sits during the countdown
    pub bomb_pos: Vec2,
    /// Items the player currently overlaps (for begin-contact detection)
    pub touching: Vec<ItemId>,
    /// Pending presentation events, drained by the frontend
    pub events: Vec<GameEvent>,
    next_visual: u32,
}

impl Session {
    /// Validate tuning and build a fresh session
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let catalog = OverlayCatalog::new(&tuning.footprints)?;
        Ok(Self::with_catalog(seed, tuning, catalog))
    }

    /// Build a session from already validated parts
    pub fn with_catalog(seed: u64, tuning: Tuning, catalog: OverlayCatalog) -> Self {
        let scene_size = Vec2::new(SCENE_WIDTH, SCENE_HEIGHT);
        let viewport = Viewport::new(SCENE_WIDTH, SCENE_HEIGHT);
        let player = PlayerBody::new(Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        let mut rng = SimRng::new(seed);

        let mut level = LevelGenerator::new(player.pos, player.size.y, &catalog, tuning.segment_height);
        let level_top = level.level_top();
        level.generate_up_to(level_top, &mut rng, &catalog);

        let focal = Vec2::new(
            SCENE_WIDTH / 2.0,
            player.pos.y - viewport.height * tuning.camera_lead,
        );
        let camera = CameraController::new(scene_size, focal, viewport);
        let hazard = HazardTracker::new(HAZARD_START_Y, tuning.first_explosion_delay);

        log::info!(
            "New session (seed={seed}, {} items up to y={:.0})",
            level.items().len(),
            level_top
        );

        Self {
            lives: tuning.lives,
            score: 0,
            clock: 0.0,
            scene_size,
            viewport,
            bomb_pos: player.pos + Vec2::new(0.0, player.size.y),
            player,
            level,
            camera,
            hazard,
            scheduler: Scheduler::new(),
            tilt: TiltFilter::default(),
            red_alert: 0.0,
            touching: Vec::new(),
            events: Vec::new(),
            next_visual: 1,
            rng,
            catalog,
            tuning,
        }
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn cue(&mut self, cue: Cue) {
        self.emit(GameEvent::Cue(cue));
    }

    #[inline]
    pub fn effect(&mut self, effect: Effect) {
        self.emit(GameEvent::Effect(effect));
    }

    /// Spawn a transient visual and return its handle
    pub fn spawn_visual(&mut self, kind: VisualKind, pos: Vec2, intensity: f32) -> VisualHandle {
        let handle = VisualHandle(self.next_visual);
        self.next_visual += 1;
        self.emit(GameEvent::SpawnVisual {
            handle,
            kind,
            pos,
            intensity,
        });
        handle
    }

    /// Screen shake, scaled by the game gain
    pub fn shake(&mut self, amount: f32) {
        let amount = self.tuning.shake(amount);
        self.effect(Effect::ScreenShake { amount });
    }

    pub fn camera_position(&self) -> Vec2 {
        self.camera.position(self.viewport)
    }

    pub fn jump_player(&mut self) {
        let amount = self.tuning.jump();
        self.player.set_velocity_floor(amount);
    }

    /// Special-coin boost, with its own shake
    pub fn boost_player(&mut self) {
        let amount = self.tuning.boost();
        self.player.set_velocity_floor(amount);
        self.shake(self.tuning.shake_boost);
    }

    pub fn super_boost_player(&mut self) {
        let amount = self.tuning.super_boost();
        self.player.set_velocity_floor(amount);
    }
}

/// Complete game state: the session plus its two state machines
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub session: Session,
    pub flow: StateMachine<FlowState>,
    pub player_fsm: StateMachine<PlayerState>,
}

impl GameState {
    /// Create a new game state with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        let session = Session::new(seed, tuning)?;
        Ok(Self::from_session(seed, session))
    }

    fn from_session(seed: u64, mut session: Session) -> Self {
        let flow = StateMachine::start(FlowState::WaitingForTap, &mut session);
        let player_fsm = StateMachine::start(PlayerState::Idle, &mut session);
        Self {
            seed,
            session,
            flow,
            player_fsm,
        }
    }

    /// Replace everything with a brand-new session. Pending deferred tasks
    /// and events of the old session are dropped.
    pub fn restart(&mut self) {
        let seed = self.session.rng.next_u64();
        let tuning = self.session.tuning.clone();
        let catalog = self.session.catalog.clone();
        log::info!("Restarting with seed {seed}");
        *self = Self::from_session(seed, Session::with_catalog(seed, tuning, catalog));
    }

    pub fn flow_state(&self) -> FlowState {
        self.flow.current()
    }

    pub fn player_state(&self) -> PlayerState {
        self.player_fsm.current()
    }

    pub fn camera_position(&self) -> Vec2 {
        self.session.camera_position()
    }

    pub fn items(&self) -> &[OverlayInstance] {
        self.session.level.items()
    }

    pub fn lives(&self) -> u32 {
        self.session.lives
    }

    /// Take all pending presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.session.events)
    }
}
