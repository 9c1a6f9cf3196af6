//! Player body and player state machine
//!
//! The body is integrated by the physics step; the state machine reads its
//! vertical velocity each tick and the hazard line to pick Jump, Fall or Lava.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fsm::{State, StateMachine};
use super::scheduler::Deferred;
use super::state::{Cue, Effect, Session, VisualHandle, VisualKind};
use crate::Rect;
use crate::consts::*;

/// Horizontal speed above which the steer animation plays
const STEER_ANIM_THRESHOLD: f32 = 100.0;

/// Animation key exposed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Jump,
    Fall,
    SteerLeft,
    SteerRight,
}

/// The controlled body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Integrated by physics only when dynamic
    pub dynamic: bool,
    pub anim: PlayerAnim,
    /// Continuous trail visual, if spawned
    pub trail: Option<VisualHandle>,
}

impl PlayerBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            dynamic: false,
            anim: PlayerAnim::Idle,
            trail: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Raise vertical velocity to at least `amount` (never slows the body)
    pub fn set_velocity_floor(&mut self, amount: f32) {
        self.vel.y = self.vel.y.max(amount);
    }

    /// Horizontal velocity follows the smoothed tilt
    pub fn steer(&mut self, tilt: f32, gain: f32) {
        self.vel.x = tilt * gain;
    }

    /// Leaving one side of the scene re-enters from the other
    pub fn wrap(&mut self, scene_width: f32) {
        let half = self.size.x / 2.0;
        if self.pos.x < -half {
            self.pos.x = scene_width + half;
        } else if self.pos.x > scene_width + half {
            self.pos.x = -half;
        }
    }

    fn airborne_anim(&mut self, base: PlayerAnim) {
        self.anim = if self.vel.x.abs() > STEER_ANIM_THRESHOLD {
            if self.vel.x < 0.0 {
                PlayerAnim::SteerLeft
            } else {
                PlayerAnim::SteerRight
            }
        } else {
            base
        };
    }
}

/// Exponentially smoothed tilt sensor value
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TiltFilter {
    value: f32,
}

impl TiltFilter {
    /// Blend a new sample in with weight `smoothing`
    pub fn sample(&mut self, raw: f32, smoothing: f32) -> f32 {
        self.value = raw * smoothing + self.value * (1.0 - smoothing);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Player body state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Before motion starts
    Idle,
    /// Moving up (vertical velocity >= 0)
    Jump,
    /// Moving down
    Fall,
    /// Touching the hazard
    Lava,
    /// Out of lives
    Dead,
}

impl State for PlayerState {
    type Context = Session;

    fn is_valid_next_state(self, next: Self) -> bool {
        use PlayerState::*;
        match self {
            Idle => matches!(next, Jump | Fall),
            Jump => matches!(next, Fall | Lava),
            Fall => matches!(next, Jump | Lava),
            Lava => matches!(next, Jump | Fall | Dead),
            Dead => false,
        }
    }

    fn did_enter(self, _previous: Option<Self>, session: &mut Session) {
        match self {
            PlayerState::Idle => {
                session.player.dynamic = false;
                session.player.anim = PlayerAnim::Idle;
            }
            PlayerState::Jump => session.player.airborne_anim(PlayerAnim::Jump),
            PlayerState::Fall => session.player.airborne_anim(PlayerAnim::Fall),
            PlayerState::Lava => {
                session.effect(Effect::TrailEmission { enabled: false });
                session.cue(Cue::HitLava);

                let smoke = session.spawn_visual(VisualKind::SmokeTrail, session.player.pos, 1.0);
                let lifetime = session.tuning.smoke_trail_lifetime;
                session.scheduler.schedule(lifetime, Deferred::StopVisual(smoke));

                let boost = session.tuning.boost();
                session.player.set_velocity_floor(boost);
                session.lives = session.lives.saturating_sub(1);
                session.shake(session.tuning.shake_lava);
                log::info!("Hazard contact, {} lives left", session.lives);
            }
            PlayerState::Dead => {
                session.player.dynamic = false;
                session.player.vel = Vec2::ZERO;
                session.effect(Effect::TrailEmission { enabled: false });
                session.cue(Cue::PlayerDie);
                log::info!("Player died at y={:.0}", session.player.pos.y);
            }
        }
    }
}

/// Per-tick decision: hazard contact wins, otherwise the sign of the
/// vertical velocity picks Fall or Jump. Also applies tilt steering.
pub fn update_player(fsm: &mut StateMachine<PlayerState>, session: &mut Session) {
    let tilt = session.tilt.value();
    session.player.steer(tilt, session.tuning.tilt_gain);
    session.player.wrap(session.scene_size.x);

    let touching = session
        .hazard
        .is_touching(session.player.pos.y, session.tuning.hazard_contact_margin);
    let next = if touching {
        PlayerState::Lava
    } else if session.player.vel.y < 0.0 {
        PlayerState::Fall
    } else {
        PlayerState::Jump
    };
    fsm.enter(next, session);

    match fsm.current() {
        PlayerState::Jump => session.player.airborne_anim(PlayerAnim::Jump),
        PlayerState::Fall => session.player.airborne_anim(PlayerAnim::Fall),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameEvent;
    use crate::tuning::Tuning;

    fn session() -> Session {
        Session::new(1, Tuning::default()).unwrap()
    }

    #[test]
    fn test_transition_table() {
        use PlayerState::*;
        assert!(Idle.is_valid_next_state(Jump));
        assert!(Idle.is_valid_next_state(Fall));
        assert!(!Idle.is_valid_next_state(Lava));
        assert!(Jump.is_valid_next_state(Fall));
        assert!(Fall.is_valid_next_state(Jump));
        assert!(Jump.is_valid_next_state(Lava));
        assert!(!Jump.is_valid_next_state(Jump));
        assert!(Lava.is_valid_next_state(Dead));
        assert!(!Fall.is_valid_next_state(Dead));
        for next in [Idle, Jump, Fall, Lava, Dead] {
            assert!(!Dead.is_valid_next_state(next));
        }
    }

    #[test]
    fn test_lava_entry_costs_one_life_and_boosts() {
        let mut session = session();
        let mut fsm = StateMachine::start(PlayerState::Idle, &mut session);
        assert!(fsm.enter(PlayerState::Fall, &mut session));
        session.player.vel.y = -500.0;
        session.events.clear();

        assert!(fsm.enter(PlayerState::Lava, &mut session));
        assert_eq!(session.lives, 2);
        assert_eq!(session.player.vel.y, session.tuning.boost());
        assert!(session.events.contains(&GameEvent::Cue(Cue::HitLava)));
        assert!(session.events.contains(&GameEvent::Effect(Effect::TrailEmission { enabled: false })));
        assert!(session
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SpawnVisual { kind: VisualKind::SmokeTrail, .. })));
        assert_eq!(session.scheduler.pending(), 1);
    }

    #[test]
    fn test_two_contacts_cost_two_lives() {
        let mut session = session();
        let mut fsm = StateMachine::start(PlayerState::Idle, &mut session);
        fsm.enter(PlayerState::Fall, &mut session);
        fsm.enter(PlayerState::Lava, &mut session);
        // Still in the hazard: repeated requests are rejected
        assert!(!fsm.enter(PlayerState::Lava, &mut session));
        assert_eq!(session.lives, 2);
        fsm.enter(PlayerState::Jump, &mut session);
        fsm.enter(PlayerState::Lava, &mut session);
        assert_eq!(session.lives, 1);
    }

    #[test]
    fn test_lives_never_go_negative() {
        let mut session = session();
        session.lives = 0;
        let mut fsm = StateMachine::start(PlayerState::Idle, &mut session);
        fsm.enter(PlayerState::Fall, &mut session);
        fsm.enter(PlayerState::Lava, &mut session);
        assert_eq!(session.lives, 0);
    }

    #[test]
    fn test_update_player_follows_velocity_sign() {
        let mut session = session();
        let mut fsm = StateMachine::start(PlayerState::Idle, &mut session);
        session.player.vel.y = 100.0;
        update_player(&mut fsm, &mut session);
        assert_eq!(fsm.current(), PlayerState::Jump);
        session.player.vel.y = -1.0;
        update_player(&mut fsm, &mut session);
        assert_eq!(fsm.current(), PlayerState::Fall);
        assert_eq!(session.player.anim, PlayerAnim::Fall);
    }

    #[test]
    fn test_update_player_detects_hazard() {
        let mut session = session();
        let mut fsm = StateMachine::start(PlayerState::Idle, &mut session);
        session.player.vel.y = -10.0;
        update_player(&mut fsm, &mut session);
        session.hazard.y = session.player.pos.y;
        update_player(&mut fsm, &mut session);
        assert_eq!(fsm.current(), PlayerState::Lava);
        assert_eq!(session.lives, 2);
    }

    #[test]
    fn test_wrap_around_edges() {
        let mut body = PlayerBody::new(Vec2::new(-PLAYER_WIDTH, 0.0));
        body.wrap(SCENE_WIDTH);
        assert_eq!(body.pos.x, SCENE_WIDTH + PLAYER_WIDTH / 2.0);
        body.pos.x = SCENE_WIDTH + PLAYER_WIDTH;
        body.wrap(SCENE_WIDTH);
        assert_eq!(body.pos.x, -PLAYER_WIDTH / 2.0);
    }

    #[test]
    fn test_tilt_filter_smoothing() {
        let mut tilt = TiltFilter::default();
        assert_eq!(tilt.sample(1.0, 0.75), 0.75);
        assert!((tilt.sample(1.0, 0.75) - 0.9375).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_floor_never_slows() {
        let mut body = PlayerBody::new(Vec2::ZERO);
        body.vel.y = 5000.0;
        body.set_velocity_floor(1625.0);
        assert_eq!(body.vel.y, 5000.0);
        body.vel.y = -200.0;
        body.set_velocity_floor(1625.0);
        assert_eq!(body.vel.y, 1625.0);
    }
}
