//! Session phase state machine
//!
//! Menu -> armed countdown -> playing -> game over. The countdown ends on its
//! own through a deferred task; game over is terminal for the machine and a
//! restart builds a new session instead.

use serde::{Deserialize, Serialize};

use super::fsm::State;
use super::hazard::EXPLOSION_VARIANTS;
use super::scheduler::Deferred;
use super::state::{Cue, Effect, Music, Session, VisualKind};

/// Intensity of the countdown detonation
const BOMB_INTENSITY: f32 = 2.0;
/// Intensity of the game-over explosion
const GAME_OVER_INTENSITY: f32 = 3.0;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    /// Idle menu, waiting for the first tap
    WaitingForTap,
    /// Armed device counting down
    WaitingForBomb,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

fn big_explosion(session: &mut Session, pos: glam::Vec2, intensity: f32) {
    let handle = session.spawn_visual(VisualKind::Explosion, pos, intensity);
    let lifetime = session.tuning.explosion_lifetime;
    session.scheduler.schedule(lifetime, Deferred::RemoveVisual(handle));
    session.cue(Cue::Explosion((EXPLOSION_VARIANTS - 1) as u8));
}

impl State for FlowState {
    type Context = Session;

    fn is_valid_next_state(self, next: Self) -> bool {
        matches!(
            (self, next),
            (FlowState::WaitingForTap, FlowState::WaitingForBomb)
                | (FlowState::WaitingForBomb, FlowState::Playing)
                | (FlowState::Playing, FlowState::GameOver)
        )
    }

    fn will_exit(self, next: Self, session: &mut Session) {
        if self == FlowState::WaitingForBomb && next == FlowState::Playing {
            let pos = session.bomb_pos;
            big_explosion(session, pos, BOMB_INTENSITY);
            session.effect(Effect::RemoveArmedDevice);
            session.shake(session.tuning.shake_bomb);
        }
    }

    fn did_enter(self, previous: Option<Self>, session: &mut Session) {
        match (previous, self) {
            (None, FlowState::WaitingForTap) => {
                session.effect(Effect::Music(Music::Title));
            }
            (Some(FlowState::WaitingForTap), FlowState::WaitingForBomb) => {
                session.effect(Effect::HideCountdown);
                session.effect(Effect::ArmedDeviceIdle { pos: session.bomb_pos });
                session.cue(Cue::BombDrop);
                session.cue(Cue::TickTock);
                session.cue(Cue::TickTock);
                let delay = session.tuning.bomb_delay;
                session.scheduler.schedule(delay, Deferred::EnterPlaying);
                log::info!("Armed, playing in {delay:.1}s");
            }
            (Some(FlowState::WaitingForBomb), FlowState::Playing) => {
                session.player.dynamic = true;
                session.super_boost_player();
                session.cue(Cue::SuperBoost);
                let trail = session.spawn_visual(VisualKind::PlayerTrail, session.player.pos, 1.0);
                session.player.trail = Some(trail);
                session.effect(Effect::Music(Music::Game));
                log::info!("Playing");
            }
            (Some(FlowState::Playing), FlowState::GameOver) => {
                session.effect(Effect::Music(Music::Title));
                session.effect(Effect::GameOverBanner {
                    pos: session.camera_position(),
                });
                let pos = session.player.pos;
                big_explosion(session, pos, GAME_OVER_INTENSITY);
                session.shake(session.tuning.shake_game_over);
                log::info!(
                    "Game over at y={:.0}, score {}",
                    session.player.pos.y,
                    session.score
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fsm::StateMachine;
    use crate::sim::state::GameEvent;
    use crate::tuning::Tuning;

    fn session() -> Session {
        Session::new(5, Tuning::default()).unwrap()
    }

    #[test]
    fn test_only_bomb_reachable_from_menu() {
        use FlowState::*;
        for next in [WaitingForTap, Playing, GameOver] {
            assert!(!WaitingForTap.is_valid_next_state(next));
        }
        assert!(WaitingForTap.is_valid_next_state(WaitingForBomb));
    }

    #[test]
    fn test_game_over_is_terminal() {
        use FlowState::*;
        for next in [WaitingForTap, WaitingForBomb, Playing, GameOver] {
            assert!(!GameOver.is_valid_next_state(next));
        }
    }

    #[test]
    fn test_arming_schedules_playing() {
        let mut session = session();
        let mut fsm = StateMachine::start(FlowState::WaitingForTap, &mut session);
        session.events.clear();
        assert!(fsm.enter(FlowState::WaitingForBomb, &mut session));
        assert_eq!(session.scheduler.pending(), 1);
        assert!(session.events.contains(&GameEvent::Effect(Effect::HideCountdown)));
        assert!(session.events.contains(&GameEvent::Cue(Cue::BombDrop)));
    }

    #[test]
    fn test_detonation_on_exit_then_launch() {
        let mut session = session();
        let mut fsm = StateMachine::start(FlowState::WaitingForTap, &mut session);
        fsm.enter(FlowState::WaitingForBomb, &mut session);
        session.events.clear();

        assert!(fsm.enter(FlowState::Playing, &mut session));
        let removed = session
            .events
            .iter()
            .position(|e| *e == GameEvent::Effect(Effect::RemoveArmedDevice))
            .unwrap();
        let launched = session
            .events
            .iter()
            .position(|e| *e == GameEvent::Cue(Cue::SuperBoost))
            .unwrap();
        assert!(removed < launched, "exit action must run before enter action");
        assert!(session.player.dynamic);
        assert_eq!(session.player.vel.y, session.tuning.super_boost());
        assert!(session.player.trail.is_some());
    }

    #[test]
    fn test_illegal_request_is_noop() {
        let mut session = session();
        let mut fsm = StateMachine::start(FlowState::WaitingForTap, &mut session);
        session.events.clear();
        assert!(!fsm.enter(FlowState::GameOver, &mut session));
        assert_eq!(fsm.current(), FlowState::WaitingForTap);
        assert!(session.events.is_empty());
        assert_eq!(session.scheduler.pending(), 0);
    }
}
