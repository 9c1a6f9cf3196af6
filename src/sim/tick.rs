//! Per-frame simulation tick
//!
//! Order within one tick:
//! 1. deferred tasks and queued taps
//! 2. physics step and contact resolution (before any state reads velocity)
//! 3. player state machine
//! 4. camera
//! 5. level extension, then culling
//! 6. hazard advance and the loss check

use super::camera::Viewport;
use super::flow::FlowState;
use super::player::{self, PlayerState};
use super::scheduler::Deferred;
use super::state::{GameEvent, GameState};
use super::{collision, hazard, physics};

/// Input gathered since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary-input events (taps) queued since the last tick
    pub taps: u32,
    /// Newest raw tilt sample, if the sensor reported one
    pub tilt: Option<f32>,
    /// Current viewport, if it changed
    pub viewport: Option<Viewport>,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(viewport) = input.viewport {
        state.session.viewport = viewport;
    }
    if let Some(raw) = input.tilt {
        let smoothing = state.session.tuning.tilt_smoothing;
        state.session.tilt.sample(raw, smoothing);
    }
    state.session.clock += f64::from(dt);

    for task in state.session.scheduler.advance(dt) {
        run_deferred(state, task);
    }

    for _ in 0..input.taps {
        if handle_tap(state) {
            // Fresh session: nothing of the old tick applies
            return;
        }
    }

    if state.flow.current() == FlowState::Playing {
        update_playing(state, dt);
    }
}

/// Primary input. Returns true if the session was replaced.
pub fn handle_tap(state: &mut GameState) -> bool {
    match state.flow.current() {
        FlowState::WaitingForTap => {
            state.flow.enter(FlowState::WaitingForBomb, &mut state.session);
            false
        }
        FlowState::GameOver => {
            state.restart();
            true
        }
        _ => false,
    }
}

fn run_deferred(state: &mut GameState, task: Deferred) {
    let session = &mut state.session;
    match task {
        Deferred::EnterPlaying => {
            state.flow.enter(FlowState::Playing, session);
        }
        Deferred::StopVisual(handle) => {
            session.emit(GameEvent::StopVisual { handle });
            let fade = session.tuning.trail_fade;
            session.scheduler.schedule(fade, Deferred::RemoveVisual(handle));
        }
        Deferred::RemoveVisual(handle) => {
            session.emit(GameEvent::RemoveVisual { handle });
        }
    }
}

fn update_playing(state: &mut GameState, dt: f32) {
    let contacts = physics::step(&mut state.session, dt);
    for contact in &contacts {
        let outcome = collision::resolve_contact(&mut state.session, contact);
        log::trace!("Contact {:?} -> {:?}", contact.body_b.category, outcome);
    }

    player::update_player(&mut state.player_fsm, &mut state.session);

    let s = &mut state.session;
    let viewport = s.viewport;
    let (lead, lerp) = (s.tuning.camera_lead, s.tuning.camera_lerp);
    let camera = s.camera.update(s.player.pos.y, s.hazard.y, viewport, lead, lerp);

    let (threshold, segment) = (s.tuning.extend_threshold, s.tuning.segment_height);
    if let Some(base_y) =
        s.level
            .extend_for_camera(camera.y, s.scene_size.y, threshold, segment, &mut s.rng, &s.catalog)
    {
        s.emit(GameEvent::BackgroundSegment { base_y });
    }

    let forward = s.tuning.forward_visibility;
    let view = &s.camera;
    let culled = s
        .level
        .cull(|item| view.is_visible(&item.bounds(), item.pos.y, viewport, forward));
    if !culled.is_empty() {
        s.touching.retain(|id| culled.iter().all(|item| item.id != *id));
    }

    hazard::update_hazard(s, dt);
    check_loss(state);
}

/// Out of lives: the player dies and the session ends. Runs as a separate
/// step after the hazard contact that took the last life. Returns true if
/// the flow moved to game over.
pub fn check_loss(state: &mut GameState) -> bool {
    if state.session.lives > 0 {
        return false;
    }
    state.player_fsm.enter(PlayerState::Dead, &mut state.session);
    if state.player_fsm.current() != PlayerState::Dead {
        return false;
    }
    state.flow.enter(FlowState::GameOver, &mut state.session)
}
