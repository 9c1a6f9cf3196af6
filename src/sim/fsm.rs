//! Generic finite-state machine
//!
//! States are plain enum values. Each state declares its legal successors
//! and optional exit/enter actions that run against a shared context passed
//! in by the caller. A rejected request changes nothing and runs no action.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A state value with transition rules and side effects
pub trait State: Copy + Eq + Debug {
    /// Data the actions mutate
    type Context;

    /// Whether `next` may follow `self`
    fn is_valid_next_state(self, next: Self) -> bool;

    /// Runs on the state being left, before the next state's `did_enter`
    fn will_exit(self, _next: Self, _ctx: &mut Self::Context) {}

    /// Runs on the state being entered. `previous` is `None` only for the
    /// initial state.
    fn did_enter(self, _previous: Option<Self>, _ctx: &mut Self::Context) {}
}

/// Holds the current state and enforces legality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachine<S> {
    current: S,
}

impl<S: State> StateMachine<S> {
    /// Enter the initial state, running its enter action
    pub fn start(initial: S, ctx: &mut S::Context) -> Self {
        initial.did_enter(None, ctx);
        Self { current: initial }
    }

    #[inline]
    pub fn current(&self) -> S {
        self.current
    }

    #[inline]
    pub fn can_enter(&self, next: S) -> bool {
        self.current.is_valid_next_state(next)
    }

    /// Request a transition. Returns `false` (and does nothing) if `next` is
    /// not a legal successor of the current state.
    pub fn enter(&mut self, next: S, ctx: &mut S::Context) -> bool {
        if !self.can_enter(next) {
            if next == self.current {
                log::trace!("Already in {:?}", next);
            } else {
                log::debug!("Rejected transition {:?} -> {:?}", self.current, next);
            }
            return false;
        }
        let previous = self.current;
        previous.will_exit(next, ctx);
        self.current = next;
        next.did_enter(Some(previous), ctx);
        true
    }
}
