//! One-shot deferred tasks
//!
//! Tasks fire after a fixed delay in simulation time and cannot be cancelled.
//! The scheduler belongs to the session, so replacing the session drops
//! everything still pending.

use serde::{Deserialize, Serialize};

use super::state::VisualHandle;

/// Work to run later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Countdown finished: flow moves from the armed phase to playing
    EnterPlaying,
    /// Stop a visual's emission (it fades out on its own)
    StopVisual(VisualHandle),
    /// Remove a visual entirely
    RemoveVisual(VisualHandle),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    due: f64,
    seq: u64,
    task: Deferred,
}

/// Deferred task list drained once per tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    /// Simulation time in seconds
    now: f64,
    next_seq: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation time seen by the scheduler
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay: f32, task: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: self.now + f64::from(delay.max(0.0)),
            seq,
            task,
        });
    }

    /// Advance time and return every task now due, earliest first
    /// (ties keep scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<Deferred> {
        self.now += f64::from(dt);
        let now = self.now;
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due <= now {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, Deferred::EnterPlaying);
        assert!(scheduler.advance(1.0).is_empty());
        assert!(scheduler.advance(0.9).is_empty());
        assert_eq!(scheduler.advance(0.2), vec![Deferred::EnterPlaying]);
        assert_eq!(scheduler.pending(), 0);
        // One-shot
        assert!(scheduler.advance(5.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, Deferred::RemoveVisual(VisualHandle(2)));
        scheduler.schedule(0.5, Deferred::StopVisual(VisualHandle(1)));
        scheduler.schedule(1.0, Deferred::RemoveVisual(VisualHandle(3)));
        assert_eq!(
            scheduler.advance(2.0),
            vec![
                Deferred::StopVisual(VisualHandle(1)),
                Deferred::RemoveVisual(VisualHandle(2)),
                Deferred::RemoveVisual(VisualHandle(3)),
            ]
        );
    }

    #[test]
    fn test_delay_holds_after_hours_of_play() {
        let dt = 1.0 / 60.0;
        let mut scheduler = Scheduler::new();
        for _ in 0..(3 * 60 * 60 * 60) {
            scheduler.advance(dt);
        }
        scheduler.schedule(2.0, Deferred::EnterPlaying);
        for _ in 0..119 {
            assert!(scheduler.advance(dt).is_empty());
        }
        assert_eq!(scheduler.advance(dt), vec![Deferred::EnterPlaying]);
    }

    #[test]
    fn test_scheduling_is_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(10.0);
        scheduler.schedule(1.0, Deferred::EnterPlaying);
        assert!(scheduler.advance(0.5).is_empty());
        assert_eq!(scheduler.advance(0.5), vec![Deferred::EnterPlaying]);
    }
}
