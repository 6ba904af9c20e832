//! Random modifier events
//!
//! Driven only by the session's elapsed clock, so a paused session can
//! never expire (or fire) an event behind the player's back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{ActiveEvent, EventKind, Session};

/// How long an event stays active
pub const EVENT_DURATION: f32 = 8.0;

/// Seconds between events at the given elapsed time
pub fn event_period(elapsed: f32) -> f32 {
    if elapsed < 60.0 { 15.0 } else { 20.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Idle,
    Active { kind: EventKind, ends_at: f32 },
}

/// Owns `Session::active_event`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventScheduler {
    state: SchedulerState,
    last_event_at: f32,
    generation: u32,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    fn clear(&mut self, session: &mut Session) {
        self.state = SchedulerState::Idle;
        self.last_event_at = 0.0;
        session.set_active_event(None);
    }

    /// Advance against the session clock
    pub fn advance<R: Rng>(&mut self, session: &mut Session, rng: &mut R) {
        if self.generation != session.generation() {
            self.generation = session.generation();
            self.clear(session);
        }

        if !session.is_live() {
            if self.state != SchedulerState::Idle {
                log::info!("Event cleared: session ended");
            }
            self.clear(session);
            return;
        }

        let elapsed = session.elapsed();

        if let SchedulerState::Active { kind, ends_at } = self.state {
            if elapsed >= ends_at {
                log::info!("Event {} expired at {:.1}s", kind.label(), elapsed);
                self.state = SchedulerState::Idle;
                session.set_active_event(None);
            }
        }

        if elapsed - self.last_event_at > event_period(elapsed) {
            self.last_event_at = elapsed;
            let kind = EventKind::ALL[rng.random_range(0..EventKind::ALL.len())];
            let ends_at = elapsed + EVENT_DURATION;
            self.state = SchedulerState::Active { kind, ends_at };
            session.set_active_event(Some(ActiveEvent { kind, ends_at }));
            log::info!("Event {} active until {:.1}s", kind.label(), ends_at);
        }
    }
}
