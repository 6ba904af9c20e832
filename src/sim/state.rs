//! Session state and core simulation types
//!
//! `Session` is the shared store every subsystem reads. Each field has a
//! single writer; subsystems take `&Session` or `&mut Session` to make
//! their access explicit.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SHAKE;

/// Why the last session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    /// Session has not ended
    #[default]
    None,
    /// A ball went into the goal
    Goal,
    /// A volatile ball detonated on the player
    BombExplosion,
    /// Ended without a specific cause
    Unknown,
}

/// Temporary global modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Doubles every spawn batch
    Multiball,
    /// Weak gravity
    LowGravity,
    /// Roughly half of spawns are heavy
    GiantBall,
    /// Random horizontal push on every ball
    Wind,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Multiball,
        EventKind::LowGravity,
        EventKind::GiantBall,
        EventKind::Wind,
    ];

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Multiball => "MULTIBALL",
            EventKind::LowGravity => "LOW_GRAVITY",
            EventKind::GiantBall => "GIANT_BALL",
            EventKind::Wind => "WIND",
        }
    }
}

/// The currently running event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub kind: EventKind,
    /// Elapsed-seconds value at which the event clears
    pub ends_at: f32,
}

/// Camera shake accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShakeState {
    /// Always within [0, MAX_SHAKE]
    pub intensity: f32,
}

impl ShakeState {
    /// Add shake, saturating at the ceiling
    pub fn add(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.intensity = (self.intensity + amount).min(MAX_SHAKE);
    }

    /// Overwrite shake (clamped)
    pub fn set(&mut self, value: f32) {
        self.intensity = if value.is_finite() {
            value.clamp(0.0, MAX_SHAKE)
        } else {
            0.0
        };
    }

    /// Geometric decay: `factor_per_second ^ dt`, snapping tiny values to zero
    pub fn decay(&mut self, factor_per_second: f32, dt: f32) {
        if self.intensity <= 0.0 {
            return;
        }
        let next = self.intensity * factor_per_second.powf(dt);
        self.intensity = if next < 0.001 { 0.0 } else { next };
    }
}

/// Shared session store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub is_playing: bool,
    pub is_game_over: bool,
    pub game_over_cause: GameOverCause,
    /// Seconds survived this session
    pub score: f32,
    pub shake: ShakeState,
    pub active_event: Option<ActiveEvent>,
    /// Normalized microphone level [0, 1]
    pub mic_volume: f32,
    pub replay_url: Option<String>,
    /// Bumped on every start/reset so subsystems can drop per-session state
    generation: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed survival time in seconds
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.score
    }

    /// Playing and not yet over
    #[inline]
    pub fn is_live(&self) -> bool {
        self.is_playing && !self.is_game_over
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn start_game(&mut self) {
        self.is_playing = true;
        self.is_game_over = false;
        self.game_over_cause = GameOverCause::None;
        self.score = 0.0;
        self.replay_url = None;
        self.shake = ShakeState::default();
        self.active_event = None;
        self.generation = self.generation.wrapping_add(1);
        log::info!("Session {} started", self.generation);
    }

    /// End the session. The first cause wins if several arrive in one tick.
    pub fn end_game(&mut self, cause: Option<GameOverCause>) {
        if self.is_game_over {
            return;
        }
        let cause = match cause {
            None | Some(GameOverCause::None) => GameOverCause::Unknown,
            Some(c) => c,
        };
        self.is_playing = false;
        self.is_game_over = true;
        self.game_over_cause = cause;
        self.active_event = None;
        log::info!("Game over after {:.1}s ({:?})", self.score, cause);
    }

    pub fn reset_game(&mut self) {
        self.is_playing = false;
        self.is_game_over = false;
        self.game_over_cause = GameOverCause::None;
        self.score = 0.0;
        self.replay_url = None;
        self.shake = ShakeState::default();
        self.active_event = None;
        self.generation = self.generation.wrapping_add(1);
        log::info!("Session reset");
    }

    pub fn set_score(&mut self, value: f32) {
        self.score = if value.is_finite() { value.max(0.0) } else { 0.0 };
    }

    pub fn trigger_shake(&mut self, amount: f32) {
        self.shake.add(amount);
    }

    pub fn set_shake_intensity(&mut self, value: f32) {
        self.shake.set(value);
    }

    pub fn set_active_event(&mut self, event: Option<ActiveEvent>) {
        self.active_event = event;
    }

    pub fn active_event_kind(&self) -> Option<EventKind> {
        self.active_event.map(|e| e.kind)
    }

    pub fn set_mic_volume(&mut self, volume: f32) {
        self.mic_volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn set_replay_url(&mut self, url: Option<String>) {
        self.replay_url = url;
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_end_reset_invariant() {
        let mut s = Session::new();
        assert!(!s.is_playing && !s.is_game_over);

        s.start_game();
        assert!(s.is_playing && !s.is_game_over);
        assert_eq!(s.generation(), 1);

        s.end_game(Some(GameOverCause::BombExplosion));
        assert!(!s.is_playing && s.is_game_over);
        assert_eq!(s.game_over_cause, GameOverCause::BombExplosion);

        // Second cause in the same tick is ignored
        s.end_game(Some(GameOverCause::Goal));
        assert_eq!(s.game_over_cause, GameOverCause::BombExplosion);

        s.reset_game();
        assert!(!s.is_playing && !s.is_game_over);
        assert_eq!(s.game_over_cause, GameOverCause::None);
        assert_eq!(s.generation(), 2);
    }

    #[test]
    fn test_end_without_cause_is_unknown() {
        let mut s = Session::new();
        s.start_game();
        s.end_game(None);
        assert_eq!(s.game_over_cause, GameOverCause::Unknown);
    }

    #[test]
    fn test_shake_caps_and_decays() {
        let mut shake = ShakeState::default();
        shake.add(7.0);
        shake.add(7.0);
        assert_eq!(shake.intensity, MAX_SHAKE);

        shake.decay(0.6, 1.0);
        assert!((shake.intensity - 6.0).abs() < 1e-4);

        shake.set(0.0011);
        shake.decay(0.6, 1.0);
        assert_eq!(shake.intensity, 0.0);

        shake.add(f32::NAN);
        assert_eq!(shake.intensity, 0.0);
    }

    #[test]
    fn test_start_clears_event_and_shake() {
        let mut s = Session::new();
        s.start_game();
        s.trigger_shake(3.0);
        s.set_active_event(Some(ActiveEvent {
            kind: EventKind::Wind,
            ends_at: 10.0,
        }));
        s.set_score(42.0);

        s.start_game();
        assert_eq!(s.score, 0.0);
        assert_eq!(s.shake.intensity, 0.0);
        assert!(s.active_event.is_none());
    }
}
