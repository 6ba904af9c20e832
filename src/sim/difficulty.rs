//! Difficulty curve
//!
//! Pure functions of elapsed survival time. Everything that scales with
//! "how long has the player lasted" reads its numbers from here.

use serde::{Deserialize, Serialize};

use super::state::EventKind;
use crate::consts::MAX_SPAWNS_PER_EVAL;

/// Named difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyPhase {
    /// [0, 30)
    Warmup,
    /// [30, 60)
    BuildingPressure,
    /// [60, 90)
    Escalation,
    /// [90, 120)
    Critical,
    /// 120+
    ChaosMaximum,
}

impl DifficultyPhase {
    pub fn from_elapsed(elapsed: f32) -> Self {
        if elapsed < 30.0 {
            DifficultyPhase::Warmup
        } else if elapsed < 60.0 {
            DifficultyPhase::BuildingPressure
        } else if elapsed < 90.0 {
            DifficultyPhase::Escalation
        } else if elapsed < 120.0 {
            DifficultyPhase::Critical
        } else {
            DifficultyPhase::ChaosMaximum
        }
    }

    /// Elapsed seconds at which this phase begins
    pub fn threshold(&self) -> f32 {
        match self {
            DifficultyPhase::Warmup => 0.0,
            DifficultyPhase::BuildingPressure => 30.0,
            DifficultyPhase::Escalation => 60.0,
            DifficultyPhase::Critical => 90.0,
            DifficultyPhase::ChaosMaximum => 120.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyPhase::Warmup => "WARMUP",
            DifficultyPhase::BuildingPressure => "BUILDING PRESSURE",
            DifficultyPhase::Escalation => "ESCALATION",
            DifficultyPhase::Critical => "CRITICAL",
            DifficultyPhase::ChaosMaximum => "CHAOS MAXIMUM",
        }
    }

    /// (amplitude in degrees, frequency in Hz) of the ambient FOV wobble
    pub fn fov_wobble(&self) -> (f32, f32) {
        match self {
            DifficultyPhase::Warmup => (0.0, 0.0),
            DifficultyPhase::BuildingPressure => (2.0, 0.8),
            DifficultyPhase::Escalation => (5.0, 1.1),
            DifficultyPhase::Critical => (10.0, 1.6),
            // 2 Hz matches the continuous siren LFO
            DifficultyPhase::ChaosMaximum => (15.0, 2.0),
        }
    }

    #[inline]
    pub fn is_max_chaos(&self) -> bool {
        *self == DifficultyPhase::ChaosMaximum
    }
}

/// Spawn-rate multiplier. Grows without bound past 120s.
pub fn multiplier(elapsed: f32) -> f32 {
    match DifficultyPhase::from_elapsed(elapsed.max(0.0)) {
        DifficultyPhase::Warmup => 1.0,
        DifficultyPhase::BuildingPressure => 2.0,
        DifficultyPhase::Escalation => 5.0,
        DifficultyPhase::Critical => 15.0,
        DifficultyPhase::ChaosMaximum => 2.0 * (0.05 * elapsed).exp(),
    }
}

/// Base spawn interval in milliseconds, before the multiplier
#[inline]
pub fn base_interval_ms(elapsed: f32) -> f32 {
    (2000.0 - elapsed.max(0.0) * 10.0).max(100.0)
}

/// Seconds between base spawns
pub fn spawn_interval_secs(elapsed: f32) -> f32 {
    let m = multiplier(elapsed);
    // exp() overflows to inf eventually; keep the interval positive
    let m = if m.is_finite() { m } else { f32::MAX };
    (base_interval_ms(elapsed) / m / 1000.0).max(f32::MIN_POSITIVE)
}

/// Extra spawns per batch in the late phases
pub fn burst_multiplier(elapsed: f32) -> u32 {
    if elapsed >= 120.0 {
        3
    } else if elapsed >= 90.0 {
        2
    } else {
        1
    }
}

/// Spawns to emit for `base_spawns` accumulated intervals, capped per evaluation
pub fn spawn_count(base_spawns: u32, elapsed: f32, event: Option<EventKind>) -> u32 {
    let double = if event == Some(EventKind::Multiball) { 2 } else { 1 };
    base_spawns
        .saturating_mul(burst_multiplier(elapsed))
        .saturating_mul(double)
        .min(MAX_SPAWNS_PER_EVAL)
}
