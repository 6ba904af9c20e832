//! Phase alerts and the continuous siren
//!
//! Two independent gates read the elapsed clock: one-shot phase alerts
//! (fired at most once per session each) and the continuous siren range.

use serde::Serialize;

use super::state::Session;
use crate::audio::SoundKind;
use crate::consts::{ALERT_LEAD, ALERT_WINDOW};

/// Siren gate: 90s phase minus the alert lead
pub const SIREN_START: f32 = 90.0 - ALERT_LEAD;
/// Pulse overlay blink period
pub const PULSE_PERIOD: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AlertKey {
    Phase2,
    Phase3,
    Phase4,
    Phase5,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn orange(a: f32) -> Self {
        Self { r: 255, g: 165, b: 0, a }
    }

    pub const fn red(a: f32) -> Self {
        Self { r: 255, g: 0, b: 0, a }
    }
}

/// Full-screen tint with a caption
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Flash {
    pub color: Rgba,
    pub message: &'static str,
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertPhase {
    pub key: AlertKey,
    pub threshold: f32,
    pub message: &'static str,
    pub color: Rgba,
    pub sound: Option<SoundKind>,
    pub announcement: Option<&'static str>,
}

impl AlertPhase {
    /// When the alert fires
    pub fn alert_at(&self) -> f32 {
        self.threshold - ALERT_LEAD
    }
}

/// Ordered phase table
pub const PHASES: [AlertPhase; 4] = [
    AlertPhase {
        key: AlertKey::Phase2,
        threshold: 30.0,
        message: "BUILDING PRESSURE",
        color: Rgba::orange(0.2),
        sound: Some(SoundKind::AlertHorn),
        announcement: None,
    },
    AlertPhase {
        key: AlertKey::Phase3,
        threshold: 60.0,
        message: "ESCALATION",
        color: Rgba::red(0.15),
        sound: Some(SoundKind::DescendingSiren),
        announcement: None,
    },
    // The siren itself is owned by the range gate
    AlertPhase {
        key: AlertKey::Phase4,
        threshold: 90.0,
        message: "CRITICAL",
        color: Rgba::red(0.15),
        sound: None,
        announcement: None,
    },
    AlertPhase {
        key: AlertKey::Phase5,
        threshold: 120.0,
        message: "CHAOS MAXIMUM",
        color: Rgba::red(0.15),
        sound: None,
        announcement: Some("CHAOS MAXIMUM"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AlertEvent {
    PhaseFired {
        key: AlertKey,
        message: &'static str,
        /// None when flashes are disabled
        flash: Option<Flash>,
        sound: Option<SoundKind>,
        announcement: Option<&'static str>,
    },
    SirenStarted,
    SirenStopped,
}

/// Alert output for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertFrame {
    pub events: Vec<AlertEvent>,
    pub siren_active: bool,
    /// CRITICAL overlay, present only on the visible half of each blink
    pub pulse: Option<Flash>,
}

/// Continuous siren predicate
pub fn siren_should_run(session: &Session) -> bool {
    session.is_live() && session.elapsed() >= SIREN_START
}

#[derive(Debug, Clone, Default)]
pub struct AlertOrchestrator {
    fired: [bool; PHASES.len()],
    siren_active: bool,
    generation: u32,
}

impl AlertOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self, key: AlertKey) -> bool {
        PHASES
            .iter()
            .position(|p| p.key == key)
            .is_some_and(|i| self.fired[i])
    }

    pub fn siren_active(&self) -> bool {
        self.siren_active
    }

    pub fn advance(&mut self, session: &Session, flashes_enabled: bool) -> AlertFrame {
        let mut frame = AlertFrame::default();

        if self.generation != session.generation() {
            self.generation = session.generation();
            self.fired = Default::default();
        }

        if !session.is_live() {
            self.fired = Default::default();
        } else {
            let t = session.elapsed();
            for (i, phase) in PHASES.iter().enumerate() {
                if self.fired[i] || t < phase.alert_at() {
                    continue;
                }
                self.fired[i] = true;

                // Started mid-session past the window: stay quiet
                if t >= phase.alert_at() + ALERT_WINDOW {
                    continue;
                }

                log::info!("Alert {} at {:.2}s", phase.message, t);
                let flash = flashes_enabled.then_some(Flash {
                    color: phase.color,
                    message: phase.message,
                    duration: ALERT_WINDOW,
                });
                frame.events.push(AlertEvent::PhaseFired {
                    key: phase.key,
                    message: phase.message,
                    flash,
                    sound: phase.sound,
                    announcement: phase.announcement,
                });
            }
        }

        let run = siren_should_run(session);
        if run != self.siren_active {
            self.siren_active = run;
            if run {
                log::info!("Continuous siren started");
                frame.events.push(AlertEvent::SirenStarted);
            } else {
                log::info!("Continuous siren stopped");
                frame.events.push(AlertEvent::SirenStopped);
            }
        }
        frame.siren_active = self.siren_active;

        let t = session.elapsed();
        let critical = session.is_live() && (90.0..120.0).contains(&t);
        if critical && flashes_enabled && t.rem_euclid(PULSE_PERIOD) < PULSE_PERIOD / 2.0 {
            frame.pulse = Some(Flash {
                color: Rgba::red(0.15),
                message: "CRITICAL",
                duration: PULSE_PERIOD / 2.0,
            });
        }

        frame
    }
}
