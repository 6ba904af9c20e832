//! Microphone level adapter
//!
//! Permission is asynchronous on every host: the request goes out, the game
//! keeps ticking, and the result lands later. Until a stream is granted the
//! level reads as zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MicStatus {
    #[default]
    Idle,
    /// Permission prompt outstanding
    Requested,
    Granted,
    /// Denied or no capture device
    Denied,
}

/// Normalized level from analyser bins: mean / 128, clamped to [0, 1]
pub fn level_from_spectrum(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    let mean = sum as f32 / bins.len() as f32;
    (mean / 128.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MicInput {
    status: MicStatus,
    volume: f32,
}

impl MicInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> MicStatus {
        self.status
    }

    /// Current level; zero unless a stream is granted
    pub fn volume(&self) -> f32 {
        if self.status == MicStatus::Granted {
            self.volume
        } else {
            0.0
        }
    }

    /// Ask for the device. No-op if a request is pending or already answered.
    pub fn request(&mut self) {
        if self.status == MicStatus::Idle {
            self.status = MicStatus::Requested;
            log::info!("Microphone requested");
        }
    }

    /// Permission callback
    pub fn resolve(&mut self, granted: bool) {
        if self.status != MicStatus::Requested {
            return;
        }
        if granted {
            self.status = MicStatus::Granted;
            log::info!("Microphone granted");
        } else {
            self.status = MicStatus::Denied;
            self.volume = 0.0;
            log::warn!("Microphone unavailable, continuing without it");
        }
    }

    /// Feed one analyser frame
    pub fn update_spectrum(&mut self, bins: &[u8]) {
        if self.status == MicStatus::Granted {
            self.volume = level_from_spectrum(bins);
        }
    }

    /// Release the stream when the session stops
    pub fn stop(&mut self) {
        if self.status != MicStatus::Idle {
            log::debug!("Microphone stopped");
        }
        self.status = MicStatus::Idle;
        self.volume = 0.0;
    }
}
