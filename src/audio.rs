//! Sound cues
//!
//! The core never touches an audio device. It emits `SoundCue`s each frame and
//! describes every sound as a procedural tone recipe that a backend can
//! synthesize without external files.

use serde::{Deserialize, Serialize};

use crate::sim::state::Session;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundKind {
    /// Short square-wave blast (BUILDING PRESSURE)
    AlertHorn,
    /// Three-step falling siren (ESCALATION)
    DescendingSiren,
    /// Looping LFO siren while the session is critical or worse
    ContinuousSiren,
    /// Heavy hit that shook the camera
    Impact,
    /// Referee whistle on game over
    Whistle,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How the pitch moves over the tone's life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PitchCurve {
    Constant(f32),
    /// Exponential ramp from -> to over `secs`
    ExpRamp { from: f32, to: f32, secs: f32 },
    /// Linear ramp from -> to over `secs`
    LinearRamp { from: f32, to: f32, secs: f32 },
    /// Hard steps: (offset seconds, frequency)
    Steps(Vec<(f32, f32)>),
    /// Sine LFO around `center`
    Lfo { center: f32, depth: f32, hz: f32 },
}

/// Procedural recipe for one sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub waveform: Waveform,
    pub pitch: PitchCurve,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// None for looping sounds
    pub duration: Option<f32>,
}

impl SoundKind {
    pub fn tone(&self) -> Tone {
        match self {
            SoundKind::AlertHorn => Tone {
                waveform: Waveform::Square,
                pitch: PitchCurve::Constant(200.0),
                gain: 0.7,
                duration: Some(0.3),
            },
            SoundKind::DescendingSiren => Tone {
                waveform: Waveform::Sawtooth,
                pitch: PitchCurve::Steps(vec![(0.0, 1200.0), (0.5, 800.0), (1.0, 400.0)]),
                gain: 0.7,
                duration: Some(1.6),
            },
            SoundKind::ContinuousSiren => Tone {
                waveform: Waveform::Square,
                pitch: PitchCurve::Lfo {
                    center: 800.0,
                    depth: 500.0,
                    hz: 2.0,
                },
                gain: 0.7,
                duration: None,
            },
            SoundKind::Impact => Tone {
                waveform: Waveform::Square,
                pitch: PitchCurve::ExpRamp {
                    from: 100.0,
                    to: 40.0,
                    secs: 0.1,
                },
                gain: 0.5,
                duration: Some(0.1),
            },
            SoundKind::Whistle => Tone {
                waveform: Waveform::Triangle,
                pitch: PitchCurve::LinearRamp {
                    from: 2000.0,
                    to: 1500.0,
                    secs: 0.1,
                },
                gain: 0.3,
                duration: Some(0.3),
            },
        }
    }
}

/// A sound to play this frame, with its final volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub kind: SoundKind,
    pub volume: f32,
}

/// Collects sound cues for the frame and watches the session for the
/// impact and whistle triggers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioCues {
    volume: f32,
    muted: bool,
    last_shake: f32,
    was_game_over: bool,
    queue: Vec<SoundCue>,
}

impl Default for AudioCues {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioCues {
    pub fn new() -> Self {
        Self {
            volume: 0.8,
            muted: false,
            last_shake: 0.0,
            was_game_over: false,
            queue: Vec::new(),
        }
    }

    /// Set cue volume (0.0 - 1.0), usually `Settings::effective_volume`
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Queue a sound (dropped when silent)
    pub fn play(&mut self, kind: SoundKind) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        self.queue.push(SoundCue { kind, volume });
    }

    /// Impact when shake jumps above 0.5, whistle on the game-over edge.
    ///
    /// Must run after the shake sources and before the camera decays or
    /// clears the shake.
    pub fn observe(&mut self, session: &Session) {
        let shake = session.shake.intensity;
        if shake > 0.5 && shake > self.last_shake {
            self.play(SoundKind::Impact);
        }
        self.last_shake = shake;

        if session.is_game_over && !self.was_game_over {
            self.play(SoundKind::Whistle);
        }
        self.was_game_over = session.is_game_over;
    }

    /// Baseline for the next rise check, taken after decay
    pub fn settle_shake(&mut self, intensity: f32) {
        self.last_shake = intensity;
    }

    /// Take this frame's cues
    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.queue)
    }
}
