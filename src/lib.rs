//! Chaos Dodge - ragdoll dodgeball survival party game
//!
//! Core modules:
//! - `sim`: Tick-driven game core (difficulty, events, projectiles, explosions, camera, alerts)
//! - `platform`: Input and device adapters (controls, microphone)
//! - `audio`: Sound cue catalogue consumed by the audio backend
//! - `settings`: Player preferences and run configuration

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings, SettingsError};

use glam::{Mat3, Quat, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Base physics timestep (60 Hz), scaled by slow-motion
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World gravity
    pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
    /// Gravity while the LOW_GRAVITY event is active
    pub const LOW_GRAVITY: Vec3 = Vec3::new(0.0, -2.0, 0.0);

    /// Arena floor radius (projectiles spawn just outside it)
    pub const ARENA_RADIUS: f32 = 12.0;
    /// Lateral spawn band: |x| in [SPAWN_MIN_X, SPAWN_MIN_X + SPAWN_X_SPREAD)
    pub const SPAWN_MIN_X: f32 = 15.0;
    pub const SPAWN_X_SPREAD: f32 = 5.0;

    /// Live projectile cap
    pub const MAX_PROJECTILES: usize = 220;
    /// Max spawns per evaluation, after burst/event multipliers
    pub const MAX_SPAWNS_PER_EVAL: u32 = 8;
    /// Projectile lifetime in seconds
    pub const PROJECTILE_TTL: f32 = 10.0;
    /// Volatile projectiles self-detonate after this many seconds
    pub const VOLATILE_FUSE: f32 = 8.0;
    /// Player velocity lookahead for lead targeting (seconds)
    pub const TARGET_LOOKAHEAD: f32 = 1.0;

    /// Blast query radius
    pub const BLAST_RADIUS: f32 = 5.0;
    /// Blast impulse numerator: mag = BLAST_STRENGTH / (d + BLAST_SOFTENING)^2
    pub const BLAST_STRENGTH: f32 = 100.0;
    pub const BLAST_SOFTENING: f32 = 0.1;
    /// Camera shake added per detonation
    pub const BLAST_SHAKE: f32 = 1.2;
    /// Particles per explosion burst
    pub const BURST_PARTICLES: usize = 60;
    /// Burst lifetime in seconds
    pub const BURST_LIFETIME: f32 = 1.0;

    /// Shake intensity ceiling
    pub const MAX_SHAKE: f32 = 10.0;

    /// Camera rest pose
    pub const CAMERA_REST_POS: Vec3 = Vec3::new(0.0, 8.0, 16.0);
    pub const DEFAULT_FOV: f32 = 50.0;
    pub const MIN_FOV: f32 = 35.0;
    pub const MAX_FOV: f32 = 65.0;

    /// Near-miss detection radius and slow-motion window
    pub const NEAR_MISS_RADIUS: f32 = 1.5;
    pub const SLOW_MO_DURATION: f32 = 0.5;
    pub const SLOW_MO_SCALE: f32 = 0.3;

    /// Alerts fire this many seconds before their phase threshold
    pub const ALERT_LEAD: f32 = 1.5;
    /// One-shot alert firing window (also the flash duration)
    pub const ALERT_WINDOW: f32 = 0.3;
}

/// Linear interpolation with the blend factor clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Rotation for a camera whose -Z axis looks along `dir`
pub fn look_rotation(dir: Vec3, up: Vec3) -> Quat {
    let back = -dir.normalize_or(Vec3::NEG_Z);
    let mut right = up.cross(back);
    if right.length_squared() < 1e-8 {
        // Looking straight up/down
        right = Vec3::X;
    }
    let right = right.normalize();
    let true_up = back.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, back))
}
