//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Driven only by the frame delta and the session clock
//! - Seeded RNG only
//! - Physics reached through the `PhysicsWorld` trait
//! - No rendering or platform dependencies

pub mod alerts;
pub mod arena;
pub mod camera;
pub mod difficulty;
pub mod events;
pub mod explosion;
pub mod game;
pub mod particles;
pub mod physics;
pub mod player;
pub mod sandbox;
pub mod spawner;
pub mod state;
pub mod tick;

pub use alerts::{AlertEvent, AlertFrame, AlertKey, AlertOrchestrator, Flash, Rgba};
pub use camera::{CameraPose, CameraReactor, DeathCam, DeathCamBranch};
pub use difficulty::{DifficultyPhase, multiplier, spawn_interval_secs};
pub use events::{EventScheduler, SchedulerState};
pub use explosion::{ExplosionBurst, Explosions, blast_impulse_magnitude};
pub use game::Game;
pub use particles::DustField;
pub use physics::{BodyDesc, BodyHandle, BodyKind, BodyRegistry, BodyRole, Contact, PhysicsError, PhysicsWorld};
pub use player::{MicFx, PlayerReactor, PlayerRig};
pub use sandbox::SandboxWorld;
pub use spawner::{Detonation, Projectile, ProjectileKind, Spawner};
pub use state::{ActiveEvent, EventKind, GameOverCause, RngState, Session, ShakeState};
pub use tick::{FrameOutput, PhysicsParams, TickInput, tick};
