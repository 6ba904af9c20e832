//! Game aggregate: the session store plus every subsystem that reads it

use glam::Vec3;
use rand_pcg::Pcg32;

use super::alerts::AlertOrchestrator;
use super::arena::build_arena;
use super::camera::CameraReactor;
use super::events::EventScheduler;
use super::explosion::Explosions;
use super::particles::DustField;
use super::physics::{BodyRegistry, PhysicsWorld};
use super::player::{PlayerReactor, PlayerRig};
use super::spawner::Spawner;
use super::state::{GameOverCause, RngState, Session};
use crate::audio::AudioCues;
use crate::settings::Settings;

/// Where the ragdoll's torso starts
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 4.0, 0.0);

pub struct Game {
    pub session: Session,
    pub settings: Settings,
    pub bodies: BodyRegistry,

    pub events: EventScheduler,
    pub spawner: Spawner,
    pub explosions: Explosions,
    pub camera: CameraReactor,
    pub alerts: AlertOrchestrator,
    pub player: PlayerReactor,
    pub dust: DustField,
    pub audio: AudioCues,

    /// Seed the gameplay RNG was built from
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
    /// Frames ticked since creation
    pub time_ticks: u64,
}

impl Game {
    /// Seeded from `settings.seed`, or randomly if unset
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::with_seed(seed, settings)
    }

    pub fn with_seed(seed: u64, settings: Settings) -> Self {
        let rng_state = RngState::new(seed);
        let mut audio = AudioCues::new();
        audio.set_volume(settings.effective_volume());

        log::info!("Game created (seed {}, quality {})", seed, settings.quality.as_str());

        Self {
            session: Session::new(),
            bodies: BodyRegistry::new(),
            events: EventScheduler::new(),
            spawner: Spawner::new(),
            explosions: Explosions::new(),
            camera: CameraReactor::new(),
            alerts: AlertOrchestrator::new(),
            player: PlayerReactor::new(),
            dust: DustField::new(settings.max_dust_particles()),
            audio,
            rng: rng_state.to_rng(),
            rng_state,
            settings,
            time_ticks: 0,
        }
    }

    /// Spawn the arena and the ragdoll into `physics`
    pub fn build_world<P: PhysicsWorld>(&mut self, physics: &mut P) -> PlayerRig {
        build_arena(physics, &mut self.bodies);
        PlayerRig::spawn(physics, &mut self.bodies, PLAYER_SPAWN)
    }

    /// Apply new settings mid-game
    pub fn apply_settings(&mut self, settings: Settings) {
        self.audio.set_volume(settings.effective_volume());
        self.dust.set_capacity(settings.max_dust_particles());
        self.settings = settings;
    }

    // === Session control surface ===

    pub fn start_game(&mut self) {
        self.session.start_game();
    }

    pub fn end_game(&mut self, cause: Option<GameOverCause>) {
        self.session.end_game(cause);
    }

    pub fn reset_game(&mut self) {
        self.session.reset_game();
    }

    pub fn set_score(&mut self, value: f32) {
        self.session.set_score(value);
    }
}
