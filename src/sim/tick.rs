//! Per-frame tick
//!
//! Runs every subsystem once against the shared session, in a fixed order,
//! and returns what the presentation layer needs. The host steps its physics
//! world afterwards with the returned `PhysicsParams`.

use glam::Vec3;
use serde::Serialize;

use super::alerts::{AlertEvent, AlertFrame};
use super::arena::react_to_contacts;
use super::camera::CameraPose;
use super::difficulty::DifficultyPhase;
use super::game::Game;
use super::physics::PhysicsWorld;
use super::player::MicFx;
use super::state::{EventKind, GameOverCause};
use crate::audio::{SoundCue, SoundKind};
use crate::consts::*;
use crate::platform::input::InputState;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held leg controls
    pub controls: InputState,
    /// Normalized microphone level [0, 1]
    pub mic_volume: f32,
}

/// How the host should step physics after this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsParams {
    pub gravity: Vec3,
    pub time_scale: f32,
    /// SIM_DT scaled by slow-motion
    pub time_step: f32,
}

/// Everything the presentation layer consumes for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameOutput {
    /// Frames ticked since the game was created
    pub frame: u64,
    pub elapsed: f32,
    pub phase: DifficultyPhase,
    pub is_playing: bool,
    pub is_game_over: bool,
    pub game_over_cause: GameOverCause,
    pub camera: CameraPose,
    pub shake: f32,
    /// HUD label of the running event
    pub active_event: Option<&'static str>,
    pub alerts: AlertFrame,
    pub sounds: Vec<SoundCue>,
    pub physics: PhysicsParams,
    pub mic_fx: MicFx,
    pub projectiles: usize,
    pub bursts: usize,
}

/// Gravity for the current event
pub fn gravity_for(event: Option<EventKind>) -> Vec3 {
    if event == Some(EventKind::LowGravity) {
        LOW_GRAVITY
    } else {
        GRAVITY
    }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick<P: PhysicsWorld>(game: &mut Game, physics: &mut P, input: &TickInput, dt: f32) -> FrameOutput {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    game.time_ticks += 1;

    let contacts = physics.drain_contacts();
    game.session.set_mic_volume(input.mic_volume);

    // Survival clock (frozen once the session is over)
    if game.session.is_live() {
        let next = game.session.score + dt;
        game.session.set_score(next);
    }

    game.events.advance(&mut game.session, &mut game.rng);
    react_to_contacts(&mut game.session, &game.bodies, &contacts);

    let mic_fx = game.player.advance(
        &mut game.session,
        physics,
        &game.bodies,
        &input.controls,
        &contacts,
        &mut game.rng,
        dt,
    );

    let detonations = game.spawner.advance(
        &game.session,
        physics,
        &game.bodies,
        &contacts,
        &mut game.rng,
        dt,
    );
    for det in &detonations {
        game.explosions
            .detonate(&mut game.session, physics, det, &mut game.rng);
        game.spawner.despawn(det.projectile_id, physics);
    }
    game.explosions.advance(&game.session, dt);
    game.audio.observe(&game.session);

    let camera = game.camera.advance(
        &mut game.session,
        physics,
        &game.bodies,
        game.spawner.projectiles(),
        game.settings.effective_screen_shake(),
        &mut game.rng,
        dt,
    );
    game.audio.settle_shake(game.session.shake.intensity);

    let alerts = game
        .alerts
        .advance(&game.session, game.settings.effective_alert_flashes());
    for event in &alerts.events {
        match event {
            AlertEvent::PhaseFired { sound: Some(kind), .. } => game.audio.play(*kind),
            AlertEvent::SirenStarted => game.audio.play(SoundKind::ContinuousSiren),
            _ => {}
        }
    }

    game.dust.advance(&game.session, &mut game.rng, dt);

    let gravity = gravity_for(game.session.active_event_kind());
    physics.set_gravity(gravity);
    let time_scale = game.camera.time_scale();

    FrameOutput {
        frame: game.time_ticks,
        elapsed: game.session.elapsed(),
        phase: DifficultyPhase::from_elapsed(game.session.elapsed()),
        is_playing: game.session.is_playing,
        is_game_over: game.session.is_game_over,
        game_over_cause: game.session.game_over_cause,
        camera,
        shake: game.session.shake.intensity,
        active_event: game.session.active_event_kind().map(|k| k.label()),
        alerts,
        sounds: game.audio.drain(),
        physics: PhysicsParams {
            gravity,
            time_scale,
            time_step: SIM_DT * time_scale,
        },
        mic_fx,
        projectiles: game.spawner.len(),
        bursts: game.explosions.bursts().len(),
    }
}
