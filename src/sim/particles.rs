//! Ambient dust and game-over confetti

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Session;

const DUST_GRAVITY: f32 = 9.81;
/// Shake needed before dust is kicked up
const DUST_SHAKE_THRESHOLD: f32 = 0.1;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const GREY: [f32; 3] = [0.667, 0.667, 0.667];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DustParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Seconds left; dead at <= 0
    pub life: f32,
    pub color: [f32; 3],
}

impl DustParticle {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Fully saturated, mid-lightness hue in [0, 1)
pub fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}

/// Fixed pool of dust particles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DustField {
    particles: Vec<DustParticle>,
}

impl DustField {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![DustParticle::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    /// Resize the pool (quality changes); new slots start dead
    pub fn set_capacity(&mut self, capacity: usize) {
        self.particles.resize(capacity, DustParticle::default());
    }

    pub fn advance<R: Rng>(&mut self, session: &Session, rng: &mut R, dt: f32) {
        let emit = session.shake.intensity > DUST_SHAKE_THRESHOLD || session.is_game_over;

        for p in self.particles.iter_mut() {
            if p.is_alive() {
                p.pos += p.vel * dt;
                p.vel.y -= DUST_GRAVITY * dt;
                p.life -= dt;
            } else if emit {
                p.life = 1.0 + rng.random::<f32>();
                p.pos = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 10.0,
                    0.0,
                    (rng.random::<f32>() - 0.5) * 10.0,
                );
                p.vel = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 5.0,
                    5.0 + rng.random::<f32>() * 5.0,
                    (rng.random::<f32>() - 0.5) * 5.0,
                );
                p.color = if session.is_game_over {
                    hue_to_rgb(rng.random::<f32>())
                } else if rng.random_bool(0.5) {
                    WHITE
                } else {
                    GREY
                };
            }
        }
    }
}
