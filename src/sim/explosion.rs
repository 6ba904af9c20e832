//! Volatile ball detonations
//!
//! Two kinds of randomness meet here and are kept apart on purpose:
//! the blast's physical jitter (zero-distance direction, torque) draws from
//! the game RNG, while the visual burst is seeded from the ball id so the
//! same detonation always renders the same particles.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::{BodyHandle, OrSkip, PhysicsWorld};
use super::spawner::Detonation;
use super::state::{GameOverCause, Session};
use crate::consts::*;

/// Gravity acting on burst particles
const BURST_GRAVITY: Vec3 = Vec3::new(0.0, -12.0, 0.0);
/// Per-step velocity damping for burst particles
const BURST_DAMPING: f32 = 0.98;
/// Torque impulse scale relative to the linear impulse
const TORQUE_SCALE: f32 = 0.03;

/// Inverse-square blast impulse magnitude at `distance` from the origin
#[inline]
pub fn blast_impulse_magnitude(distance: f32) -> f32 {
    let d = distance.max(0.0) + BLAST_SOFTENING;
    BLAST_STRENGTH / (d * d)
}

/// Uniform-ish random unit vector (for zero-length fallbacks)
pub fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    for _ in 0..8 {
        let v = Vec3::new(
            rng.random::<f32>() - 0.5,
            rng.random::<f32>() - 0.5,
            rng.random::<f32>() - 0.5,
        );
        if v.length_squared() > 1e-6 {
            return v.normalize();
        }
    }
    Vec3::Y
}

/// FNV-1a over the id bytes, used as the burst seed
pub fn burst_seed(id: u64) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in id.to_le_bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstColor {
    Smoke,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstParticle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: BurstColor,
}

/// Visual particle burst for one detonation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionBurst {
    pub id: u64,
    pub origin: Vec3,
    pub age: f32,
    pub particles: Vec<BurstParticle>,
}

impl ExplosionBurst {
    /// Build the burst deterministically from `id`
    pub fn new(id: u64, origin: Vec3) -> Self {
        let mut rng = Pcg32::seed_from_u64(burst_seed(id));
        let particles = (0..BURST_PARTICLES)
            .map(|_| {
                let dir = Vec3::new(
                    rng.random::<f32>() - 0.5,
                    rng.random::<f32>() * 0.9,
                    rng.random::<f32>() - 0.5,
                )
                .normalize_or(Vec3::Y);
                let speed = 8.0 + rng.random::<f32>() * 10.0;
                let offset = rng.random::<f32>() * 1.5;
                let color = if rng.random::<f32>() > 0.6 {
                    BurstColor::Smoke
                } else {
                    BurstColor::Fire
                };
                BurstParticle {
                    pos: origin + dir * offset,
                    vel: dir * speed,
                    color,
                }
            })
            .collect();

        Self {
            id,
            origin,
            age: 0.0,
            particles,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.age += dt;
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel += BURST_GRAVITY * dt;
            p.vel *= BURST_DAMPING;
        }
    }

    pub fn is_done(&self) -> bool {
        self.age > BURST_LIFETIME
    }
}

/// What a detonation did
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlastReport {
    /// Bodies that received an impulse, with the magnitude applied
    pub pushed: Vec<(BodyHandle, f32)>,
    pub ended_game: bool,
}

/// Live explosion bursts and the blast logic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explosions {
    bursts: Vec<ExplosionBurst>,
    generation: u32,
}

impl Explosions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bursts(&self) -> &[ExplosionBurst] {
        &self.bursts
    }

    /// Run a detonation: burst, shake, game over, radial impulses.
    ///
    /// Writes `Session::shake` and may end the session.
    pub fn detonate<P: PhysicsWorld, R: Rng>(
        &mut self,
        session: &mut Session,
        physics: &mut P,
        det: &Detonation,
        rng: &mut R,
    ) -> BlastReport {
        let mut report = BlastReport::default();
        log::debug!(
            "Ball {} detonated at ({:.2}, {:.2}, {:.2}) player={}",
            det.projectile_id,
            det.origin.x,
            det.origin.y,
            det.origin.z,
            det.hits_player
        );

        self.bursts.push(ExplosionBurst::new(det.projectile_id, det.origin));
        session.trigger_shake(BLAST_SHAKE);

        if det.hits_player && session.is_live() {
            session.end_game(Some(GameOverCause::BombExplosion));
            report.ended_game = true;
        }

        for body in physics.dynamic_bodies_within(det.origin, BLAST_RADIUS) {
            if body == det.body {
                continue;
            }
            let Some(pos) = physics.position(body).or_skip("blast target") else {
                continue;
            };
            let delta = pos - det.origin;
            let dist = delta.length();
            let dir = if dist < 1e-4 {
                random_direction(rng)
            } else {
                delta / dist
            };

            let mag = blast_impulse_magnitude(dist);
            if physics.apply_impulse(body, dir * mag).or_skip("blast impulse").is_none() {
                continue;
            }

            let t = mag * TORQUE_SCALE;
            let torque = Vec3::new(
                (rng.random::<f32>() - 0.5) * t,
                (rng.random::<f32>() - 0.5) * t,
                (rng.random::<f32>() - 0.5) * t,
            );
            physics.apply_torque_impulse(body, torque).or_skip("blast torque");
            report.pushed.push((body, mag));
        }

        if report.ended_game {
            log::info!("Player caught in blast ({} bodies pushed)", report.pushed.len());
        }

        report
    }

    /// Age bursts and drop finished ones. Bursts outlive the session that spawned them
    /// only until the next restart.
    pub fn advance(&mut self, session: &Session, dt: f32) {
        if self.generation != session.generation() {
            self.generation = session.generation();
            self.bursts.clear();
        }
        for b in self.bursts.iter_mut() {
            b.advance(dt);
        }
        self.bursts.retain(|b| !b.is_done());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::BodyDesc;
    use crate::sim::sandbox::SandboxWorld;

    #[test]
    fn test_blast_magnitude_falloff() {
        assert!((blast_impulse_magnitude(0.0) - 10_000.0).abs() < 0.5);
        assert!((blast_impulse_magnitude(4.9) - 4.0).abs() < 1e-4);
        assert!(blast_impulse_magnitude(1.0) > blast_impulse_magnitude(2.0));
    }

    #[test]
    fn test_burst_is_deterministic_per_id() {
        let a = ExplosionBurst::new(42, Vec3::new(1.0, 2.0, 3.0));
        let b = ExplosionBurst::new(42, Vec3::new(1.0, 2.0, 3.0));
        let c = ExplosionBurst::new(43, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(a, b);
        assert_ne!(a.particles, c.particles);
        assert_eq!(a.particles.len(), BURST_PARTICLES);
        // Particles start within 1.5 of the origin and fly upward-ish
        for p in &a.particles {
            assert!(p.pos.distance(a.origin) <= 1.5 + 1e-4);
            assert!(p.vel.y >= 0.0);
        }
    }

    #[test]
    fn test_burst_expires_after_one_second() {
        let mut s = Session::new();
        s.start_game();
        let mut ex = Explosions::new();
        ex.advance(&s, 0.0);
        ex.bursts.push(ExplosionBurst::new(1, Vec3::ZERO));
        for _ in 0..60 {
            ex.advance(&s, 1.0 / 60.0);
        }
        assert_eq!(ex.bursts().len(), 1);
        ex.advance(&s, 0.05);
        assert!(ex.bursts().is_empty());
    }

    fn bomb_at(physics: &mut SandboxWorld, origin: Vec3, hits_player: bool) -> Detonation {
        let body = physics.spawn_body(BodyDesc::dynamic(origin, 0.3, 1.0, 0.5));
        Detonation {
            projectile_id: 7,
            body,
            origin,
            hits_player,
        }
    }

    #[test]
    fn test_player_hit_ends_game() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let torso = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 1.0, 0.0), 0.7, 8.0, 0.1));

        let mut s = Session::new();
        s.start_game();
        let det = bomb_at(&mut physics, Vec3::new(1.0, 1.0, 0.0), true);

        let mut ex = Explosions::new();
        let report = ex.detonate(&mut s, &mut physics, &det, &mut rng);

        assert!(report.ended_game);
        assert!(s.is_game_over && !s.is_playing);
        assert_eq!(s.game_over_cause, GameOverCause::BombExplosion);
        assert!((s.shake.intensity - BLAST_SHAKE).abs() < 1e-6);
        assert_eq!(ex.bursts().len(), 1);

        // Torso pushed away from the blast along -x with 100/1.1^2 impulse
        let v = physics.linear_velocity(torso).unwrap();
        let expected = blast_impulse_magnitude(1.0) / 8.0;
        assert!((v.x + expected).abs() < 1e-3, "velocity {v}");
    }

    #[test]
    fn test_blast_skips_far_bodies_and_self() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(2);
        let near = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 1.0, 2.0), 0.3, 1.0, 0.5));
        let far = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 1.0, 9.0), 0.3, 1.0, 0.5));

        let mut s = Session::new();
        s.start_game();
        let det = bomb_at(&mut physics, Vec3::new(0.0, 1.0, 0.0), false);
        let mut ex = Explosions::new();
        let report = ex.detonate(&mut s, &mut physics, &det, &mut rng);

        assert!(!report.ended_game);
        assert!(s.is_playing);
        assert_eq!(report.pushed.len(), 1);
        assert_eq!(report.pushed[0].0, near);
        assert_eq!(physics.linear_velocity(far).unwrap(), Vec3::ZERO);
        assert_eq!(physics.linear_velocity(det.body).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_zero_distance_uses_random_direction() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let origin = Vec3::new(0.0, 2.0, 0.0);
        let stacked = physics.spawn_body(BodyDesc::dynamic(origin, 0.3, 1.0, 0.5));

        let mut s = Session::new();
        s.start_game();
        let det = bomb_at(&mut physics, origin, false);
        let mut ex = Explosions::new();
        let report = ex.detonate(&mut s, &mut physics, &det, &mut rng);

        assert_eq!(report.pushed.len(), 1);
        let v = physics.linear_velocity(stacked).unwrap();
        assert!(v.is_finite());
        assert!((v.length() - blast_impulse_magnitude(0.0)).abs() < 1.0);
    }
}
