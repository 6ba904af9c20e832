//! Camera reactor: ambient FOV wobble, shake jitter, near-miss slow-motion
//! and the game-over death cam.
//!
//! The reactor is the single writer of shake decay. Everyone else only adds.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyPhase;
use super::physics::{BodyRegistry, BodyRole, OrSkip, PhysicsWorld};
use super::spawner::Projectile;
use super::state::{GameOverCause, Session};
use crate::consts::*;
use crate::{lerp, look_rotation};

/// Jitter resample rate
const SHAKE_SAMPLE_HZ: f32 = 30.0;
/// Rotation jitter relative to positional jitter
const SHAKE_ROTATION_SCALE: f32 = 0.02;
/// Base shake once max chaos is reached
const MAX_CHAOS_BASE_SHAKE: f32 = 0.5;

/// Follow-cam duration after an explosion death
const FOLLOW_CAM_SECS: f32 = 2.0;
const FOLLOW_CAM_FOV: f32 = 30.0;

/// Final camera state for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: CAMERA_REST_POS,
            rotation: Quat::IDENTITY,
            fov: DEFAULT_FOV,
        }
    }
}

/// Ambient FOV for the given elapsed time
pub fn ambient_fov(elapsed: f32) -> f32 {
    let (amp, hz) = DifficultyPhase::from_elapsed(elapsed).fov_wobble();
    (DEFAULT_FOV + amp * (elapsed * hz * TAU).sin()).clamp(MIN_FOV, MAX_FOV)
}

/// Per-second shake decay factor
pub fn shake_decay_factor(elapsed: f32) -> f32 {
    if DifficultyPhase::from_elapsed(elapsed).is_max_chaos() {
        0.92
    } else {
        0.6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCamBranch {
    /// Handheld cam riding the head after a blast
    FollowCam,
    /// Slow pull back to the rest pose once the follow cam ends
    ZoomOut,
    /// Any other ending: ease to a fixed offset above the head
    NormalZoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathCam {
    pub branch: DeathCamBranch,
    /// Camera clock value when the session ended
    pub started_at: f32,
    pub last_head: Vec3,
}

/// Random offsets held between 30 Hz resamples
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
struct ShakeSampler {
    accumulator: f32,
    offset: Vec3,
    rot_offset: Vec3,
}

impl ShakeSampler {
    fn advance<R: Rng>(&mut self, rng: &mut R, dt: f32) {
        self.accumulator += dt;
        if self.accumulator < 1.0 / SHAKE_SAMPLE_HZ {
            return;
        }
        self.accumulator = 0.0;
        self.offset = Vec3::new(
            rng.random::<f32>() - 0.5,
            rng.random::<f32>() - 0.5,
            rng.random::<f32>() - 0.5,
        );
        self.rot_offset = Vec3::new(
            (rng.random::<f32>() - 0.5) * 0.5,
            (rng.random::<f32>() - 0.5) * 0.5,
            rng.random::<f32>() - 0.5,
        );
    }
}

/// Transient near-miss slow-motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowMo {
    pub remaining: f32,
    pub time_scale: f32,
}

impl Default for SlowMo {
    fn default() -> Self {
        Self {
            remaining: 0.0,
            time_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraReactor {
    position: Vec3,
    /// Euler offset used when there is no look-at target
    euler: Vec3,
    look_at: Option<Vec3>,
    fov: f32,
    /// Always-running clock; session elapsed is frozen during game over
    clock: f32,
    sampler: ShakeSampler,
    slow_mo: SlowMo,
    death_cam: Option<DeathCam>,
    generation: u32,
}

impl Default for CameraReactor {
    fn default() -> Self {
        Self {
            position: CAMERA_REST_POS,
            euler: Vec3::ZERO,
            look_at: None,
            fov: DEFAULT_FOV,
            clock: 0.0,
            sampler: ShakeSampler::default(),
            slow_mo: SlowMo::default(),
            death_cam: None,
            generation: 0,
        }
    }
}

impl CameraReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physics time-scale (1.0 outside slow-motion)
    pub fn time_scale(&self) -> f32 {
        self.slow_mo.time_scale
    }

    pub fn slow_mo(&self) -> SlowMo {
        self.slow_mo
    }

    pub fn death_cam(&self) -> Option<&DeathCam> {
        self.death_cam.as_ref()
    }

    pub fn pose(&self) -> CameraPose {
        let rotation = match self.look_at {
            Some(target) => look_rotation(target - self.position, Vec3::Y),
            None => Quat::from_euler(EulerRot::XYZ, self.euler.x, self.euler.y, self.euler.z),
        };
        CameraPose {
            position: self.position,
            rotation,
            fov: self.fov,
        }
    }

    /// Advance one frame. `dt` is the unscaled frame delta.
    #[allow(clippy::too_many_arguments)]
    pub fn advance<P: PhysicsWorld, R: Rng>(
        &mut self,
        session: &mut Session,
        physics: &P,
        bodies: &BodyRegistry,
        projectiles: &[Projectile],
        shake_enabled: bool,
        rng: &mut R,
        dt: f32,
    ) -> CameraPose {
        self.clock += dt;

        if self.generation != session.generation() {
            self.generation = session.generation();
            self.slow_mo = SlowMo::default();
            self.death_cam = None;
            self.sampler = ShakeSampler::default();
        }

        if session.is_game_over {
            session.set_shake_intensity(0.0);
            self.end_slow_mo();
            self.advance_death_cam(session, physics, bodies, dt);
        } else if !session.is_playing {
            session.set_shake_intensity(0.0);
            self.end_slow_mo();
            self.death_cam = None;
            self.ease_to_rest(dt);
            self.fov = lerp(self.fov, DEFAULT_FOV, dt * 5.0);
        } else {
            self.death_cam = None;
            self.look_at = None;
            let elapsed = session.elapsed();
            self.fov = ambient_fov(elapsed);
            self.apply_shake(session, shake_enabled, rng, dt);
            self.detect_near_miss(physics, bodies, projectiles, dt);
        }

        self.pose()
    }

    fn ease_to_rest(&mut self, dt: f32) {
        self.look_at = None;
        self.position = self.position.lerp(CAMERA_REST_POS, (dt * 5.0).min(1.0));
        self.euler *= 0.9;
    }

    fn end_slow_mo(&mut self) {
        if self.slow_mo.time_scale != 1.0 {
            log::debug!("Slow-motion cancelled");
        }
        self.slow_mo = SlowMo::default();
    }

    fn apply_shake<R: Rng>(&mut self, session: &mut Session, enabled: bool, rng: &mut R, dt: f32) {
        let elapsed = session.elapsed();
        let base = if DifficultyPhase::from_elapsed(elapsed).is_max_chaos() {
            MAX_CHAOS_BASE_SHAKE
        } else {
            0.0
        };
        let intensity = base + session.shake.intensity;

        self.sampler.advance(rng, dt);

        if intensity > 0.0 && enabled {
            self.position = CAMERA_REST_POS + self.sampler.offset * intensity;
            self.euler = self.sampler.rot_offset * (intensity * SHAKE_ROTATION_SCALE);
        } else {
            self.ease_to_rest(dt);
        }

        session.shake.decay(shake_decay_factor(elapsed), dt);
    }

    fn detect_near_miss<P: PhysicsWorld>(
        &mut self,
        physics: &P,
        bodies: &BodyRegistry,
        projectiles: &[Projectile],
        dt: f32,
    ) {
        if self.slow_mo.remaining > 0.0 {
            self.slow_mo.remaining = (self.slow_mo.remaining - dt).max(0.0);
            if self.slow_mo.remaining == 0.0 {
                self.slow_mo.time_scale = 1.0;
            }
            return;
        }

        let Some(torso) = bodies.get(BodyRole::PlayerTorso) else {
            return;
        };
        let Some(player) = physics.position(torso).or_skip("near-miss player") else {
            return;
        };

        let near = projectiles.iter().filter(|p| !p.has_detonated).any(|p| {
            physics
                .position(p.body)
                .or_skip("near-miss ball")
                .is_some_and(|pos| pos.distance(player) < NEAR_MISS_RADIUS)
        });

        if near && self.slow_mo.time_scale == 1.0 {
            log::debug!("Near miss, slow-motion for {}s", SLOW_MO_DURATION);
            self.slow_mo = SlowMo {
                remaining: SLOW_MO_DURATION,
                time_scale: SLOW_MO_SCALE,
            };
        }
    }

    fn advance_death_cam<P: PhysicsWorld>(
        &mut self,
        session: &Session,
        physics: &P,
        bodies: &BodyRegistry,
        dt: f32,
    ) {
        let head = bodies
            .get(BodyRole::PlayerHead)
            .and_then(|h| physics.position(h).or_skip("death cam head"));

        let cam = self.death_cam.get_or_insert_with(|| {
            let branch = if session.game_over_cause == GameOverCause::BombExplosion {
                DeathCamBranch::FollowCam
            } else {
                DeathCamBranch::NormalZoom
            };
            log::debug!("Death cam {:?}", branch);
            DeathCam {
                branch,
                started_at: self.clock,
                last_head: head.unwrap_or(Vec3::ZERO),
            }
        });

        let Some(head) = head else {
            return;
        };

        match cam.branch {
            DeathCamBranch::FollowCam | DeathCamBranch::ZoomOut => {
                if self.clock - cam.started_at < FOLLOW_CAM_SECS {
                    let mut dir = head - cam.last_head;
                    cam.last_head = head;

                    if dir.length_squared() < 1e-6 {
                        dir = bodies
                            .get(BodyRole::PlayerTorso)
                            .and_then(|t| physics.position(t).or_skip("death cam torso"))
                            .map(|torso| torso - head)
                            .unwrap_or(Vec3::ZERO);
                    }
                    if dir.length_squared() < 1e-6 {
                        dir = Vec3::NEG_Z;
                    }
                    let dir = dir.normalize();

                    self.position = head + Vec3::new(0.0, 0.15, 0.0) - dir * 0.25;
                    self.look_at = Some(head + dir * 10.0);
                    self.fov = FOLLOW_CAM_FOV;
                } else {
                    cam.branch = DeathCamBranch::ZoomOut;
                    self.position = self.position.lerp(CAMERA_REST_POS, (dt * 0.5).min(1.0));
                    self.look_at = Some(head);
                    self.fov = lerp(self.fov, DEFAULT_FOV, dt * 0.5);
                }
            }
            DeathCamBranch::NormalZoom => {
                let target = head + Vec3::new(0.0, 1.0, 3.0);
                self.position = self.position.lerp(target, (dt * 2.0).min(1.0));
                self.look_at = Some(head);
                self.fov = lerp(self.fov, DEFAULT_FOV, dt * 2.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::BodyDesc;
    use crate::sim::sandbox::SandboxWorld;
    use crate::sim::spawner::ProjectileKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        physics: SandboxWorld,
        bodies: BodyRegistry,
        rng: Pcg32,
        session: Session,
        camera: CameraReactor,
    }

    fn rig() -> Rig {
        let mut physics = SandboxWorld::new();
        physics.set_gravity(Vec3::ZERO);
        let mut bodies = BodyRegistry::new();
        let torso = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 1.0, 0.0), 0.5, 8.0, 0.1));
        let head = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 2.0, 0.0), 0.3, 2.0, 0.1));
        bodies.register(BodyRole::PlayerTorso, torso);
        bodies.register(BodyRole::PlayerHead, head);
        Rig {
            physics,
            bodies,
            rng: Pcg32::seed_from_u64(9),
            session: Session::new(),
            camera: CameraReactor::new(),
        }
    }

    impl Rig {
        fn step(&mut self, projectiles: &[Projectile]) -> CameraPose {
            self.camera.advance(
                &mut self.session,
                &self.physics,
                &self.bodies,
                projectiles,
                true,
                &mut self.rng,
                DT,
            )
        }

        fn ball_at(&mut self, pos: Vec3) -> Projectile {
            let body = self.physics.spawn_body(ProjectileKind::Standard.body_desc(pos));
            Projectile {
                id: 1,
                body,
                kind: ProjectileKind::Standard,
                spawned_at: 0.0,
                has_been_targeted: true,
                has_detonated: false,
            }
        }
    }

    #[test]
    fn test_ambient_fov_table() {
        assert_eq!(ambient_fov(10.0), DEFAULT_FOV);
        // Quarter period of 0.8 Hz after 30s
        let t = 30.0 + 1.0 / (4.0 * 0.8);
        assert!((ambient_fov(t) - 52.0).abs() < 1e-2);
        for i in 0..2000 {
            let f = ambient_fov(i as f32 * 0.1);
            assert!((MIN_FOV..=MAX_FOV).contains(&f));
        }
    }

    #[test]
    fn test_near_miss_slow_motion_window() {
        let mut r = rig();
        r.session.start_game();
        r.session.set_score(50.0);
        let ball = r.ball_at(Vec3::new(1.0, 1.0, 0.0));
        let body = ball.body;
        let balls = [ball];

        r.step(&balls);
        assert_eq!(r.camera.time_scale(), SLOW_MO_SCALE);

        // Move the ball away so the window is not re-armed
        r.physics.set_position(body, Vec3::new(20.0, 1.0, 0.0)).unwrap();
        for _ in 0..29 {
            r.step(&balls);
        }
        assert_eq!(r.camera.time_scale(), SLOW_MO_SCALE);

        r.step(&balls);
        r.step(&balls);
        assert_eq!(r.camera.time_scale(), 1.0);
        assert_eq!(r.camera.slow_mo().remaining, 0.0);
    }

    #[test]
    fn test_far_ball_does_not_slow_time() {
        let mut r = rig();
        r.session.start_game();
        let balls = [r.ball_at(Vec3::new(3.0, 1.0, 0.0))];
        r.step(&balls);
        assert_eq!(r.camera.time_scale(), 1.0);
    }

    #[test]
    fn test_shake_decays_and_snaps() {
        let mut r = rig();
        r.session.start_game();
        r.session.set_score(10.0);
        r.session.trigger_shake(2.0);
        // Jitter is resampled at 30 Hz, so give it a few frames
        for _ in 0..3 {
            r.step(&[]);
        }
        assert!(r.session.shake.intensity < 2.0);
        assert_ne!(r.camera.pose().position, CAMERA_REST_POS);

        for _ in 0..60 * 20 {
            r.step(&[]);
        }
        assert_eq!(r.session.shake.intensity, 0.0);
    }

    #[test]
    fn test_max_chaos_decays_slower() {
        assert!(shake_decay_factor(121.0) > shake_decay_factor(50.0));

        let mut slow = ShakeStateProbe::at(121.0);
        let mut fast = ShakeStateProbe::at(50.0);
        slow.run(60);
        fast.run(60);
        assert!(slow.0.shake.intensity > fast.0.shake.intensity);
    }

    struct ShakeStateProbe(Session, CameraReactor, SandboxWorld, BodyRegistry, Pcg32);

    impl ShakeStateProbe {
        fn at(elapsed: f32) -> Self {
            let mut s = Session::new();
            s.start_game();
            s.set_score(elapsed);
            s.trigger_shake(5.0);
            Self(s, CameraReactor::new(), SandboxWorld::new(), BodyRegistry::new(), Pcg32::seed_from_u64(1))
        }

        fn run(&mut self, ticks: usize) {
            for _ in 0..ticks {
                self.1.advance(&mut self.0, &self.2, &self.3, &[], true, &mut self.4, DT);
            }
        }
    }

    #[test]
    fn test_game_over_zeroes_shake_and_starts_death_cam() {
        let mut r = rig();
        r.session.start_game();
        r.session.trigger_shake(4.0);
        r.step(&[]);
        r.session.end_game(Some(GameOverCause::Goal));

        let pose = r.step(&[]);
        assert_eq!(r.session.shake.intensity, 0.0);
        let cam = r.camera.death_cam().expect("death cam");
        assert_eq!(cam.branch, DeathCamBranch::NormalZoom);

        // Eases toward head + (0, 1, 3)
        let target = Vec3::new(0.0, 3.0, 3.0);
        let mut last = pose.position.distance(target);
        for _ in 0..120 {
            let d = r.step(&[]).position.distance(target);
            assert!(d <= last + 1e-4);
            last = d;
        }
        assert!(last < 0.5);
    }

    #[test]
    fn test_explosion_follow_cam_then_zoom_out() {
        let mut r = rig();
        r.session.start_game();
        r.step(&[]);
        r.session.end_game(Some(GameOverCause::BombExplosion));

        let pose = r.step(&[]);
        assert_eq!(pose.fov, FOLLOW_CAM_FOV);
        assert_eq!(r.camera.death_cam().map(|c| c.branch), Some(DeathCamBranch::FollowCam));
        // Head is still: falls back to head -> torso direction (straight down)
        let head = Vec3::new(0.0, 2.0, 0.0);
        let expected = head + Vec3::new(0.0, 0.15, 0.0) + Vec3::new(0.0, 0.25, 0.0);
        assert!(pose.position.distance(expected) < 1e-4);

        for _ in 0..121 {
            r.step(&[]);
        }
        assert_eq!(r.camera.death_cam().map(|c| c.branch), Some(DeathCamBranch::ZoomOut));
        let fov = r.camera.pose().fov;
        assert!(fov > FOLLOW_CAM_FOV && fov < DEFAULT_FOV);
    }

    #[test]
    fn test_idle_returns_to_rest_and_restart_clears_death_cam() {
        let mut r = rig();
        r.session.start_game();
        r.session.end_game(None);
        r.step(&[]);
        assert!(r.camera.death_cam().is_some());

        r.session.reset_game();
        for _ in 0..300 {
            r.step(&[]);
        }
        assert!(r.camera.death_cam().is_none());
        let pose = r.camera.pose();
        assert!(pose.position.distance(CAMERA_REST_POS) < 1e-2);
        assert!((pose.fov - DEFAULT_FOV).abs() < 1e-2);
    }

    #[test]
    fn test_shake_offset_held_between_samples() {
        let mut r = rig();
        r.session.start_game();
        r.session.set_score(50.0);
        r.session.trigger_shake(2.0);

        fn advance(r: &mut Rig, dt: f32) -> CameraPose {
            r.camera
                .advance(&mut r.session, &r.physics, &r.bodies, &[], true, &mut r.rng, dt)
        }

        let first = advance(&mut r, 1.0 / 30.0 + 1e-3);
        let held = r.camera.sampler.offset;
        assert_ne!(held, Vec3::ZERO);
        let dir = (first.position - CAMERA_REST_POS).normalize();

        // 120 Hz frames reuse the sample until 1/30 s has built up
        for _ in 0..3 {
            let pose = advance(&mut r, 1.0 / 120.0);
            assert_eq!(r.camera.sampler.offset, held);
            let d = (pose.position - CAMERA_REST_POS).normalize();
            assert!(d.distance(dir) < 1e-4);
        }

        advance(&mut r, 1.0 / 120.0);
        advance(&mut r, 1.0 / 120.0);
        assert_ne!(r.camera.sampler.offset, held);
    }
}
