//! Ball spawner and per-step projectile forces
//!
//! Spawn cadence comes from the difficulty curve; every live ball gets one
//! lead-targeted launch impulse, then a random swerve each step (plus wind
//! while the WIND event runs). Volatile balls arm a fuse and report
//! detonations back to the caller.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty;
use super::physics::{BodyDesc, BodyHandle, BodyRegistry, BodyRole, Contact, OrSkip, PhysicsWorld};
use super::state::{EventKind, Session};
use crate::consts::*;

/// Ball types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    Standard,
    /// Big, floaty beach ball
    Light,
    Heavy,
    /// Bomb: detonates on contact or when its fuse runs out
    Volatile,
}

impl ProjectileKind {
    pub fn mass(&self) -> f32 {
        match self {
            ProjectileKind::Standard => 1.0,
            ProjectileKind::Light => 0.2,
            ProjectileKind::Heavy => 5.0,
            ProjectileKind::Volatile => 1.0,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            ProjectileKind::Standard => 0.3,
            ProjectileKind::Light => 0.5,
            ProjectileKind::Heavy => 0.4,
            ProjectileKind::Volatile => 0.3,
        }
    }

    pub fn restitution(&self) -> f32 {
        match self {
            ProjectileKind::Standard => 0.8,
            ProjectileKind::Light => 0.9,
            ProjectileKind::Heavy => 0.2,
            ProjectileKind::Volatile => 0.5,
        }
    }

    /// Launch impulse toward the player
    pub fn targeting_force(&self) -> f32 {
        match self {
            ProjectileKind::Heavy => 50.0,
            ProjectileKind::Light => 5.0,
            ProjectileKind::Standard | ProjectileKind::Volatile => 20.0,
        }
    }

    pub fn body_desc(&self, position: Vec3) -> BodyDesc {
        BodyDesc::dynamic(position, self.radius(), self.mass(), self.restitution())
    }
}

/// A live ball. Position and velocity live in the physics world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u64,
    pub body: BodyHandle,
    pub kind: ProjectileKind,
    /// Session elapsed seconds at spawn
    pub spawned_at: f32,
    pub has_been_targeted: bool,
    pub has_detonated: bool,
}

impl Projectile {
    #[inline]
    pub fn age(&self, elapsed: f32) -> f32 {
        elapsed - self.spawned_at
    }
}

/// A volatile ball that needs to explode this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    pub projectile_id: u64,
    pub body: BodyHandle,
    pub origin: Vec3,
    /// Set when the ball went off against one of the player's bodies
    pub hits_player: bool,
}

/// Weighted kind draw; heavier mixes late and during GIANT_BALL
pub fn draw_kind<R: Rng>(rng: &mut R, elapsed: f32, event: Option<EventKind>) -> ProjectileKind {
    let roll: f32 = rng.random();

    if event == Some(EventKind::GiantBall) && rng.random_bool(0.5) {
        return ProjectileKind::Heavy;
    }
    if elapsed >= 120.0 && roll > 0.75 {
        return ProjectileKind::Volatile;
    }
    if roll > 0.93 {
        ProjectileKind::Volatile
    } else if roll > 0.75 {
        ProjectileKind::Heavy
    } else if roll > 0.55 {
        ProjectileKind::Light
    } else {
        ProjectileKind::Standard
    }
}

/// Random point just outside the arena on the left or right
pub fn spawn_position<R: Rng>(rng: &mut R) -> Vec3 {
    let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let x = side * (SPAWN_MIN_X + rng.random::<f32>() * SPAWN_X_SPREAD);
    let y = 2.0 + rng.random::<f32>() * 5.0;
    let z = -5.0 + rng.random::<f32>() * 10.0;
    Vec3::new(x, y, z)
}

/// Sideways swerve impulse for one step, or zero for slow balls
pub fn curve_impulse(velocity: Vec3, mass: f32, random_coeff: f32, dt: f32) -> Vec3 {
    if velocity.length() <= 1.0 {
        return Vec3::ZERO;
    }
    let side = Vec3::Y.cross(velocity).normalize_or_zero();
    side * (2.0 + random_coeff) * mass * dt
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    accumulator: f32,
    /// Oldest first
    projectiles: Vec<Projectile>,
    next_id: u64,
    generation: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    fn find_by_body(&self, body: BodyHandle) -> Option<usize> {
        self.projectiles.iter().position(|p| p.body == body)
    }

    /// Drop every ball and the accumulator
    pub fn clear<P: PhysicsWorld>(&mut self, physics: &mut P) {
        for p in self.projectiles.drain(..) {
            physics.despawn(p.body);
        }
        self.accumulator = 0.0;
    }

    /// Remove one ball (after it exploded)
    pub fn despawn<P: PhysicsWorld>(&mut self, id: u64, physics: &mut P) {
        if let Some(i) = self.projectiles.iter().position(|p| p.id == id) {
            let p = self.projectiles.remove(i);
            physics.despawn(p.body);
        }
    }

    /// Spawn one ball of `kind` at `position`
    pub fn spawn<P: PhysicsWorld>(
        &mut self,
        physics: &mut P,
        kind: ProjectileKind,
        position: Vec3,
        elapsed: f32,
    ) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let body = physics.spawn_body(kind.body_desc(position));
        self.projectiles.push(Projectile {
            id,
            body,
            kind,
            spawned_at: elapsed,
            has_been_targeted: false,
            has_detonated: false,
        });
        id
    }

    /// Enforce the live cap by dropping the oldest balls
    pub fn enforce_cap<P: PhysicsWorld>(&mut self, physics: &mut P) {
        if self.projectiles.len() <= MAX_PROJECTILES {
            return;
        }
        let excess = self.projectiles.len() - MAX_PROJECTILES;
        for p in self.projectiles.drain(..excess) {
            physics.despawn(p.body);
        }
    }

    /// Accumulate time and spawn due balls. Returns how many were spawned.
    fn run_spawns<P: PhysicsWorld, R: Rng>(
        &mut self,
        session: &Session,
        physics: &mut P,
        rng: &mut R,
        dt: f32,
    ) -> u32 {
        let elapsed = session.elapsed();
        let event = session.active_event_kind();

        self.accumulator += dt.max(0.0);
        let interval = difficulty::spawn_interval_secs(elapsed);
        let due = (self.accumulator / interval).floor();
        if due < 1.0 {
            return 0;
        }
        self.accumulator -= due * interval;
        if !self.accumulator.is_finite() || self.accumulator < 0.0 {
            self.accumulator = 0.0;
        }

        let base = due.min(MAX_SPAWNS_PER_EVAL as f32) as u32;
        let count = difficulty::spawn_count(base, elapsed, event);
        for _ in 0..count {
            let kind = draw_kind(rng, elapsed, event);
            let pos = spawn_position(rng);
            self.spawn(physics, kind, pos, elapsed);
        }
        self.enforce_cap(physics);
        count
    }

    /// One tick: spawn, push every ball, collect detonations, expire old balls.
    ///
    /// Detonated balls stay in the list until the caller has run the blast
    /// and calls `despawn`.
    pub fn advance<P: PhysicsWorld, R: Rng>(
        &mut self,
        session: &Session,
        physics: &mut P,
        bodies: &BodyRegistry,
        contacts: &[Contact],
        rng: &mut R,
        dt: f32,
    ) -> Vec<Detonation> {
        if self.generation != session.generation() {
            self.generation = session.generation();
            self.clear(physics);
        }
        if !session.is_live() {
            if !self.projectiles.is_empty() {
                log::debug!("Clearing {} balls: session stopped", self.projectiles.len());
            }
            self.clear(physics);
            return Vec::new();
        }

        let elapsed = session.elapsed();
        let wind = session.active_event_kind() == Some(EventKind::Wind);

        self.run_spawns(session, physics, rng, dt);

        // Lead target: where the torso will be after the lookahead
        let target = bodies.get(BodyRole::PlayerTorso).and_then(|torso| {
            let pos = physics.position(torso).or_skip("player position")?;
            let vel = physics.linear_velocity(torso).unwrap_or(Vec3::ZERO);
            Some(pos + vel * TARGET_LOOKAHEAD)
        });

        let mut detonations = Vec::new();

        for p in self.projectiles.iter_mut() {
            if p.has_detonated {
                continue;
            }

            if !p.has_been_targeted {
                p.has_been_targeted = true;
                if let (Some(target), Some(pos)) =
                    (target, physics.position(p.body).or_skip("ball position"))
                {
                    let dir = (target - pos).normalize_or_zero();
                    physics
                        .apply_impulse(p.body, dir * p.kind.targeting_force())
                        .or_skip("targeting impulse");
                }
            }

            if let Some(vel) = physics.linear_velocity(p.body).or_skip("ball velocity") {
                let coeff = (rng.random::<f32>() - 0.5) * 2.0;
                let curve = curve_impulse(vel, p.kind.mass(), coeff, dt);
                if curve != Vec3::ZERO {
                    physics.apply_impulse(p.body, curve).or_skip("curve impulse");
                }
            }

            if wind {
                let gust = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 2.0 * dt,
                    0.0,
                    (rng.random::<f32>() - 0.5) * 2.0 * dt,
                );
                physics.apply_impulse(p.body, gust).or_skip("wind impulse");
            }

            if p.kind == ProjectileKind::Volatile && p.age(elapsed) > VOLATILE_FUSE {
                if let Some(det) = arm(p, physics, false) {
                    detonations.push(det);
                }
            }
        }

        // Contact fuses: a bomb touching anything that isn't another ball
        for contact in contacts {
            for (this, other) in [(contact.a, contact.b), (contact.b, contact.a)] {
                let Some(i) = self.find_by_body(this) else {
                    continue;
                };
                if self.find_by_body(other).is_some() {
                    continue;
                }
                let hits_player = bodies.is_player(other);
                let p = &mut self.projectiles[i];
                if p.kind != ProjectileKind::Volatile || p.has_detonated {
                    continue;
                }
                if let Some(det) = arm(p, physics, hits_player) {
                    detonations.push(det);
                }
            }
        }

        // Expire old balls. Detonated balls wait for the caller's despawn
        // unless their body is already gone.
        self.projectiles.retain(|p| {
            let vanished = physics.position(p.body).is_err();
            if vanished {
                log::trace!("Dropping ball {}: body gone", p.id);
            }
            let keep = !vanished && (p.has_detonated || p.age(elapsed) < PROJECTILE_TTL);
            if !keep {
                physics.despawn(p.body);
            }
            keep
        });

        detonations
    }
}

/// Mark a ball detonated and capture its blast origin. A ball whose body
/// vanished yields nothing and is dropped by the expiry pass.
fn arm<P: PhysicsWorld>(p: &mut Projectile, physics: &P, hits_player: bool) -> Option<Detonation> {
    p.has_detonated = true;
    let origin = physics.position(p.body).or_skip("detonation origin")?;
    Some(Detonation {
        projectile_id: p.id,
        body: p.body,
        origin,
        hits_player,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sandbox::SandboxWorld;
    use crate::sim::state::ActiveEvent;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn live_session(elapsed: f32) -> Session {
        let mut s = Session::new();
        s.start_game();
        s.set_score(elapsed);
        s
    }

    /// Spawner that has already seen the test session's generation
    fn spawner_for(s: &Session) -> Spawner {
        Spawner {
            next_id: 1,
            generation: s.generation(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_spawn_after_two_seconds() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(7);
        let bodies = BodyRegistry::new();
        let s = live_session(0.0);
        let mut spawner = spawner_for(&s);

        for _ in 0..110 {
            spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 1.0 / 60.0);
        }
        assert!(spawner.is_empty());

        for _ in 0..15 {
            spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 1.0 / 60.0);
        }
        assert_eq!(spawner.len(), 1);
        assert_eq!(physics.body_count(), 1);
    }

    #[test]
    fn test_burst_capped_at_eight() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(8);
        let bodies = BodyRegistry::new();
        let s = live_session(130.0);
        let mut spawner = spawner_for(&s);

        // A huge frame spike still spawns at most 8
        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 5.0);
        assert_eq!(spawner.len(), 8);
    }

    #[test]
    fn test_population_cap_drops_oldest() {
        let mut physics = SandboxWorld::new();
        let mut spawner = Spawner::new();
        for i in 0..(MAX_PROJECTILES + 5) {
            spawner.spawn(&mut physics, ProjectileKind::Standard, Vec3::new(0.0, 50.0, i as f32), 0.0);
        }
        spawner.enforce_cap(&mut physics);

        assert_eq!(spawner.len(), MAX_PROJECTILES);
        assert_eq!(physics.body_count(), MAX_PROJECTILES);
        assert_eq!(spawner.projectiles()[0].id, 6);
    }

    #[test]
    fn test_targeting_impulse_once() {
        let mut physics = SandboxWorld::new();
        physics.set_gravity(Vec3::ZERO);
        let mut rng = Pcg32::seed_from_u64(9);
        let mut bodies = BodyRegistry::new();
        let torso = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 4.0, 0.0), 0.7, 8.0, 0.1));
        bodies.register(BodyRole::PlayerTorso, torso);

        let s = live_session(5.0);
        let mut spawner = spawner_for(&s);
        let id = spawner.spawn(&mut physics, ProjectileKind::Heavy, Vec3::new(15.0, 4.0, 0.0), 5.0);
        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 1.0 / 60.0);

        let p = spawner.get(id).unwrap().clone();
        assert!(p.has_been_targeted);
        // 50 impulse on 5 mass → ~10 u/s toward -x
        let v = physics.linear_velocity(p.body).unwrap();
        assert!(v.x < -9.0 && v.x > -11.0, "velocity {v}");
    }

    #[test]
    fn test_volatile_fuse_detonates_once() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(10);
        let bodies = BodyRegistry::new();
        let s = live_session(8.1);
        let mut spawner = spawner_for(&s);
        let id = spawner.spawn(&mut physics, ProjectileKind::Volatile, Vec3::new(0.0, 50.0, 0.0), 0.0);

        let dets = spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].projectile_id, id);
        assert!(!dets[0].hits_player);

        let dets = spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert!(dets.is_empty());
    }

    #[test]
    fn test_contact_with_player_flags_hit() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut bodies = BodyRegistry::new();
        let head = physics.spawn_body(BodyDesc::dynamic(Vec3::new(0.0, 5.0, 0.0), 0.6, 12.0, 0.1));
        bodies.register(BodyRole::PlayerHead, head);

        let s = live_session(2.0);
        let mut spawner = spawner_for(&s);
        spawner.spawn(&mut physics, ProjectileKind::Volatile, Vec3::new(0.0, 6.0, 0.0), 1.0);
        let bomb = spawner.projectiles()[0].body;
        let other = spawner.spawn(&mut physics, ProjectileKind::Standard, Vec3::new(1.0, 6.0, 0.0), 1.0);
        let other_body = spawner.get(other).unwrap().body;

        let contacts = [
            // Ball-on-ball never sets a bomb off
            Contact { a: bomb, b: other_body, impulse: 5.0 },
            Contact { a: head, b: bomb, impulse: 5.0 },
        ];
        let dets = spawner.advance(&s, &mut physics, &bodies, &contacts, &mut rng, 0.0);
        assert_eq!(dets.len(), 1);
        assert!(dets[0].hits_player);
    }

    #[test]
    fn test_expiry_after_ttl() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(12);
        let bodies = BodyRegistry::new();
        let mut s = live_session(9.9);
        let mut spawner = spawner_for(&s);
        spawner.spawn(&mut physics, ProjectileKind::Standard, Vec3::new(0.0, 50.0, 0.0), 0.0);

        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert_eq!(spawner.len(), 1);

        s.set_score(10.0);
        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert!(spawner.is_empty());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_session_end_clears_everything() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(13);
        let bodies = BodyRegistry::new();
        let mut s = live_session(130.0);
        let mut spawner = spawner_for(&s);
        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 1.0);
        assert!(!spawner.is_empty());

        s.end_game(None);
        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 1.0 / 60.0);
        assert!(spawner.is_empty());
        assert_eq!(physics.body_count(), 0);
        assert_eq!(spawner.accumulator, 0.0);
    }

    #[test]
    fn test_giant_ball_skews_heavy() {
        let mut rng = Pcg32::seed_from_u64(14);
        let heavy = (0..2000)
            .filter(|_| draw_kind(&mut rng, 10.0, Some(EventKind::GiantBall)) == ProjectileKind::Heavy)
            .count();
        // 50% forced + 18% of the rest
        assert!(heavy > 1100 && heavy < 1300, "heavy count {heavy}");
    }

    #[test]
    fn test_late_game_more_volatile() {
        let mut rng = Pcg32::seed_from_u64(15);
        let early = (0..4000)
            .filter(|_| draw_kind(&mut rng, 10.0, None) == ProjectileKind::Volatile)
            .count();
        let late = (0..4000)
            .filter(|_| draw_kind(&mut rng, 130.0, None) == ProjectileKind::Volatile)
            .count();
        assert!(late > early * 2);
    }

    #[test]
    fn test_curve_impulse_perpendicular() {
        let v = Vec3::new(-10.0, 0.0, 0.0);
        let imp = curve_impulse(v, 1.0, 0.0, 1.0);
        assert!(imp.dot(v).abs() < 1e-5);
        assert!((imp.length() - 2.0).abs() < 1e-5);
        assert_eq!(curve_impulse(Vec3::new(0.5, 0.0, 0.0), 1.0, 0.0, 1.0), Vec3::ZERO);
    }

    #[test]
    fn test_spawn_position_outside_arena() {
        let mut rng = Pcg32::seed_from_u64(16);
        for _ in 0..200 {
            let p = spawn_position(&mut rng);
            assert!(p.x.abs() >= SPAWN_MIN_X && p.x.abs() < SPAWN_MIN_X + SPAWN_X_SPREAD);
            assert!(p.y >= 2.0 && p.y < 7.0);
            assert!(p.z >= -5.0 && p.z < 5.0);
        }
    }

    #[test]
    fn test_bomb_with_vanished_body_is_dropped() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(17);
        let bodies = BodyRegistry::new();
        let s = live_session(8.5);
        let mut spawner = spawner_for(&s);
        let id = spawner.spawn(&mut physics, ProjectileKind::Volatile, Vec3::new(0.0, 50.0, 0.0), 0.0);
        let body = spawner.get(id).unwrap().body;
        physics.despawn(body);

        let dets = spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert!(dets.is_empty());
        assert!(spawner.get(id).is_none());
        assert!(spawner.is_empty());
    }

    #[test]
    fn test_detonated_ball_waits_for_despawn() {
        let mut physics = SandboxWorld::new();
        let mut rng = Pcg32::seed_from_u64(18);
        let bodies = BodyRegistry::new();
        let mut s = live_session(8.5);
        let mut spawner = spawner_for(&s);
        let id = spawner.spawn(&mut physics, ProjectileKind::Volatile, Vec3::new(0.0, 50.0, 0.0), 0.0);

        let dets = spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert_eq!(dets.len(), 1);
        s.set_score(30.0);
        spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 0.0);
        assert!(spawner.get(id).is_some_and(|p| p.has_detonated));

        spawner.despawn(id, &mut physics);
        assert!(spawner.is_empty());
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn test_wind_pushes_horizontally() {
        let bodies = BodyRegistry::new();
        let mut calm = live_session(5.0);
        calm.set_active_event(None);
        let mut windy = live_session(5.0);
        windy.set_active_event(Some(ActiveEvent {
            kind: EventKind::Wind,
            ends_at: 13.0,
        }));

        let mut drift = Vec::new();
        for s in [&calm, &windy] {
            let mut physics = SandboxWorld::new();
            physics.set_gravity(Vec3::ZERO);
            let mut rng = Pcg32::seed_from_u64(19);
            let mut spawner = spawner_for(s);
            // At rest with no player: no targeting and no swerve
            let id = spawner.spawn(&mut physics, ProjectileKind::Standard, Vec3::new(0.0, 3.0, 0.0), 5.0);
            for _ in 0..30 {
                spawner.advance(s, &mut physics, &bodies, &[], &mut rng, 1.0 / 60.0);
            }
            let body = spawner.get(id).unwrap().body;
            drift.push(physics.linear_velocity(body).unwrap());
        }

        assert_eq!(drift[0], Vec3::ZERO);
        assert_eq!(drift[1].y, 0.0);
        assert!(drift[1].x != 0.0 || drift[1].z != 0.0);
        // Each gust is at most dt per axis
        assert!(drift[1].x.abs() <= 0.5 && drift[1].z.abs() <= 0.5);
    }

    #[test]
    fn test_multiball_doubles_a_batch() {
        let bodies = BodyRegistry::new();
        let mut counts = Vec::new();
        for event in [None, Some(EventKind::Multiball)] {
            let mut physics = SandboxWorld::new();
            let mut rng = Pcg32::seed_from_u64(20);
            let mut s = live_session(10.0);
            s.set_active_event(event.map(|kind| ActiveEvent { kind, ends_at: 18.0 }));
            let mut spawner = spawner_for(&s);

            // Interval at 10s is 1.9s: exactly one base spawn
            spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 2.0);
            counts.push(spawner.len());
        }
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_giant_ball_event_spawns_heavy_mix() {
        let bodies = BodyRegistry::new();
        let mut heavy = Vec::new();
        for event in [None, Some(EventKind::GiantBall)] {
            let mut physics = SandboxWorld::new();
            let mut rng = Pcg32::seed_from_u64(21);
            let mut s = live_session(10.0);
            s.set_active_event(event.map(|kind| ActiveEvent { kind, ends_at: 18.0 }));
            let mut spawner = spawner_for(&s);

            for _ in 0..200 {
                spawner.advance(&s, &mut physics, &bodies, &[], &mut rng, 2.0);
            }
            let total = spawner.len();
            assert!(total >= 200);
            let count = spawner
                .projectiles()
                .iter()
                .filter(|p| p.kind == ProjectileKind::Heavy)
                .count();
            heavy.push(count as f32 / total as f32);
        }
        // ~18% normally, ~59% while the event runs
        assert!(heavy[0] < 0.3, "normal heavy share {}", heavy[0]);
        assert!(heavy[1] > 0.45, "giant ball heavy share {}", heavy[1]);
    }
}
