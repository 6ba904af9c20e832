//! Arena bodies and their reactions
//!
//! Walls shake the camera on hard hits; the goal sensor ends the session
//! when anything but the player enters it.

use glam::Vec3;

use super::physics::{BodyDesc, BodyKind, BodyRegistry, BodyRole, Contact, PhysicsWorld};
use super::state::{GameOverCause, Session};

/// Wall contacts below this impulse are ignored
pub const WALL_SHAKE_THRESHOLD: f32 = 50.0;
/// Ceiling on a single wall hit's shake
pub const WALL_SHAKE_MAX: f32 = 3.0;

/// Back wall plane and goal mouth
const BACK_WALL_Z: f32 = -12.0;
const WALL_SEGMENT_RADIUS: f32 = 1.0;
const GOAL_CENTER: Vec3 = Vec3::new(0.0, 1.0, -9.0);
const GOAL_RADIUS: f32 = 2.0;

/// Shake added by a wall contact, if any
pub fn wall_shake(impulse: f32) -> Option<f32> {
    (impulse > WALL_SHAKE_THRESHOLD).then(|| (impulse / 100.0).min(WALL_SHAKE_MAX))
}

/// Spawn the back wall (as a row of fixed segments) and the goal sensor
pub fn build_arena<P: PhysicsWorld>(physics: &mut P, bodies: &mut BodyRegistry) {
    let mut x = -12.0;
    while x <= 12.0 {
        let wall = physics.spawn_body(BodyDesc {
            position: Vec3::new(x, WALL_SEGMENT_RADIUS, BACK_WALL_Z),
            radius: WALL_SEGMENT_RADIUS,
            mass: 0.0,
            restitution: 0.1,
            kind: BodyKind::Fixed,
        });
        bodies.register(BodyRole::ArenaWall, wall);
        x += 2.0 * WALL_SEGMENT_RADIUS;
    }

    let goal = physics.spawn_body(BodyDesc {
        position: GOAL_CENTER,
        radius: GOAL_RADIUS,
        mass: 0.0,
        restitution: 0.0,
        kind: BodyKind::Sensor,
    });
    bodies.register(BodyRole::GoalSensor, goal);

    log::debug!("Arena built: {} wall segments", bodies.all(BodyRole::ArenaWall).len());
}

/// React to this step's contacts against arena bodies
pub fn react_to_contacts(session: &mut Session, bodies: &BodyRegistry, contacts: &[Contact]) {
    for c in contacts {
        for (this, other) in [(c.a, c.b), (c.b, c.a)] {
            match bodies.role_of(this) {
                Some(BodyRole::ArenaWall) => {
                    if let Some(amount) = wall_shake(c.impulse) {
                        session.trigger_shake(amount);
                    }
                }
                Some(BodyRole::GoalSensor) => {
                    if session.is_live() && !bodies.is_player(other) {
                        log::info!("Goal! {:?} entered the net", other);
                        session.end_game(Some(GameOverCause::Goal));
                    }
                }
                _ => {}
            }
        }
    }
}
