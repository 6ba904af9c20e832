//! Ragdoll player: spawning the rig and turning controls, microphone level
//! and contacts into forces.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::{BodyDesc, BodyHandle, BodyRegistry, BodyRole, Contact, OrSkip, PhysicsWorld};
use super::state::Session;
use crate::platform::input::InputState;

/// Leg kick torque per held control
pub const LEG_TORQUE: f32 = 200.0 * 0.016;
/// Torso below this height counts as grounded
pub const GROUNDED_HEIGHT: f32 = 0.8;
pub const GROUND_DAMPING: f32 = 5.0;
pub const AIR_DAMPING: f32 = 0.5;
/// Mic level needed to jump
pub const MIC_JUMP_THRESHOLD: f32 = 0.5;
pub const MIC_JUMP_IMPULSE: f32 = 20.0;
/// Posture correction gain
pub const POSTURE_GAIN: f32 = 50.0;
/// Torso contacts below this impulse-per-mass are ignored
pub const CONTACT_SHAKE_THRESHOLD: f32 = 5.0;

const TORSO_MASS: f32 = 8.0;
const HEAD_MASS: f32 = 12.0;
const LEG_MASS: f32 = 2.0;

/// Handles to the ragdoll's bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRig {
    pub torso: BodyHandle,
    pub head: BodyHandle,
    pub left_leg: BodyHandle,
    pub right_leg: BodyHandle,
}

impl PlayerRig {
    /// Spawn the ragdoll with its torso at `origin` and register every part
    pub fn spawn<P: PhysicsWorld>(physics: &mut P, bodies: &mut BodyRegistry, origin: Vec3) -> Self {
        let torso = physics.spawn_body(BodyDesc::dynamic(origin, 0.7, TORSO_MASS, 0.1));
        let head = physics.spawn_body(BodyDesc::dynamic(
            origin + Vec3::new(0.0, 1.2, 0.0),
            0.6,
            HEAD_MASS,
            0.1,
        ));
        let left_leg = physics.spawn_body(BodyDesc::dynamic(
            origin + Vec3::new(-0.3, -1.0, 0.0),
            0.3,
            LEG_MASS,
            0.1,
        ));
        let right_leg = physics.spawn_body(BodyDesc::dynamic(
            origin + Vec3::new(0.3, -1.0, 0.0),
            0.3,
            LEG_MASS,
            0.1,
        ));

        bodies.register(BodyRole::PlayerTorso, torso);
        bodies.register(BodyRole::PlayerHead, head);
        bodies.register(BodyRole::LeftLeg, left_leg);
        bodies.register(BodyRole::RightLeg, right_leg);

        Self {
            torso,
            head,
            left_leg,
            right_leg,
        }
    }
}

/// Microphone-driven presentation values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicFx {
    pub head_scale: f32,
    pub noise_opacity: f32,
    pub chromatic_aberration: f32,
}

impl MicFx {
    pub fn from_volume(mic: f32) -> Self {
        let mic = mic.clamp(0.0, 1.0);
        Self {
            head_scale: 1.0 + mic * 0.5,
            noise_opacity: 0.1 + mic * 0.8,
            chromatic_aberration: if mic > 0.4 { 0.002 * mic } else { 0.0 },
        }
    }
}

impl Default for MicFx {
    fn default() -> Self {
        Self::from_volume(0.0)
    }
}

/// Torque that rotates `up` back toward world up, if the tilt is correctable
pub fn posture_torque(up: Vec3, dt: f32) -> Option<Vec3> {
    let angle = up.angle_between(Vec3::Y);
    if angle > 0.1 && angle < FRAC_PI_2 {
        let axis = up.cross(Vec3::Y).normalize_or_zero();
        Some(axis * angle * POSTURE_GAIN * dt)
    } else {
        None
    }
}

/// Shake caused by a torso contact, if any
pub fn torso_contact_shake(impulse: f32, torso_mass: f32) -> Option<f32> {
    let mass = if torso_mass > 0.0 { torso_mass } else { 1.0 };
    let intensity = impulse / mass;
    (intensity > CONTACT_SHAKE_THRESHOLD).then(|| (intensity / 10.0).min(5.0))
}

fn random_torque<R: Rng>(rng: &mut R, half_range: f32) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * half_range,
        (rng.random::<f32>() - 0.5) * 2.0 * half_range,
        (rng.random::<f32>() - 0.5) * 2.0 * half_range,
    )
}

/// Applies player forces each frame
#[derive(Debug, Clone, Default)]
pub struct PlayerReactor {
    fx: MicFx,
}

impl PlayerReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fx(&self) -> MicFx {
        self.fx
    }

    #[allow(clippy::too_many_arguments)]
    pub fn advance<P: PhysicsWorld, R: Rng>(
        &mut self,
        session: &mut Session,
        physics: &mut P,
        bodies: &BodyRegistry,
        input: &InputState,
        contacts: &[Contact],
        rng: &mut R,
        dt: f32,
    ) -> MicFx {
        self.fx = MicFx::from_volume(session.mic_volume);

        let kick = Vec3::new(-LEG_TORQUE, 0.0, 0.0);
        if input.left_leg {
            if let Some(leg) = bodies.get(BodyRole::LeftLeg) {
                physics.apply_torque_impulse(leg, kick).or_skip("left leg");
            }
        }
        if input.right_leg {
            if let Some(leg) = bodies.get(BodyRole::RightLeg) {
                physics.apply_torque_impulse(leg, kick).or_skip("right leg");
            }
        }

        let Some(torso) = bodies.get(BodyRole::PlayerTorso) else {
            return self.fx;
        };

        self.contact_shake(session, physics, torso, contacts);

        if !session.is_playing || bodies.get(BodyRole::PlayerHead).is_none() {
            return self.fx;
        }

        // Recovery
        if input.left_leg && input.right_leg {
            let spasm = Vec3::new(
                (rng.random::<f32>() - 0.5) * 10.0,
                20.0 + rng.random::<f32>() * 10.0,
                (rng.random::<f32>() - 0.5) * 10.0,
            );
            physics.apply_impulse(torso, spasm).or_skip("spasm");
            let torque = random_torque(rng, 5.0);
            physics.apply_torque_impulse(torso, torque).or_skip("spasm torque");
        } else if input.left_leg || input.right_leg {
            physics.apply_impulse(torso, Vec3::new(0.0, 5.0, 0.0)).or_skip("recovery");
            let torque = random_torque(rng, 1.0);
            physics.apply_torque_impulse(torso, torque).or_skip("recovery torque");
        }

        if let Some(pos) = physics.position(torso).or_skip("torso position") {
            let damping = if pos.y < GROUNDED_HEIGHT {
                GROUND_DAMPING
            } else {
                AIR_DAMPING
            };
            physics.set_damping(torso, damping, damping).or_skip("torso damping");
        }

        let mic = session.mic_volume;
        if mic > MIC_JUMP_THRESHOLD {
            physics
                .apply_impulse(torso, Vec3::new(0.0, MIC_JUMP_IMPULSE * mic, 0.0))
                .or_skip("mic jump");
        }

        if let Some(rot) = physics.rotation(torso).or_skip("torso rotation") {
            if let Some(torque) = posture_torque(rot * Vec3::Y, dt) {
                physics.apply_torque_impulse(torso, torque).or_skip("posture");
            }
        }

        self.fx
    }

    fn contact_shake<P: PhysicsWorld>(
        &self,
        session: &mut Session,
        physics: &P,
        torso: BodyHandle,
        contacts: &[Contact],
    ) {
        let hits = contacts.iter().filter(|c| c.other(torso).is_some());
        let mut mass = None;
        for c in hits {
            let m = *mass.get_or_insert_with(|| physics.mass(torso).unwrap_or(1.0));
            if let Some(amount) = torso_contact_shake(c.impulse, m) {
                session.trigger_shake(amount);
            }
        }
    }
}
