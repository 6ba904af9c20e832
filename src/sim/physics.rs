//! Physics collaborator contract
//!
//! The core never integrates rigid bodies itself. It issues impulses and
//! reads kinematics through `PhysicsWorld`, and finds the player's bodies
//! through a typed `BodyRegistry` rather than a global slot.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque rigid-body handle issued by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("body {0:?} no longer exists")]
    MissingBody(BodyHandle),

    #[error("body {0:?} is not dynamic")]
    NotDynamic(BodyHandle),
}

/// How a body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Dynamic,
    Fixed,
    /// Reports contacts but never collides
    Sensor,
}

/// Spawn parameters for a sphere body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub position: Vec3,
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
    pub kind: BodyKind,
}

impl BodyDesc {
    pub fn dynamic(position: Vec3, radius: f32, mass: f32, restitution: f32) -> Self {
        Self {
            position,
            radius,
            mass,
            restitution,
            kind: BodyKind::Dynamic,
        }
    }
}

/// A contact reported during the last physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Total impulse magnitude exchanged
    pub impulse: f32,
}

impl Contact {
    /// The other body if `body` is part of this contact
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        if self.a == body {
            Some(self.b)
        } else if self.b == body {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Rigid-body simulation the core drives
pub trait PhysicsWorld {
    fn spawn_body(&mut self, desc: BodyDesc) -> BodyHandle;
    /// Removing a missing body is a no-op
    fn despawn(&mut self, body: BodyHandle);

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError>;
    fn apply_torque_impulse(&mut self, body: BodyHandle, torque: Vec3) -> Result<(), PhysicsError>;

    fn position(&self, body: BodyHandle) -> Result<Vec3, PhysicsError>;
    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError>;
    fn rotation(&self, body: BodyHandle) -> Result<Quat, PhysicsError>;
    fn mass(&self, body: BodyHandle) -> Result<f32, PhysicsError>;

    fn set_damping(&mut self, body: BodyHandle, linear: f32, angular: f32) -> Result<(), PhysicsError>;

    /// Dynamic bodies whose colliders overlap the sphere of `radius` around `center`
    fn dynamic_bodies_within(&self, center: Vec3, radius: f32) -> Vec<BodyHandle>;

    fn set_gravity(&mut self, gravity: Vec3);

    /// Contacts gathered since the last call
    fn drain_contacts(&mut self) -> Vec<Contact>;
}

/// Turns "body vanished mid-tick" into a silent skip
pub(crate) trait OrSkip<T> {
    fn or_skip(self, what: &str) -> Option<T>;
}

impl<T> OrSkip<T> for Result<T, PhysicsError> {
    fn or_skip(self, what: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                log::trace!("Skipping {}: {}", what, e);
                None
            }
        }
    }
}

/// Named bodies the core needs to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRole {
    PlayerTorso,
    PlayerHead,
    LeftLeg,
    RightLeg,
    ArenaWall,
    GoalSensor,
}

impl BodyRole {
    pub fn is_player(&self) -> bool {
        matches!(
            self,
            BodyRole::PlayerTorso | BodyRole::PlayerHead | BodyRole::LeftLeg | BodyRole::RightLeg
        )
    }
}

/// Typed lookup from role to body, owned by the session layer
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    by_role: HashMap<BodyRole, Vec<BodyHandle>>,
    by_body: HashMap<BodyHandle, BodyRole>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body. Roles like `ArenaWall` may hold several bodies.
    pub fn register(&mut self, role: BodyRole, body: BodyHandle) {
        self.by_role.entry(role).or_default().push(body);
        self.by_body.insert(body, role);
    }

    pub fn unregister(&mut self, body: BodyHandle) {
        if let Some(role) = self.by_body.remove(&body) {
            if let Some(list) = self.by_role.get_mut(&role) {
                list.retain(|b| *b != body);
            }
        }
    }

    /// First body registered under `role`
    pub fn get(&self, role: BodyRole) -> Option<BodyHandle> {
        self.by_role.get(&role).and_then(|v| v.first().copied())
    }

    pub fn all(&self, role: BodyRole) -> &[BodyHandle] {
        self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn role_of(&self, body: BodyHandle) -> Option<BodyRole> {
        self.by_body.get(&body).copied()
    }

    pub fn is_player(&self, body: BodyHandle) -> bool {
        self.role_of(body).is_some_and(|r| r.is_player())
    }
}
