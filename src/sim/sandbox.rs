//! Minimal sphere-body physics world
//!
//! Implements `PhysicsWorld` well enough to drive the core headless and in
//! tests: gravity, damping, a floor plane, sphere-sphere impulses and
//! sensor overlap events. Not a general-purpose engine.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};

use super::physics::{BodyDesc, BodyHandle, BodyKind, Contact, PhysicsError, PhysicsWorld};
use crate::consts::GRAVITY;

/// Floor friction applied on ground contact (per step)
const FLOOR_FRICTION: f32 = 0.98;

#[derive(Debug, Clone)]
struct SandboxBody {
    handle: BodyHandle,
    desc: BodyDesc,
    pos: Vec3,
    vel: Vec3,
    rot: Quat,
    ang_vel: Vec3,
    linear_damping: f32,
    angular_damping: f32,
}

impl SandboxBody {
    fn inv_mass(&self) -> f32 {
        match self.desc.kind {
            BodyKind::Dynamic if self.desc.mass > 0.0 => 1.0 / self.desc.mass,
            _ => 0.0,
        }
    }

    /// Solid sphere moment of inertia
    fn inv_inertia(&self) -> f32 {
        let i = 0.4 * self.desc.mass * self.desc.radius * self.desc.radius;
        if self.desc.kind == BodyKind::Dynamic && i > 0.0 {
            1.0 / i
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct SandboxWorld {
    bodies: Vec<SandboxBody>,
    index: HashMap<BodyHandle, usize>,
    next_id: u32,
    gravity: Vec3,
    floor_y: f32,
    touching: HashSet<(BodyHandle, BodyHandle)>,
    contacts: Vec<Contact>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
            gravity: GRAVITY,
            floor_y: 0.0,
            touching: HashSet::new(),
            contacts: Vec::new(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.index.contains_key(&body)
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn get(&self, body: BodyHandle) -> Result<&SandboxBody, PhysicsError> {
        self.index
            .get(&body)
            .map(|&i| &self.bodies[i])
            .ok_or(PhysicsError::MissingBody(body))
    }

    fn get_mut(&mut self, body: BodyHandle) -> Result<&mut SandboxBody, PhysicsError> {
        match self.index.get(&body) {
            Some(&i) => Ok(&mut self.bodies[i]),
            None => Err(PhysicsError::MissingBody(body)),
        }
    }

    fn get_dynamic_mut(&mut self, body: BodyHandle) -> Result<&mut SandboxBody, PhysicsError> {
        let b = self.get_mut(body)?;
        if b.desc.kind != BodyKind::Dynamic {
            return Err(PhysicsError::NotDynamic(body));
        }
        Ok(b)
    }

    /// Teleport a body (test/setup helper)
    pub fn set_position(&mut self, body: BodyHandle, pos: Vec3) -> Result<(), PhysicsError> {
        self.get_mut(body)?.pos = pos;
        Ok(())
    }

    pub fn set_linear_velocity(&mut self, body: BodyHandle, vel: Vec3) -> Result<(), PhysicsError> {
        self.get_mut(body)?.vel = vel;
        Ok(())
    }

    pub fn set_rotation(&mut self, body: BodyHandle, rot: Quat) -> Result<(), PhysicsError> {
        self.get_mut(body)?.rot = rot.normalize();
        Ok(())
    }

    pub fn angular_velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(self.get(body)?.ang_vel)
    }

    pub fn damping(&self, body: BodyHandle) -> Result<(f32, f32), PhysicsError> {
        let b = self.get(body)?;
        Ok((b.linear_damping, b.angular_damping))
    }

    /// Queue a contact as if the solver had produced it (test helper)
    pub fn push_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Advance the world by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        for b in self.bodies.iter_mut() {
            if b.desc.kind != BodyKind::Dynamic {
                continue;
            }
            b.vel += self.gravity * dt;
            b.vel /= 1.0 + dt * b.linear_damping;
            b.ang_vel /= 1.0 + dt * b.angular_damping;
            b.pos += b.vel * dt;
            let spin = Quat::from_scaled_axis(b.ang_vel * dt);
            b.rot = (spin * b.rot).normalize();

            let floor = self.floor_y + b.desc.radius;
            if b.pos.y < floor {
                b.pos.y = floor;
                if b.vel.y < 0.0 {
                    b.vel.y = -b.vel.y * b.desc.restitution;
                }
                b.vel.x *= FLOOR_FRICTION;
                b.vel.z *= FLOOR_FRICTION;
            }
        }

        self.resolve_overlaps();
    }

    fn resolve_overlaps(&mut self) {
        let mut now_touching = HashSet::new();
        let n = self.bodies.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                if a.desc.kind != BodyKind::Dynamic && b.desc.kind != BodyKind::Dynamic {
                    continue;
                }

                let delta = b.pos - a.pos;
                let dist = delta.length();
                let reach = a.desc.radius + b.desc.radius;
                if dist >= reach {
                    continue;
                }

                let key = if a.handle < b.handle {
                    (a.handle, b.handle)
                } else {
                    (b.handle, a.handle)
                };
                now_touching.insert(key);
                let entered = !self.touching.contains(&key);

                if a.desc.kind == BodyKind::Sensor || b.desc.kind == BodyKind::Sensor {
                    if entered {
                        self.contacts.push(Contact {
                            a: a.handle,
                            b: b.handle,
                            impulse: 0.0,
                        });
                    }
                    continue;
                }

                let normal = if dist > 1e-6 { delta / dist } else { Vec3::Y };
                let inv_a = a.inv_mass();
                let inv_b = b.inv_mass();
                let inv_sum = inv_a + inv_b;
                if inv_sum <= 0.0 {
                    continue;
                }

                // Push apart
                let penetration = reach - dist;
                a.pos -= normal * penetration * (inv_a / inv_sum);
                b.pos += normal * penetration * (inv_b / inv_sum);

                let v_rel = (b.vel - a.vel).dot(normal);
                let mut impulse = 0.0;
                if v_rel < 0.0 {
                    let e = a.desc.restitution.min(b.desc.restitution);
                    impulse = -(1.0 + e) * v_rel / inv_sum;
                    a.vel -= normal * impulse * inv_a;
                    b.vel += normal * impulse * inv_b;
                }

                if entered {
                    self.contacts.push(Contact {
                        a: a.handle,
                        b: b.handle,
                        impulse,
                    });
                }
            }
        }

        self.touching = now_touching;
    }
}

impl PhysicsWorld for SandboxWorld {
    fn spawn_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.index.insert(handle, self.bodies.len());
        self.bodies.push(SandboxBody {
            handle,
            desc,
            pos: desc.position,
            vel: Vec3::ZERO,
            rot: Quat::IDENTITY,
            ang_vel: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
        });
        handle
    }

    fn despawn(&mut self, body: BodyHandle) {
        let Some(i) = self.index.remove(&body) else {
            return;
        };
        self.bodies.swap_remove(i);
        if let Some(moved) = self.bodies.get(i) {
            self.index.insert(moved.handle, i);
        }
        self.touching.retain(|(a, b)| *a != body && *b != body);
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        let b = self.get_dynamic_mut(body)?;
        b.vel += impulse * b.inv_mass();
        Ok(())
    }

    fn apply_torque_impulse(&mut self, body: BodyHandle, torque: Vec3) -> Result<(), PhysicsError> {
        let b = self.get_dynamic_mut(body)?;
        b.ang_vel += torque * b.inv_inertia();
        Ok(())
    }

    fn position(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(self.get(body)?.pos)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(self.get(body)?.vel)
    }

    fn rotation(&self, body: BodyHandle) -> Result<Quat, PhysicsError> {
        Ok(self.get(body)?.rot)
    }

    fn mass(&self, body: BodyHandle) -> Result<f32, PhysicsError> {
        Ok(self.get(body)?.desc.mass)
    }

    fn set_damping(&mut self, body: BodyHandle, linear: f32, angular: f32) -> Result<(), PhysicsError> {
        let b = self.get_dynamic_mut(body)?;
        b.linear_damping = linear.max(0.0);
        b.angular_damping = angular.max(0.0);
        Ok(())
    }

    fn dynamic_bodies_within(&self, center: Vec3, radius: f32) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|b| b.desc.kind == BodyKind::Dynamic && b.pos.distance(center) - b.desc.radius <= radius)
            .map(|b| b.handle)
            .collect()
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }
}
