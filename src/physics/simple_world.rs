// src/physics/simple_world.rs
//
// A small deterministic rigid-body world for hosts that do not bring their
// own engine. Bodies are boxes treated as point masses; the only contacts are
// against an optional floor plane. Fixed joints are solved by projection, so
// a jointed body sits exactly on its anchor after every step.

use glam::{Quat, Vec3};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::{BodyDesc, BodyId, JointId, MotionType, PhysicsBackend};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed timestep for integration (64 Hz)
    pub fixed_timestep: f32,
    /// Substeps allowed per rendered frame before time is dropped
    pub max_substeps: u32,
    pub gravity: [f32; 3],
    /// Applied as pow(linear_damping, dt * 100.0)
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub floor_height: Option<f32>,
    pub restitution: f32,
    pub mass: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 64.0,
            max_substeps: 4,
            gravity: [0.0, 0.0, 0.0],
            linear_damping: 0.98,
            angular_damping: 0.95,
            floor_height: None,
            restitution: 0.3,
            mass: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    angular_velocity: Vec3,
    half_extents: Vec3,
    motion: MotionType,
    target: Option<(Vec3, Quat)>,
}

#[derive(Debug, Clone, Copy)]
struct FixedJoint {
    anchor: BodyId,
    body: BodyId,
}

pub struct SimpleWorld {
    config: PhysicsConfig,
    ready: bool,
    bodies: BTreeMap<BodyId, Body>,
    joints: BTreeMap<JointId, FixedJoint>,
    next_body: u32,
    next_joint: u32,
    accumulator: f32,
}

impl SimpleWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            ready: true,
            bodies: BTreeMap::new(),
            joints: BTreeMap::new(),
            next_body: 0,
            next_joint: 0,
            accumulator: 0.0,
        }
    }

    /// A world that refuses bodies until `initialize` is called.
    pub fn uninitialized(config: PhysicsConfig) -> Self {
        Self {
            ready: false,
            ..Self::new(config)
        }
    }

    pub fn initialize(&mut self) {
        self.ready = true;
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn motion_type(&self, body: BodyId) -> Option<MotionType> {
        self.bodies.get(&body).map(|b| b.motion)
    }

    /// Runs as many fixed steps as `frame_dt` covers. Returns the step count.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let step = self.config.fixed_timestep;
        if step <= 0.0 || frame_dt <= 0.0 {
            return 0;
        }
        let budget = step * self.config.max_substeps as f32;
        self.accumulator = (self.accumulator + frame_dt).min(budget);

        let mut steps = 0;
        while self.accumulator >= step && steps < self.config.max_substeps {
            self.step(step);
            self.accumulator -= step;
            steps += 1;
        }
        steps
    }

    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let gravity = Vec3::from_array(self.config.gravity);
        let linear_damping = self.config.linear_damping.powf(dt * 100.0);
        let angular_damping = self.config.angular_damping.powf(dt * 100.0);

        for body in self.bodies.values_mut() {
            match body.motion {
                MotionType::Kinematic => match body.target {
                    Some((position, rotation)) => {
                        body.velocity = (position - body.position) / dt;
                        body.angular_velocity = Vec3::ZERO;
                        body.position = position;
                        body.rotation = rotation;
                    }
                    None => {
                        body.velocity = Vec3::ZERO;
                        body.angular_velocity = Vec3::ZERO;
                    }
                },
                MotionType::Dynamic => {
                    body.velocity = (body.velocity + gravity * dt) * linear_damping;
                    body.angular_velocity *= angular_damping;
                    body.position += body.velocity * dt;

                    let spin = body.angular_velocity * dt;
                    if spin.length_squared() > 1e-12 {
                        body.rotation = (Quat::from_scaled_axis(spin) * body.rotation).normalize();
                    }

                    if let Some(floor) = self.config.floor_height {
                        let bottom = body.position.y - body.half_extents.y;
                        if bottom < floor {
                            body.position.y = floor + body.half_extents.y;
                            if body.velocity.y < 0.0 {
                                body.velocity.y = -body.velocity.y * self.config.restitution;
                            }
                        }
                    }
                }
            }
        }

        // zero-travel joints: the body takes the anchor's pose and velocity
        for joint in self.joints.values() {
            let Some(anchor) = self.bodies.get(&joint.anchor).cloned() else {
                continue;
            };
            if let Some(body) = self.bodies.get_mut(&joint.body) {
                if body.motion == MotionType::Dynamic {
                    body.position = anchor.position;
                    body.rotation = anchor.rotation;
                    body.velocity = anchor.velocity;
                    body.angular_velocity = Vec3::ZERO;
                }
            }
        }
    }
}

impl PhysicsBackend for SimpleWorld {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn create_body(&mut self, desc: BodyDesc) -> Option<BodyId> {
        if !self.ready {
            return None;
        }
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.insert(
            id,
            Body {
                position: desc.position,
                rotation: desc.rotation,
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                half_extents: desc.half_extents,
                motion: desc.motion,
                target: None,
            },
        );
        Some(id)
    }

    fn remove_body(&mut self, body: BodyId) {
        self.bodies.remove(&body);
        self.joints
            .retain(|_, joint| joint.anchor != body && joint.body != body);
    }

    fn set_motion_type(&mut self, body: BodyId, motion: MotionType) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.motion = motion;
            if motion == MotionType::Dynamic {
                b.target = None;
            }
        }
    }

    fn set_kinematic_target(&mut self, body: BodyId, position: Vec3, rotation: Quat) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.motion == MotionType::Kinematic {
                b.target = Some((position, rotation));
            }
        }
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec3) {
        let mass = self.config.mass.max(1e-3);
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.motion == MotionType::Dynamic {
                b.velocity += impulse / mass;
            }
        }
    }

    fn create_fixed_joint(&mut self, anchor: BodyId, body: BodyId) -> Option<JointId> {
        if !self.bodies.contains_key(&anchor) || !self.bodies.contains_key(&body) {
            return None;
        }
        let id = JointId(self.next_joint);
        self.next_joint += 1;
        self.joints.insert(id, FixedJoint { anchor, body });
        Some(id)
    }

    // the freed body stops where the anchor left it instead of coasting on
    // the anchor's last velocity
    fn remove_joint(&mut self, joint: JointId) {
        let Some(joint) = self.joints.remove(&joint) else {
            return;
        };
        if let Some(body) = self.bodies.get_mut(&joint.body) {
            if body.motion == MotionType::Dynamic {
                body.velocity = Vec3::ZERO;
                body.angular_velocity = Vec3::ZERO;
            }
        }
    }

    fn body_transform(&self, body: BodyId) -> Option<(Vec3, Quat)> {
        self.bodies.get(&body).map(|b| (b.position, b.rotation))
    }
}
