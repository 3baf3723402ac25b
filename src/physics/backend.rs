// src/physics/backend.rs
//
// The narrow contract between the wall and a rigid-body simulation.
// The wall only creates and removes bodies, flips motion types, drives
// kinematic targets, joins anchors, and reads poses back. Stepping the
// simulation is the host's job.

use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionType {
    // moved by the simulation
    Dynamic,
    // moved by explicit targets, pushes but is never pushed
    Kinematic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
    pub motion: MotionType,
}

pub trait PhysicsBackend {
    /// False until the simulation can accept bodies.
    fn is_ready(&self) -> bool;

    /// None when the backend cannot provide a body right now.
    fn create_body(&mut self, desc: BodyDesc) -> Option<BodyId>;
    fn remove_body(&mut self, body: BodyId);

    fn set_motion_type(&mut self, body: BodyId, motion: MotionType);
    fn set_kinematic_target(&mut self, body: BodyId, position: Vec3, rotation: Quat);
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec3);

    /// Rigid, zero-travel link that makes `body` follow `anchor`.
    fn create_fixed_joint(&mut self, anchor: BodyId, body: BodyId) -> Option<JointId>;
    fn remove_joint(&mut self, joint: JointId);

    /// Last simulated pose, which may predate the latest commands.
    fn body_transform(&self, body: BodyId) -> Option<(Vec3, Quat)>;
}
