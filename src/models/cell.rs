// src/models/cell.rs
//
// The Cell is the basic element of the wall.
// Cells live in an arena owned by the ContentWall and are addressed by
// CellId, which is also the cell's row-major index in the layout.

use glam::Vec3;

use crate::{
    interaction::RippleState,
    models::Transform3D,
    physics::{BodyId, JointId, MotionType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

// (column, row) address of a cell in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    pub column: usize,
    pub row: usize,
}

impl GridKey {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Euclidean distance in grid-index space.
    pub fn distance(&self, other: &GridKey) -> f32 {
        let dc = self.column as f32 - other.column as f32;
        let dr = self.row as f32 - other.row as f32;
        (dc * dc + dr * dr).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Footprint {
    pub fn square(size: f32, depth: f32) -> Self {
        Self {
            width: size,
            height: size,
            depth,
        }
    }

    // width stays at the cell size, height follows the image aspect
    pub fn from_aspect(cell_size: f32, depth: f32, aspect: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect.clamp(0.5, 2.0)
        } else {
            1.0
        };
        Self {
            width: cell_size,
            height: cell_size / aspect,
            depth,
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Lift,
    Hold,
    Return,
}

// which system owns the cell's transform this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionSource {
    Authored,
    Simulated,
}

// Rigid link between a simulated body and its kinematic anchor.
// The anchor is driven at `authored position + offset` so the body keeps
// whatever displacement it had when the link was made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorLink {
    pub body: BodyId,
    pub joint: JointId,
    pub offset: Vec3,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub id: CellId,
    pub key: GridKey,

    // transforms
    pub base: Transform3D,
    pub target: Transform3D,
    pub current: Transform3D,
    pub footprint: Footprint,

    // index into the wall's content list
    pub content: Option<usize>,

    // interaction state
    pub selected: bool,
    pub selection_progress: f32,
    pub ripple: Option<RippleState>,

    // physics state
    pub body: Option<BodyId>,
    pub motion: MotionType,
    pub anchor: Option<AnchorLink>,
    pub dragging: bool,
    pub anchor_suppressed: bool,
}

impl Cell {
    pub fn new(id: CellId, key: GridKey, footprint: Footprint) -> Self {
        Self {
            id,
            key,
            base: Transform3D::default(),
            target: Transform3D::default(),
            current: Transform3D::default(),
            footprint,
            content: None,
            selected: false,
            selection_progress: 0.0,
            ripple: None,
            body: None,
            motion: MotionType::Kinematic,
            anchor: None,
            dragging: false,
            anchor_suppressed: false,
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        self.ripple
            .as_ref()
            .map_or(InteractionPhase::Idle, |ripple| ripple.phase())
    }

    pub fn governed_by(&self) -> MotionSource {
        if self.body.is_some() {
            MotionSource::Simulated
        } else {
            MotionSource::Authored
        }
    }
}
