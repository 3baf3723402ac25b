// src/interaction/physics_mode.rs
//
// Physics mode hands cell transforms to a simulation backend.
//
// Entering snapshots every cell into a dynamic body; leaving reads the last
// simulated pose back and drops the bodies. While a morph runs, each free body
// is pinned to a kinematic anchor that follows the authored path, so the body
// is carried along instead of being teleported.

use glam::{Quat, Vec3};
use log::{debug, info, warn};

use crate::models::{AnchorLink, Cell, Transform3D};
use crate::physics::{BodyDesc, BodyId, MotionType, PhysicsBackend};

#[derive(Debug, Default)]
pub struct PhysicsController {
    enabled: bool,
    // cells that fell back to authored motion on the last enable
    unbacked: usize,
}

fn half_extents(cell: &Cell) -> Vec3 {
    cell.footprint.to_vec3() * 0.5 * cell.current.scale
}

fn release_anchor<B: PhysicsBackend>(backend: &mut B, cell: &mut Cell) {
    if let Some(anchor) = cell.anchor.take() {
        backend.remove_joint(anchor.joint);
        backend.remove_body(anchor.body);
    }
}

impl PhysicsController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn unbacked(&self) -> usize {
        self.unbacked
    }

    /// Creates a dynamic body for every cell. Returns the number created.
    pub fn enable<B: PhysicsBackend>(&mut self, backend: &mut B, cells: &mut [Cell]) -> usize {
        if self.enabled {
            debug!("physics already enabled");
            return 0;
        }
        self.enabled = true;

        if !backend.is_ready() {
            warn!("physics backend not ready, all cells stay authored until the next toggle");
        }

        let mut created = 0;
        let mut failed = 0;
        for cell in cells.iter_mut() {
            if cell.body.is_some() {
                continue;
            }
            let desc = BodyDesc {
                position: cell.current.translation,
                rotation: cell.current.rotation,
                half_extents: half_extents(cell),
                motion: MotionType::Dynamic,
            };
            match backend.create_body(desc) {
                Some(body) => {
                    cell.body = Some(body);
                    cell.motion = MotionType::Dynamic;
                    created += 1;
                }
                None => failed += 1,
            }
        }

        self.unbacked = failed;
        if failed > 0 {
            warn!(
                "no body for {} of {} cells, falling back to authored motion",
                failed,
                cells.len()
            );
        }
        info!("physics enabled: {} bodies", created);
        created
    }

    /// Drops every body, leaving each cell at its last simulated pose.
    pub fn disable<B: PhysicsBackend>(&mut self, backend: &mut B, cells: &mut [Cell]) {
        if !self.enabled {
            debug!("physics already disabled");
            return;
        }
        self.enabled = false;
        self.unbacked = 0;

        for cell in cells.iter_mut() {
            release_anchor(backend, cell);
            if let Some(body) = cell.body.take() {
                if let Some((position, rotation)) = backend.body_transform(body) {
                    cell.current.translation = position;
                    cell.current.rotation = rotation;
                }
                backend.remove_body(body);
            }
            cell.motion = MotionType::Kinematic;
            cell.dragging = false;
            cell.anchor_suppressed = false;
        }
        info!("physics disabled");
    }

    /// Copies simulated poses into the cells. Keeps the last known pose when
    /// the backend has nothing fresh.
    pub fn read_back<B: PhysicsBackend>(&self, backend: &B, cells: &mut [Cell]) {
        if !self.enabled {
            return;
        }
        for cell in cells.iter_mut() {
            let Some(body) = cell.body else { continue };
            if let Some((position, rotation)) = backend.body_transform(body) {
                cell.current.translation = position;
                cell.current.rotation = rotation;
            }
        }
    }

    /// Creates, drives and releases anchors depending on whether a morph is
    /// running. Call once per frame after the authored targets are known.
    pub fn sync_anchors<B: PhysicsBackend>(
        &self,
        backend: &mut B,
        cells: &mut [Cell],
        morphing: bool,
    ) {
        if !self.enabled {
            return;
        }
        for cell in cells.iter_mut() {
            let Some(body) = cell.body else { continue };

            if !morphing {
                cell.anchor_suppressed = false;
                release_anchor(backend, cell);
                continue;
            }
            if cell.dragging || cell.anchor_suppressed {
                release_anchor(backend, cell);
                continue;
            }

            if cell.anchor.is_none() {
                cell.anchor = Self::create_anchor(backend, cell, body);
            }
            if let Some(anchor) = cell.anchor {
                let rotation = backend
                    .body_transform(anchor.body)
                    .map_or(Quat::IDENTITY, |(_, rotation)| rotation);
                backend.set_kinematic_target(
                    anchor.body,
                    cell.target.translation + anchor.offset,
                    rotation,
                );
            }
        }
    }

    fn create_anchor<B: PhysicsBackend>(
        backend: &mut B,
        cell: &Cell,
        body: BodyId,
    ) -> Option<AnchorLink> {
        let (position, rotation) = backend
            .body_transform(body)
            .unwrap_or((cell.current.translation, cell.current.rotation));
        let desc = BodyDesc {
            position,
            rotation,
            half_extents: half_extents(cell),
            motion: MotionType::Kinematic,
        };
        let Some(anchor_body) = backend.create_body(desc) else {
            warn!("no anchor body for cell {:?}, it will drift during the morph", cell.key);
            return None;
        };
        let Some(joint) = backend.create_fixed_joint(anchor_body, body) else {
            warn!("no anchor joint for cell {:?}", cell.key);
            backend.remove_body(anchor_body);
            return None;
        };
        Some(AnchorLink {
            body: anchor_body,
            joint,
            offset: position - cell.target.translation,
        })
    }

    /*************************** Drag ***************************/

    /// Puts a simulated cell under pointer control. False when the cell has no body.
    pub fn begin_drag<B: PhysicsBackend>(&self, backend: &mut B, cell: &mut Cell) -> bool {
        if !self.enabled {
            debug!("drag ignored outside physics mode");
            return false;
        }
        let Some(body) = cell.body else {
            debug!("drag ignored for authored cell {:?}", cell.key);
            return false;
        };
        if cell.dragging {
            return true;
        }
        release_anchor(backend, cell);
        backend.set_motion_type(body, MotionType::Kinematic);
        backend.set_kinematic_target(body, cell.current.translation, cell.current.rotation);
        cell.motion = MotionType::Kinematic;
        cell.dragging = true;
        true
    }

    pub fn update_drag<B: PhysicsBackend>(&self, backend: &mut B, cell: &mut Cell, point: Vec3) {
        if !cell.dragging {
            return;
        }
        if let Some(body) = cell.body {
            backend.set_kinematic_target(body, point, cell.current.rotation);
        }
    }

    /// Hands the cell back to the simulation. A release during a morph keeps
    /// the cell unanchored until the morph ends.
    pub fn end_drag<B: PhysicsBackend>(&self, backend: &mut B, cell: &mut Cell, morphing: bool) {
        if !cell.dragging {
            return;
        }
        cell.dragging = false;
        if let Some(body) = cell.body {
            backend.set_motion_type(body, MotionType::Dynamic);
            cell.motion = MotionType::Dynamic;
        }
        cell.anchor_suppressed = morphing;
    }

    /// Upward push for a rippled cell.
    pub fn impulse<B: PhysicsBackend>(&self, backend: &mut B, cell: &Cell, strength: f32) -> bool {
        match (self.enabled, cell.body) {
            (true, Some(body)) if !cell.dragging => {
                backend.apply_impulse(body, Vec3::Z * strength);
                true
            }
            _ => false,
        }
    }

    /// True when the simulation owns this cell's transform.
    pub fn is_simulated(&self, cell: &Cell) -> bool {
        self.enabled && cell.body.is_some()
    }
}

// target for an authored cell this frame
pub fn authored_pose(base: &Transform3D, offsets: &[Transform3D]) -> Transform3D {
    offsets
        .iter()
        .fold(*base, |pose, offset| pose.combine(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellId, Footprint, GridKey};
    use crate::physics::{PhysicsConfig, SimpleWorld};

    fn cells(count: usize) -> Vec<Cell> {
        (0..count)
            .map(|i| {
                let mut cell = Cell::new(CellId(i), GridKey::new(i, 0), Footprint::square(1.0, 0.1));
                cell.current = Transform3D::from_translation(Vec3::new(i as f32, 0.0, 0.0));
                cell.target = cell.current;
                cell
            })
            .collect()
    }

    #[test]
    fn test_enable_disable_round_trip() {
        let mut world = SimpleWorld::new(PhysicsConfig::default());
        let mut cells = cells(4);
        let before: Vec<Vec3> = cells.iter().map(|c| c.current.translation).collect();

        let mut physics = PhysicsController::new();
        assert_eq!(physics.enable(&mut world, &mut cells), 4);
        assert!(cells.iter().all(|c| c.body.is_some()));
        world.advance(0.5);
        physics.read_back(&world, &mut cells);
        physics.disable(&mut world, &mut cells);

        assert_eq!(world.body_count(), 0);
        for (cell, before) in cells.iter().zip(before) {
            assert!(cell.current.translation.abs_diff_eq(before, 1e-5));
            assert!(cell.body.is_none());
        }
    }

    #[test]
    fn test_unready_backend_falls_back_and_retries() {
        let mut world = SimpleWorld::uninitialized(PhysicsConfig::default());
        let mut cells = cells(3);
        let mut physics = PhysicsController::new();

        assert_eq!(physics.enable(&mut world, &mut cells), 0);
        assert!(physics.is_enabled());
        assert_eq!(physics.unbacked(), 3);
        assert!(cells.iter().all(|c| !physics.is_simulated(c)));

        physics.disable(&mut world, &mut cells);
        world.initialize();
        assert_eq!(physics.enable(&mut world, &mut cells), 3);
        assert_eq!(physics.unbacked(), 0);
    }

    #[test]
    fn test_anchors_live_only_during_morph() {
        let mut world = SimpleWorld::new(PhysicsConfig::default());
        let mut cells = cells(2);
        let mut physics = PhysicsController::new();
        physics.enable(&mut world, &mut cells);

        physics.sync_anchors(&mut world, &mut cells, false);
        assert!(cells.iter().all(|c| c.anchor.is_none()));

        physics.sync_anchors(&mut world, &mut cells, true);
        assert!(cells.iter().all(|c| c.anchor.is_some()));
        assert_eq!(world.joint_count(), 2);

        // authored target moves, the body is carried along
        cells[0].target.translation += Vec3::new(0.0, 2.0, 0.0);
        physics.sync_anchors(&mut world, &mut cells, true);
        world.step(1.0 / 64.0);
        physics.read_back(&world, &mut cells);
        assert!(cells[0].current.translation.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));

        physics.sync_anchors(&mut world, &mut cells, false);
        assert!(cells.iter().all(|c| c.anchor.is_none()));
        assert_eq!(world.joint_count(), 0);
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn test_drag_removes_anchor_and_restores_dynamic() {
        let mut world = SimpleWorld::new(PhysicsConfig::default());
        let mut cells = cells(1);
        let mut physics = PhysicsController::new();
        physics.enable(&mut world, &mut cells);
        physics.sync_anchors(&mut world, &mut cells, true);
        assert!(cells[0].anchor.is_some());

        assert!(physics.begin_drag(&mut world, &mut cells[0]));
        assert!(cells[0].anchor.is_none());
        assert_eq!(cells[0].motion, MotionType::Kinematic);

        physics.update_drag(&mut world, &mut cells[0], Vec3::new(0.0, 0.0, 3.0));
        world.step(1.0 / 64.0);
        physics.read_back(&world, &mut cells);
        assert_eq!(cells[0].current.translation, Vec3::new(0.0, 0.0, 3.0));

        physics.end_drag(&mut world, &mut cells[0], true);
        assert_eq!(cells[0].motion, MotionType::Dynamic);
        let body = cells[0].body.unwrap();
        assert_eq!(world.motion_type(body), Some(MotionType::Dynamic));

        // still morphing: no anchor until the morph is over
        physics.sync_anchors(&mut world, &mut cells, true);
        assert!(cells[0].anchor.is_none());
        physics.sync_anchors(&mut world, &mut cells, false);
        assert!(!cells[0].anchor_suppressed);
    }

    #[test]
    fn test_drag_ignored_in_authored_mode() {
        let mut world = SimpleWorld::new(PhysicsConfig::default());
        let mut cells = cells(1);
        let physics = PhysicsController::new();
        assert!(!physics.begin_drag(&mut world, &mut cells[0]));
        assert!(!cells[0].dragging);
    }

    #[test]
    fn test_authored_pose_stacks_offsets() {
        let base = Transform3D::from_translation(Vec3::X);
        let lift = Transform3D::from_translation(Vec3::Z);
        let pose = authored_pose(&base, &[lift, lift]);
        assert_eq!(pose.translation, Vec3::new(1.0, 0.0, 2.0));
    }
}
