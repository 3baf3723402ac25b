// src/wall.rs
//
// ContentWall: the root of the engine.
//
// Owns the cell arena, the layout engine, the content assignment and the
// physics backend. Everything advances inside `update`; `rebuild` and
// `set_content` replace the grid and its assignment in one call.

use glam::Vec3;
use log::{debug, info};

use crate::content::{assign, Assignment, AxisDirection, AxisLabel, ContentOptions};
use crate::interaction::{
    authored_pose, falloff, selection, PhysicsController, RippleConfig, RippleState,
    SelectionConfig,
};
use crate::layout::{ContextPatch, FieldLayoutEngine, LayoutContext, LayoutId};
use crate::models::{Cell, CellId, ContentItem, Footprint, GridKey, GridShape, Transform3D};
use crate::physics::PhysicsBackend;
use crate::utilities::color::Tint;
use crate::utilities::easing::follow_factor;

#[derive(Debug, Clone, Copy)]
pub struct WallSettings {
    /// Exponential follow rate toward the authored target, 0 snaps
    pub follow_rate: f32,
    /// Size tiles from the item's image aspect
    pub content_footprints: bool,
    pub selection: SelectionConfig,
    pub ripple: RippleConfig,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            follow_rate: 10.0,
            content_footprints: false,
            selection: SelectionConfig::default(),
            ripple: RippleConfig::default(),
        }
    }
}

// what the selection UI shows
#[derive(Debug, Clone, Copy)]
pub struct SelectionInfo<'a> {
    pub key: GridKey,
    pub item: Option<&'a ContentItem>,
    pub tint: Tint,
}

// what the renderer draws for one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPose {
    pub key: GridKey,
    pub transform: Transform3D,
    pub footprint: Footprint,
    pub content: Option<usize>,
}

pub struct ContentWall<B: PhysicsBackend> {
    engine: FieldLayoutEngine,
    settings: WallSettings,
    shape: GridShape,
    cells: Vec<Cell>,
    positions: Vec<Vec3>,
    items: Vec<ContentItem>,
    options: ContentOptions,
    assignment: Assignment,
    selected: Option<CellId>,
    physics: PhysicsController,
    backend: B,
    time: f32,
}

impl<B: PhysicsBackend> ContentWall<B> {
    /// An empty wall; call `rebuild` to create cells.
    pub fn new(context: LayoutContext, layout: LayoutId, settings: WallSettings, backend: B) -> Self {
        Self {
            engine: FieldLayoutEngine::new(layout, context),
            settings,
            shape: GridShape::default(),
            cells: Vec::new(),
            positions: Vec::new(),
            items: Vec::new(),
            options: ContentOptions::default(),
            assignment: Assignment::default(),
            selected: None,
            physics: PhysicsController::new(),
            backend,
            time: 0.0,
        }
    }

    /*************************** Grid & content ***************************/

    /// Replaces the grid. Physics, if on, is re-entered with the new cells.
    pub fn rebuild(&mut self, size: usize, tile_count: Option<usize>) {
        let physics_was_on = self.physics.is_enabled();
        if physics_was_on {
            self.physics.disable(&mut self.backend, &mut self.cells);
        }

        self.shape = GridShape::new(size, tile_count);
        let default_footprint = {
            let context = self.engine.context();
            Footprint::square(context.cell_size, context.tile_depth)
        };
        self.cells = (0..self.shape.total)
            .map(|index| {
                let id = CellId(index);
                Cell::new(id, self.shape.key_of(id), default_footprint)
            })
            .collect();
        self.positions = vec![Vec3::ZERO; self.shape.total];
        self.selected = None;

        self.reassign();
        self.snap_to_layout();
        info!(
            "wall rebuilt: {}x{} ({} cells)",
            self.shape.columns, self.shape.rows, self.shape.total
        );

        if physics_was_on {
            self.physics.enable(&mut self.backend, &mut self.cells);
        }
    }

    pub fn set_content(&mut self, items: Vec<ContentItem>, options: ContentOptions) {
        self.items = items;
        self.options = options;
        self.reassign();
        info!(
            "content set: {} items, {} of {} cells filled",
            self.items.len(),
            self.assignment.len(),
            self.shape.total
        );
    }

    /// Re-runs assignment with the current items under new options.
    pub fn set_content_options(&mut self, options: ContentOptions) {
        self.options = options;
        self.reassign();
    }

    fn reassign(&mut self) {
        self.assignment = assign(&self.items, self.shape, &self.options);

        let context = self.engine.context();
        let (cell_size, depth) = (context.cell_size, context.tile_depth);
        for cell in self.cells.iter_mut() {
            cell.content = self.assignment.get(cell.key);
            let aspect = cell
                .content
                .and_then(|index| self.items.get(index))
                .and_then(|item| item.aspect);
            cell.footprint = match aspect {
                Some(aspect) if self.settings.content_footprints => {
                    Footprint::from_aspect(cell_size, depth, aspect)
                }
                _ => Footprint::square(cell_size, depth),
            };
        }

        let footprints = if self.settings.content_footprints {
            self.cells.iter().map(|cell| cell.footprint).collect()
        } else {
            Vec::new()
        };
        self.engine.set_context(&ContextPatch {
            total: Some(self.shape.total),
            columns: Some(self.shape.columns),
            rows: Some(self.shape.rows),
            footprints: Some(footprints),
            ..Default::default()
        });
    }

    fn snap_to_layout(&mut self) {
        self.engine.sample_into(self.time, &mut self.positions);
        for (cell, position) in self.cells.iter_mut().zip(self.positions.iter()) {
            cell.base = Transform3D::from_translation(*position);
            cell.target = cell.base;
            cell.current = cell.base;
        }
    }

    /*************************** Frame ***************************/

    pub fn update(&mut self, dt: f32, time: f32) {
        let dt = dt.max(0.0);
        self.time = time;

        self.engine.update(dt);
        self.engine.sample_into(time, &mut self.positions);

        let WallSettings {
            selection: selection_config,
            ripple: ripple_config,
            ..
        } = self.settings;
        for (cell, position) in self.cells.iter_mut().zip(self.positions.iter()) {
            cell.base = Transform3D::from_translation(*position);

            cell.selection_progress = selection::step_progress(
                cell.selection_progress,
                cell.selected,
                selection_config.rate,
                dt,
            );
            if let Some(ripple) = cell.ripple.as_mut() {
                if !ripple.advance(dt, &ripple_config) {
                    cell.ripple = None;
                }
            }

            let pop = selection::offset(cell.selection_progress, &selection_config);
            let pulse = cell
                .ripple
                .map_or(Transform3D::default(), |ripple| ripple.offset(&ripple_config));
            cell.target = authored_pose(&cell.base, &[pop, pulse]);
        }

        let morphing = self.engine.is_morphing();
        self.physics
            .sync_anchors(&mut self.backend, &mut self.cells, morphing);
        self.physics.read_back(&self.backend, &mut self.cells);

        let follow = follow_factor(self.settings.follow_rate, dt);
        for cell in self.cells.iter_mut() {
            if self.physics.is_simulated(cell) {
                continue;
            }
            cell.current = if follow >= 1.0 {
                cell.target
            } else {
                cell.current.lerp(&cell.target, follow)
            };
        }
    }

    /*************************** Selection & ripple ***************************/

    /// Selects one cell, or clears the selection with None.
    /// Returns false when the request was ignored.
    pub fn select_cell(&mut self, key: Option<GridKey>) -> bool {
        let Some(key) = key else {
            self.clear_selection();
            return true;
        };
        let Some(id) = self.shape.id_of(key) else {
            debug!("select ignored, no cell at {:?}", key);
            return false;
        };
        if self.cells[id.index()].dragging {
            debug!("select ignored, cell {:?} is being dragged", key);
            return false;
        }
        self.clear_selection();
        self.cells[id.index()].selected = true;
        self.selected = Some(id);
        true
    }

    fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(cell) = self.cells.get_mut(previous.index()) {
                cell.selected = false;
            }
        }
    }

    /// Starts a ripple centred on `key`. Returns the number of cells reached.
    pub fn trigger_ripple(&mut self, key: GridKey) -> usize {
        let Some(id) = self.shape.id_of(key) else {
            debug!("ripple ignored, no cell at {:?}", key);
            return 0;
        };
        if self.cells[id.index()].selected {
            debug!("ripple ignored, cell {:?} is selected", key);
            return 0;
        }

        let radius = self.settings.ripple.radius;
        let impulse = self.settings.ripple.impulse;
        let mut reached = 0;
        for cell in self.cells.iter_mut() {
            let Some(strength) = falloff(cell.key.distance(&key), radius) else {
                continue;
            };
            cell.ripple = Some(RippleState::new(strength));
            self.physics
                .impulse(&mut self.backend, cell, impulse * strength);
            reached += 1;
        }
        reached
    }

    /*************************** Physics ***************************/

    pub fn enable_physics(&mut self) -> usize {
        self.physics.enable(&mut self.backend, &mut self.cells)
    }

    pub fn disable_physics(&mut self) {
        self.physics.disable(&mut self.backend, &mut self.cells);
    }

    pub fn physics_enabled(&self) -> bool {
        self.physics.is_enabled()
    }

    /// Cells left on authored motion because the backend gave them no body.
    pub fn unbacked_cells(&self) -> usize {
        self.physics.unbacked()
    }

    /// Takes a simulated cell under pointer control. Clears its selection.
    pub fn begin_drag(&mut self, key: GridKey) -> bool {
        let Some(id) = self.shape.id_of(key) else {
            return false;
        };
        if !self.physics.is_simulated(&self.cells[id.index()]) {
            debug!("drag ignored for {:?}", key);
            return false;
        }
        if self.selected == Some(id) {
            self.clear_selection();
        }
        self.physics
            .begin_drag(&mut self.backend, &mut self.cells[id.index()])
    }

    pub fn update_drag(&mut self, key: GridKey, point: Vec3) {
        if let Some(id) = self.shape.id_of(key) {
            self.physics
                .update_drag(&mut self.backend, &mut self.cells[id.index()], point);
        }
    }

    pub fn end_drag(&mut self, key: GridKey) {
        let morphing = self.engine.is_morphing();
        if let Some(id) = self.shape.id_of(key) {
            self.physics
                .end_drag(&mut self.backend, &mut self.cells[id.index()], morphing);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The host steps the simulation through this.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /*************************** Layout ***************************/

    pub fn start_morph_to(&mut self, layout: LayoutId, duration: f32) -> bool {
        self.engine.start_morph_to(layout, duration)
    }

    /// Switches layout without a blend.
    pub fn jump_to(&mut self, layout: LayoutId) -> bool {
        self.engine.jump_to(layout)
    }

    pub fn engine(&self) -> &FieldLayoutEngine {
        &self.engine
    }

    /*************************** Outputs ***************************/

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, key: GridKey) -> Option<&Cell> {
        self.shape
            .id_of(key)
            .and_then(|id| self.cells.get(id.index()))
    }

    pub fn cell_poses(&self) -> impl Iterator<Item = CellPose> + '_ {
        self.cells.iter().map(|cell| CellPose {
            key: cell.key,
            transform: cell.current,
            footprint: cell.footprint,
            content: cell.content,
        })
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn content_options(&self) -> &ContentOptions {
        &self.options
    }

    pub fn item_at(&self, key: GridKey) -> Option<&ContentItem> {
        self.assignment.item(key, &self.items)
    }

    pub fn axis_labels(&self) -> &[AxisLabel] {
        self.assignment.labels()
    }

    pub fn label_axis(&self) -> AxisDirection {
        self.assignment.label_axis()
    }

    pub fn selected(&self) -> Option<GridKey> {
        self.selected.map(|id| self.shape.key_of(id))
    }

    pub fn selection_info(&self) -> Option<SelectionInfo<'_>> {
        let cell = self.cells.get(self.selected?.index())?;
        let item = cell.content.and_then(|index| self.items.get(index));
        Some(SelectionInfo {
            key: cell.key,
            item,
            tint: item.map_or(Tint::neutral(), |item| Tint::for_id(&item.id)),
        })
    }

    /// World positions of live anchors, for camera following.
    pub fn anchor_positions(&self) -> Vec<(GridKey, Vec3)> {
        self.cells
            .iter()
            .filter_map(|cell| {
                let anchor = cell.anchor?;
                let (position, _) = self.backend.body_transform(anchor.body)?;
                Some((cell.key, position))
            })
            .collect()
    }
}
