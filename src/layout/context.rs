// src/layout/context.rs
//
// The immutable value every layout samples from.
// Patching produces a new context; derived data (masonry slots, noise table)
// is rebuilt on every merge so it can never go stale.

use glam::Vec2;
use serde::Deserialize;

use super::{masonry, NoiseField};
use crate::models::Footprint;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase_spread: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            amplitude: 0.25,
            frequency: 1.2,
            phase_spread: 0.45,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MasonryParams {
    // 0 uses the grid's column count
    pub columns: usize,
    pub spacing: f32,
}

impl Default for MasonryParams {
    fn default() -> Self {
        Self {
            columns: 0,
            spacing: 0.12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChaosParams {
    pub seed: u64,
    // displacement in units of cell pitch
    pub amplitude: f32,
    pub speed: f32,
}

impl Default for ChaosParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            amplitude: 2.5,
            speed: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext {
    pub total: usize,
    pub columns: usize,
    pub rows: usize,
    pub cell_size: f32,
    pub spacing: f32,
    pub tile_depth: f32,
    pub wave: WaveParams,
    pub scale: f32,
    pub footprints: Vec<Footprint>,
    pub masonry: MasonryParams,
    pub chaos: ChaosParams,

    // derived
    masonry_slots: Vec<Vec2>,
    noise: NoiseField,
}

#[derive(Debug, Clone, Default)]
pub struct ContextPatch {
    pub total: Option<usize>,
    pub columns: Option<usize>,
    pub rows: Option<usize>,
    pub cell_size: Option<f32>,
    pub spacing: Option<f32>,
    pub tile_depth: Option<f32>,
    pub wave: Option<WaveParams>,
    pub scale: Option<f32>,
    pub footprints: Option<Vec<Footprint>>,
    pub masonry: Option<MasonryParams>,
    pub chaos: Option<ChaosParams>,
}

impl Default for LayoutContext {
    fn default() -> Self {
        let chaos = ChaosParams::default();
        Self {
            total: 0,
            columns: 0,
            rows: 0,
            cell_size: 1.0,
            spacing: 0.12,
            tile_depth: 0.05,
            wave: WaveParams::default(),
            scale: 1.0,
            footprints: Vec::new(),
            masonry: MasonryParams::default(),
            chaos,
            masonry_slots: Vec::new(),
            noise: NoiseField::new(chaos.seed),
        }
    }
}

impl LayoutContext {
    pub fn merged(&self, patch: &ContextPatch) -> LayoutContext {
        let mut next = LayoutContext {
            total: patch.total.unwrap_or(self.total),
            columns: patch.columns.unwrap_or(self.columns),
            rows: patch.rows.unwrap_or(self.rows),
            cell_size: patch.cell_size.unwrap_or(self.cell_size),
            spacing: patch.spacing.unwrap_or(self.spacing),
            tile_depth: patch.tile_depth.unwrap_or(self.tile_depth),
            wave: patch.wave.unwrap_or(self.wave),
            scale: patch.scale.unwrap_or(self.scale),
            footprints: patch
                .footprints
                .clone()
                .unwrap_or_else(|| self.footprints.clone()),
            masonry: patch.masonry.unwrap_or(self.masonry),
            chaos: patch.chaos.unwrap_or(self.chaos),
            masonry_slots: Vec::new(),
            noise: self.noise.clone(),
        };
        if next.noise.seed() != next.chaos.seed {
            next.noise = NoiseField::new(next.chaos.seed);
        }
        next.masonry_slots = next.pack_masonry();
        next
    }

    fn pack_masonry(&self) -> Vec<Vec2> {
        let columns = if self.masonry.columns > 0 {
            self.masonry.columns
        } else {
            self.columns.max(1)
        };
        masonry::pack(
            self.total,
            columns,
            self.cell_size,
            self.masonry.spacing,
            |index| self.footprint(index),
        )
    }

    /// Distance between neighbouring cell centres.
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.spacing
    }

    pub fn grid_columns(&self) -> usize {
        self.columns.max(1)
    }

    pub fn grid_rows(&self) -> usize {
        if self.rows > 0 {
            self.rows
        } else {
            self.total.div_ceil(self.grid_columns()).max(1)
        }
    }

    pub fn footprint(&self, index: usize) -> Footprint {
        self.footprints
            .get(index)
            .copied()
            .unwrap_or_else(|| Footprint::square(self.cell_size, self.tile_depth))
    }

    pub fn masonry_slot(&self, index: usize) -> Option<Vec2> {
        self.masonry_slots.get(index).copied()
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }
}
