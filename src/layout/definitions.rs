// src/layout/definitions.rs
//
// The procedural layouts.
//
// Every layout is a pure function of (index, time, context) returning the
// cell's centre. None of them allocate; masonry reads slots packed ahead of
// time by the context, and chaos reads the context's seeded noise table.
// Positions are centred on the origin with +y up and +z toward the viewer,
// and are multiplied by the context's global scale.

use glam::Vec3;
use serde::Deserialize;
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use super::LayoutContext;

const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Single capability shared by every layout.
pub trait LayoutDefinition {
    fn sample(&self, index: usize, time: f32, ctx: &LayoutContext) -> Vec3;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutId {
    #[default]
    Grid,
    Line,
    Spiral,
    Sphere,
    Helix,
    Chaos,
    Masonry,
}

impl LayoutId {
    pub const ALL: [LayoutId; 7] = [
        LayoutId::Grid,
        LayoutId::Line,
        LayoutId::Spiral,
        LayoutId::Sphere,
        LayoutId::Helix,
        LayoutId::Chaos,
        LayoutId::Masonry,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutId::Grid => "grid",
            LayoutId::Line => "line",
            LayoutId::Spiral => "spiral",
            LayoutId::Sphere => "sphere",
            LayoutId::Helix => "helix",
            LayoutId::Chaos => "chaos",
            LayoutId::Masonry => "masonry",
        }
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LayoutId::ALL
            .iter()
            .find(|id| id.name() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown layout '{}'", s))
    }
}

impl LayoutDefinition for LayoutId {
    fn sample(&self, index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
        let position = match self {
            LayoutId::Grid => grid(index, time, ctx),
            LayoutId::Line => line(index, time, ctx),
            LayoutId::Spiral => spiral(index, time, ctx),
            LayoutId::Sphere => sphere(index, time, ctx),
            LayoutId::Helix => helix(index, time, ctx),
            LayoutId::Chaos => chaos(index, time, ctx),
            LayoutId::Masonry => masonry(index, time, ctx),
        };
        position * ctx.scale
    }
}

fn wave(ctx: &LayoutContext, phase: f32, time: f32) -> f32 {
    ctx.wave.amplitude * (time * ctx.wave.frequency + phase * ctx.wave.phase_spread).sin()
}

// row-major grid, the wave travels along the diagonals
fn grid(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    let columns = ctx.grid_columns();
    let rows = ctx.grid_rows();
    let column = (index % columns) as f32;
    let row = (index / columns) as f32;
    let pitch = ctx.pitch();

    Vec3::new(
        (column - (columns as f32 - 1.0) / 2.0) * pitch,
        ((rows as f32 - 1.0) / 2.0 - row) * pitch,
        wave(ctx, column + row, time),
    )
}

fn line(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    let half = (ctx.total.max(1) as f32 - 1.0) / 2.0;
    let i = index as f32;
    Vec3::new((i - half) * ctx.pitch(), 0.0, wave(ctx, i, time))
}

// golden-angle phyllotaxis, slowly turning
fn spiral(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    let i = index as f32;
    let radius = ctx.pitch() * 0.62 * (i + 0.5).sqrt();
    let angle = i * GOLDEN_ANGLE + time * 0.05;
    Vec3::new(
        radius * angle.cos(),
        radius * angle.sin(),
        wave(ctx, i * 0.25, time),
    )
}

// fibonacci sphere sized so every tile gets roughly one pitch² of surface
fn sphere(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    let n = ctx.total.max(1) as f32;
    let i = index as f32;
    let radius = (ctx.pitch() * (n / (4.0 * PI)).sqrt()).max(ctx.pitch());
    let y = 1.0 - 2.0 * (i + 0.5) / n;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = i * GOLDEN_ANGLE + time * 0.1;
    Vec3::new(
        theta.cos() * ring * radius,
        y * radius,
        theta.sin() * ring * radius,
    )
}

// one grid row per turn
fn helix(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    let per_turn = ctx.grid_columns().max(3) as f32;
    let pitch = ctx.pitch();
    let radius = pitch * per_turn / TAU;
    let turns = ctx.total.max(1) as f32 / per_turn;
    let i = index as f32;
    let angle = i / per_turn * TAU + time * 0.2;
    Vec3::new(
        angle.cos() * radius,
        (turns / 2.0 - i / per_turn) * pitch * 1.1,
        angle.sin() * radius,
    )
}

// loosened grid displaced by three decorrelated noise tracks
fn chaos(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    let columns = ctx.grid_columns();
    let rows = ctx.grid_rows();
    let pitch = ctx.pitch();
    let column = (index % columns) as f32;
    let row = (index / columns) as f32;
    let base = Vec3::new(
        (column - (columns as f32 - 1.0) / 2.0) * pitch * 1.25,
        ((rows as f32 - 1.0) / 2.0 - row) * pitch * 1.25,
        0.0,
    );

    let noise = ctx.noise();
    let x = index as f32 * 0.61;
    let t = time * ctx.chaos.speed;
    let offset = Vec3::new(
        noise.sample(x, t),
        noise.sample(x + 31.7, t),
        noise.sample(x + 71.3, t),
    );
    base + offset * ctx.chaos.amplitude * pitch
}

fn masonry(index: usize, time: f32, ctx: &LayoutContext) -> Vec3 {
    match ctx.masonry_slot(index) {
        Some(slot) => Vec3::new(slot.x, slot.y, wave(ctx, index as f32 * 0.5, time)),
        None => grid(index, time, ctx),
    }
}
