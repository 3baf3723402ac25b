// src/layout/mod.rs
// Procedural layouts, morphing and the per-frame sampling engine

pub mod context;
pub mod definitions;
pub mod engine;
pub mod masonry;
pub mod morph;
pub mod noise;

pub use context::{ChaosParams, ContextPatch, LayoutContext, MasonryParams, WaveParams};
pub use definitions::{LayoutDefinition, LayoutId};
pub use engine::FieldLayoutEngine;
pub use morph::{MorphController, MorphEvent};
pub use noise::NoiseField;
