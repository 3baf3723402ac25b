// src/config/config_types.rs
//
// Config types for the app.
// Every section has defaults so a partial config.toml still loads.

use serde::Deserialize;

use crate::layout::{ChaosParams, LayoutId, MasonryParams, WaveParams};
use crate::interaction::{RippleConfig, SelectionConfig};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    pub rx_port: u16,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self { rx_port: 9000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub content_file: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            content_file: "content.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: usize,
    pub tile_count: Option<usize>,
    pub cell_size: f32,
    pub spacing: f32,
    pub tile_depth: f32,
    pub scale: f32,
    pub content_footprints: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 8,
            tile_count: None,
            cell_size: 1.0,
            spacing: 0.12,
            tile_depth: 0.05,
            scale: 1.0,
            content_footprints: false,
        }
    }
}

/************************* Layout Configs ********************/
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub initial: LayoutId,
    pub morph_duration: f32,
    pub wave: WaveParams,
    pub masonry: MasonryParams,
    pub chaos: ChaosParams,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            initial: LayoutId::Grid,
            morph_duration: 2.0,
            wave: WaveParams::default(),
            masonry: MasonryParams::default(),
            chaos: ChaosParams::default(),
        }
    }
}

/************************* Interaction Configs ********************/
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub follow_rate: f32,
    pub selection: SelectionConfig,
    pub ripple: RippleConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            follow_rate: 10.0,
            selection: SelectionConfig::default(),
            ripple: RippleConfig::default(),
        }
    }
}
