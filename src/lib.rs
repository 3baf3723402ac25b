// src/lib.rs

pub mod config;
pub mod content;
pub mod controllers;
pub mod interaction;
pub mod layout;
pub mod models;
pub mod physics;
pub mod utilities;
pub mod wall;

pub use wall::{CellPose, ContentWall, SelectionInfo, WallSettings};
