pub mod osc;

pub use osc::{OscController, WallCommand};
