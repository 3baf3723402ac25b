pub mod physics_mode;
pub mod ripple;
pub mod selection;

pub use physics_mode::{authored_pose, PhysicsController};
pub use ripple::{falloff, RippleConfig, RippleState};
pub use selection::SelectionConfig;
