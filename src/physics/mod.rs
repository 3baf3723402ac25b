pub mod backend;
pub mod simple_world;

pub use backend::{BodyDesc, BodyId, JointId, MotionType, PhysicsBackend};
pub use simple_world::{PhysicsConfig, SimpleWorld};
