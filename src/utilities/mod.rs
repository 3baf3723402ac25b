pub mod color;
pub mod easing;

pub use color::Tint;
pub use easing::EasingType;
