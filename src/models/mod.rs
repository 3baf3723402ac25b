pub mod cell;
pub mod content;
pub mod grid;
pub mod transform;

pub use cell::{AnchorLink, Cell, CellId, Footprint, GridKey, InteractionPhase, MotionSource};
pub use content::{load_items, parse_items, ContentError, ContentItem};
pub use grid::GridShape;
pub use transform::Transform3D;
