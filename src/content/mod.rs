// src/content/mod.rs
// Content assignment: which item lands in which cell

pub mod assignment;
pub mod axis;
pub mod options;

pub use assignment::{assign, Assignment, AxisLabel};
pub use options::{AssignmentLayout, AssignmentMode, AxisDirection, ContentOptions, SortOrder};
