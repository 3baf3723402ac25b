// src/content/options.rs
//
// Placement policy for setContent.
// Field names accept both the config's snake_case and the content API's
// camelCase spelling.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    #[default]
    Matrix,
    Axis,
}

// which dimension an axis group occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisDirection {
    #[default]
    Rows,
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssignmentLayout {
    pub mode: AssignmentMode,
    pub axis: AxisDirection,
    #[serde(alias = "axisKey")]
    pub axis_key: String,
    // order of items inside a group and in the fallback pool
    #[serde(alias = "sortOrder")]
    pub sort_order: SortOrder,
    // order of the groups themselves
    #[serde(alias = "axisOrder")]
    pub axis_order: SortOrder,
}

impl Default for AssignmentLayout {
    fn default() -> Self {
        Self {
            mode: AssignmentMode::Matrix,
            axis: AxisDirection::Rows,
            axis_key: "publishedDay".to_string(),
            sort_order: SortOrder::Asc,
            axis_order: SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentOptions {
    #[serde(alias = "repeatContent")]
    pub repeat_content: bool,
    pub layout: AssignmentLayout,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            repeat_content: true,
            layout: AssignmentLayout::default(),
        }
    }
}

impl ContentOptions {
    pub fn matrix(repeat_content: bool) -> Self {
        Self {
            repeat_content,
            layout: AssignmentLayout::default(),
        }
    }

    pub fn axis(repeat_content: bool, axis_key: &str, axis: AxisDirection) -> Self {
        Self {
            repeat_content,
            layout: AssignmentLayout {
                mode: AssignmentMode::Axis,
                axis,
                axis_key: axis_key.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn with_axis_order(mut self, order: SortOrder) -> Self {
        self.layout.axis_order = order;
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.layout.sort_order = order;
        self
    }
}
