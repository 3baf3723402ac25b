// src/content/assignment.rs
//
// Maps a content list onto the grid.
//
// Matrix mode walks the items row-major, wrapping when repeat is on.
// Axis mode groups items by one metadata key, gives each group a row (or a
// column), then tops up every empty slot from the fallback pool and, when
// repeat is on, from the original list.
//
// Assignment never fails: anything that does not fit a group falls through to
// the fallback pool and gets another chance at the empty slots.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet, VecDeque};

use super::{
    axis::{self, AxisValue, OrderKey},
    AssignmentMode, AxisDirection, ContentOptions, SortOrder,
};
use crate::models::{ContentItem, GridKey, GridShape};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisLabel {
    pub label: String,
    pub raw_value: String,
    pub timestamp: Option<i64>,
    // cells actually filled in this row / column
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Assignment {
    shape: GridShape,
    cells: BTreeMap<GridKey, usize>,
    labels: Vec<AxisLabel>,
    label_axis: AxisDirection,
}

impl Assignment {
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Index into the item list the assignment was built from.
    pub fn get(&self, key: GridKey) -> Option<usize> {
        self.cells.get(&key).copied()
    }

    pub fn item<'a>(&self, key: GridKey, items: &'a [ContentItem]) -> Option<&'a ContentItem> {
        self.get(key).and_then(|index| items.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridKey, usize)> + '_ {
        self.cells.iter().map(|(key, index)| (*key, *index))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// One entry per row (or column) in axis mode, empty in matrix mode.
    pub fn labels(&self) -> &[AxisLabel] {
        &self.labels
    }

    pub fn label_axis(&self) -> AxisDirection {
        self.label_axis
    }
}

pub fn assign(items: &[ContentItem], shape: GridShape, options: &ContentOptions) -> Assignment {
    let mut assignment = Assignment {
        shape,
        cells: BTreeMap::new(),
        labels: Vec::new(),
        label_axis: options.layout.axis,
    };
    if items.is_empty() || shape.is_empty() {
        return assignment;
    }

    match options.layout.mode {
        AssignmentMode::Matrix => assign_matrix(&mut assignment, items, options.repeat_content),
        AssignmentMode::Axis => assign_axis(&mut assignment, items, options),
    }
    assignment
}

/************************** Matrix mode ***********************************/

fn assign_matrix(assignment: &mut Assignment, items: &[ContentItem], repeat: bool) {
    let shape = assignment.shape;
    for cursor in 0..shape.total {
        let index = if cursor < items.len() {
            cursor
        } else if repeat {
            cursor % items.len()
        } else {
            break;
        };
        let key = GridKey::new(cursor % shape.columns, cursor / shape.columns);
        assignment.cells.insert(key, index);
    }
}

/************************** Axis mode *************************************/

struct Group {
    value: AxisValue,
    members: Vec<usize>,
}

// walks the slots of one row or column
fn line_key(axis: AxisDirection, line: usize, position: usize) -> GridKey {
    match axis {
        AxisDirection::Rows => GridKey::new(position, line),
        AxisDirection::Columns => GridKey::new(line, position),
    }
}

fn compare_items(items: &[ContentItem], a: usize, b: usize, order: SortOrder) -> Ordering {
    let ka = axis::sort_key(items[a].sort_value.as_ref());
    let kb = axis::sort_key(items[b].sort_value.as_ref());
    let by_value = match (ka, kb) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.total_cmp(&y),
            SortOrder::Desc => y.total_cmp(&x),
        },
        // items without a usable sort value go last either way
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_value.then_with(|| items[a].id.cmp(&items[b].id))
}

fn assign_axis(assignment: &mut Assignment, items: &[ContentItem], options: &ContentOptions) {
    let shape = assignment.shape;
    let layout = &options.layout;
    let repeat = options.repeat_content;
    let (line_count, line_capacity) = match layout.axis {
        AxisDirection::Rows => (shape.rows, shape.columns),
        AxisDirection::Columns => (shape.columns, shape.rows),
    };

    // group by normalized value
    let mut groups: BTreeMap<OrderKey, Group> = BTreeMap::new();
    let mut fallback: Vec<usize> = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match item.axis_value(&layout.axis_key).and_then(axis::normalize) {
            Some(value) => groups
                .entry(value.key.clone())
                .or_insert_with(|| Group {
                    value,
                    members: Vec::new(),
                })
                .members
                .push(index),
            None => fallback.push(index),
        }
    }

    let mut ordered: Vec<Group> = groups.into_values().collect();
    if layout.axis_order == SortOrder::Desc {
        ordered.reverse();
    }
    if ordered.len() > line_count {
        for overflow in ordered.drain(line_count..) {
            fallback.extend(overflow.members);
        }
    }

    let mut placed: HashSet<&str> = HashSet::new();
    assignment.labels = vec![AxisLabel::default(); line_count];

    for (line, mut group) in ordered.into_iter().enumerate() {
        group
            .members
            .sort_by(|a, b| compare_items(items, *a, *b, layout.sort_order));

        let mut position = 0;
        for index in group.members {
            if !repeat && placed.contains(items[index].id.as_str()) {
                continue;
            }
            // skip slots that do not exist in a partial last row
            while position < line_capacity && !shape.contains(line_key(layout.axis, line, position)) {
                position += 1;
            }
            if position >= line_capacity {
                fallback.push(index);
                continue;
            }
            assignment.cells.insert(line_key(layout.axis, line, position), index);
            placed.insert(items[index].id.as_str());
            position += 1;
        }

        let label = &mut assignment.labels[line];
        label.label = group.value.label;
        label.raw_value = group.value.raw;
        label.timestamp = group.value.timestamp;
    }

    fallback.sort_by(|a, b| compare_items(items, *a, *b, layout.sort_order));
    let mut pool: VecDeque<usize> = fallback.into();
    let mut cycle = 0usize;

    'fill: for line in 0..line_count {
        for position in 0..line_capacity {
            let key = line_key(layout.axis, line, position);
            if !shape.contains(key) || assignment.cells.contains_key(&key) {
                continue;
            }
            loop {
                if let Some(index) = pool.pop_front() {
                    if !repeat && placed.contains(items[index].id.as_str()) {
                        continue;
                    }
                    assignment.cells.insert(key, index);
                    placed.insert(items[index].id.as_str());
                    break;
                } else if repeat {
                    assignment.cells.insert(key, cycle % items.len());
                    cycle += 1;
                    break;
                } else {
                    break 'fill;
                }
            }
        }
    }

    for key in assignment.cells.keys() {
        let line = match layout.axis {
            AxisDirection::Rows => key.row,
            AxisDirection::Columns => key.column,
        };
        if let Some(label) = assignment.labels.get_mut(line) {
            label.count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<ContentItem> {
        (0..count)
            .map(|i| ContentItem::new(format!("item-{:02}", i), format!("Item {}", i)))
            .collect()
    }

    fn ids_in_order(assignment: &Assignment, items: &[ContentItem]) -> Vec<String> {
        assignment
            .iter()
            .map(|(_, index)| items[index].id.clone())
            .collect()
    }

    #[test]
    fn test_empty_items_yield_empty_assignment() {
        let shape = GridShape::new(5, None);
        for options in [
            ContentOptions::matrix(true),
            ContentOptions::axis(true, "publishedDay", AxisDirection::Rows),
        ] {
            let assignment = assign(&[], shape, &options);
            assert!(assignment.is_empty());
            assert!(assignment.labels().iter().all(|l| l.label.is_empty()));
        }
    }

    #[test]
    fn test_matrix_repeat_fills_every_cell() {
        let items = numbered(10);
        let shape = GridShape::new(5, None);
        let assignment = assign(&items, shape, &ContentOptions::matrix(true));

        assert_eq!(assignment.len(), 25);
        for k in 0..25 {
            let key = GridKey::new(k % 5, k / 5);
            assert_eq!(assignment.get(key), Some(k % 10));
        }
        assert!(assignment.labels().is_empty());
    }

    #[test]
    fn test_matrix_without_repeat_leaves_tail_empty() {
        let items = numbered(7);
        let assignment = assign(&items, GridShape::new(3, None), &ContentOptions::matrix(false));
        assert_eq!(assignment.len(), 7);
        assert_eq!(assignment.get(GridKey::new(0, 2)), Some(6));
        assert_eq!(assignment.get(GridKey::new(1, 2)), None);
    }

    #[test]
    fn test_matrix_respects_partial_last_row() {
        let items = numbered(3);
        let assignment = assign(&items, GridShape::new(4, Some(6)), &ContentOptions::matrix(true));
        assert_eq!(assignment.len(), 6);
        assert_eq!(assignment.get(GridKey::new(2, 1)), None);
    }

    fn dated_items() -> Vec<ContentItem> {
        vec![
            ContentItem::new("a1", "A1")
                .with_axis_value("publishedDay", "2024-01-01")
                .with_sort_value(2),
            ContentItem::new("a2", "A2")
                .with_axis_value("publishedDay", "2024-01-01")
                .with_sort_value(1),
            ContentItem::new("b1", "B1")
                .with_axis_value("publishedDay", "2024-01-02")
                .with_sort_value(5),
            ContentItem::new("loose", "No day"),
        ]
    }

    #[test]
    fn test_axis_desc_puts_latest_day_in_row_zero() {
        let items = dated_items();
        let options = ContentOptions::axis(false, "publishedDay", AxisDirection::Rows)
            .with_axis_order(SortOrder::Desc);
        let assignment = assign(&items, GridShape::new(3, None), &options);

        assert_eq!(assignment.item(GridKey::new(0, 0), &items).unwrap().id, "b1");
        assert_eq!(assignment.labels()[0].label, "2024-01-02");
        // within a group, lower sortValue first
        assert_eq!(assignment.item(GridKey::new(0, 1), &items).unwrap().id, "a2");
        assert_eq!(assignment.item(GridKey::new(1, 1), &items).unwrap().id, "a1");
        assert_eq!(assignment.labels()[1].label, "2024-01-01");
    }

    #[test]
    fn test_axis_fallback_fills_gaps_and_counts() {
        let items = dated_items();
        let options = ContentOptions::axis(false, "publishedDay", AxisDirection::Rows);
        let assignment = assign(&items, GridShape::new(3, None), &options);

        // ascending: 2024-01-01 row 0 gets a2, a1, then the loose item
        assert_eq!(assignment.item(GridKey::new(2, 0), &items).unwrap().id, "loose");
        let counts: Vec<usize> = assignment.labels().iter().map(|l| l.count).collect();
        assert_eq!(counts, vec![3, 1, 0]);
        assert_eq!(assignment.labels()[2], AxisLabel::default());
        assert_eq!(assignment.len(), 4);
    }

    #[test]
    fn test_desc_sort_order_within_groups_and_pool() {
        let mut items = dated_items();
        items.push(ContentItem::new("p1", "").with_sort_value(1));
        items.push(ContentItem::new("p3", "").with_sort_value(3));
        let options = ContentOptions::axis(false, "publishedDay", AxisDirection::Rows)
            .with_sort_order(SortOrder::Desc);
        let assignment = assign(&items, GridShape::new(3, None), &options);

        // higher sortValue first inside the 2024-01-01 group
        assert_eq!(assignment.item(GridKey::new(0, 0), &items).unwrap().id, "a1");
        assert_eq!(assignment.item(GridKey::new(1, 0), &items).unwrap().id, "a2");
        assert_eq!(assignment.item(GridKey::new(0, 1), &items).unwrap().id, "b1");
        // pool drains highest first, items without a value last
        assert_eq!(assignment.item(GridKey::new(2, 0), &items).unwrap().id, "p3");
        assert_eq!(assignment.item(GridKey::new(1, 1), &items).unwrap().id, "p1");
        assert_eq!(assignment.item(GridKey::new(2, 1), &items).unwrap().id, "loose");
        assert_eq!(assignment.len(), 6);
    }

    #[test]
    fn test_axis_without_repeat_never_duplicates() {
        let mut items = Vec::new();
        for day in 1..=6 {
            for n in 0..4 {
                items.push(
                    ContentItem::new(format!("d{}-{}", day, n), "")
                        .with_axis_value("publishedDay", format!("2024-02-0{}", day))
                        .with_sort_value(n as i64),
                );
            }
        }
        // a duplicate id and an item without the key
        items.push(ContentItem::new("d1-0", "again").with_axis_value("publishedDay", "2024-02-03"));
        items.push(ContentItem::new("stray", ""));

        let options = ContentOptions::axis(false, "publishedDay", AxisDirection::Rows);
        let assignment = assign(&items, GridShape::new(3, None), &options);

        let ids = ids_in_order(&assignment, &items);
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(assignment.len(), 9);
    }

    #[test]
    fn test_axis_overflow_groups_reach_empty_slots() {
        let items = vec![
            ContentItem::new("g1", "").with_axis_value("topic", 1),
            ContentItem::new("g2", "").with_axis_value("topic", 2),
            ContentItem::new("g3-b", "").with_axis_value("topic", 3).with_sort_value(2),
            ContentItem::new("g3-a", "").with_axis_value("topic", 3).with_sort_value(1),
        ];
        let options = ContentOptions::axis(false, "topic", AxisDirection::Rows);
        let assignment = assign(&items, GridShape::new(2, None), &options);

        assert_eq!(assignment.item(GridKey::new(0, 0), &items).unwrap().id, "g1");
        assert_eq!(assignment.item(GridKey::new(1, 0), &items).unwrap().id, "g3-a");
        assert_eq!(assignment.item(GridKey::new(0, 1), &items).unwrap().id, "g2");
        assert_eq!(assignment.item(GridKey::new(1, 1), &items).unwrap().id, "g3-b");
        assert_eq!(assignment.labels().len(), 2);
        assert!(assignment.labels().iter().all(|l| l.count == 2));
    }

    #[test]
    fn test_axis_overflow_items_move_to_other_lines() {
        let mut items: Vec<ContentItem> = (0..4)
            .map(|n| {
                ContentItem::new(format!("big-{}", n), "")
                    .with_axis_value("topic", "big")
                    .with_sort_value(n)
            })
            .collect();
        items.push(ContentItem::new("small", "").with_axis_value("topic", "small"));

        let options = ContentOptions::axis(false, "topic", AxisDirection::Rows);
        let assignment = assign(&items, GridShape::new(2, None), &options);

        // "big" keeps two, the rest wait in the fallback pool for row 1's gap
        assert_eq!(assignment.item(GridKey::new(0, 0), &items).unwrap().id, "big-0");
        assert_eq!(assignment.item(GridKey::new(1, 0), &items).unwrap().id, "big-1");
        assert_eq!(assignment.item(GridKey::new(0, 1), &items).unwrap().id, "small");
        assert_eq!(assignment.item(GridKey::new(1, 1), &items).unwrap().id, "big-2");
    }

    #[test]
    fn test_axis_repeat_cycles_original_list() {
        let items = dated_items();
        let options = ContentOptions::axis(true, "publishedDay", AxisDirection::Columns);
        let assignment = assign(&items, GridShape::new(3, None), &options);

        assert_eq!(assignment.len(), 9);
        assert_eq!(assignment.label_axis(), AxisDirection::Columns);
        // column 0 holds the 2024-01-01 group top to bottom
        assert_eq!(assignment.item(GridKey::new(0, 0), &items).unwrap().id, "a2");
        assert_eq!(assignment.item(GridKey::new(0, 1), &items).unwrap().id, "a1");
        assert_eq!(assignment.item(GridKey::new(0, 2), &items).unwrap().id, "loose");
        // pool drained, repeat starts from the first original item
        assert_eq!(assignment.item(GridKey::new(1, 1), &items).unwrap().id, "a1");
        assert!(assignment.labels().iter().all(|l| l.count == 3));
    }

    #[test]
    fn test_axis_invalid_values_degrade_to_fallback() {
        let items = vec![
            ContentItem::new("x", "").with_axis_value("day", serde_json::Value::Bool(true)),
            ContentItem::new("y", "").with_axis_value("day", serde_json::Value::Null),
        ];
        let options = ContentOptions::axis(false, "day", AxisDirection::Rows);
        let assignment = assign(&items, GridShape::new(2, None), &options);
        assert_eq!(assignment.len(), 2);
        assert!(assignment.labels().iter().all(|l| l.label.is_empty()));
        assert_eq!(assignment.labels()[0].count, 2);
    }
}
