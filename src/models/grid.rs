// src/models/grid.rs
//
// Shape of the wall: a `columns` x `rows` grid holding `total` tiles.
// With an explicit tile count the last row may be partial, so not every
// (column, row) key inside the rectangle names a real cell.

use super::{CellId, GridKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
    pub total: usize,
}

impl GridShape {
    /// Square `size` x `size` grid, or `tile_count` tiles laid out `size` wide.
    pub fn new(size: usize, tile_count: Option<usize>) -> Self {
        if size == 0 {
            return Self::default();
        }
        match tile_count {
            Some(total) => Self {
                columns: size,
                rows: total.div_ceil(size),
                total,
            },
            None => Self {
                columns: size,
                rows: size,
                total: size * size,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn key_of(&self, id: CellId) -> GridKey {
        let columns = self.columns.max(1);
        GridKey::new(id.0 % columns, id.0 / columns)
    }

    pub fn id_of(&self, key: GridKey) -> Option<CellId> {
        if key.column >= self.columns || key.row >= self.rows {
            return None;
        }
        let index = key.row * self.columns + key.column;
        (index < self.total).then_some(CellId(index))
    }

    pub fn contains(&self, key: GridKey) -> bool {
        self.id_of(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_grid() {
        let shape = GridShape::new(5, None);
        assert_eq!((shape.columns, shape.rows, shape.total), (5, 5, 25));
        assert_eq!(shape.key_of(CellId(7)), GridKey::new(2, 1));
        assert_eq!(shape.id_of(GridKey::new(2, 1)), Some(CellId(7)));
    }

    #[test]
    fn test_partial_last_row() {
        let shape = GridShape::new(4, Some(10));
        assert_eq!(shape.rows, 3);
        assert!(shape.contains(GridKey::new(1, 2)));
        assert!(!shape.contains(GridKey::new(2, 2)));
        assert!(!shape.contains(GridKey::new(4, 0)));
    }

    #[test]
    fn test_zero_size_is_empty() {
        assert!(GridShape::new(0, Some(12)).is_empty());
    }
}
