// src/layout/masonry.rs
//
// Shortest-column bin packing for non-uniform tiles.
// Runs once per context rebuild; the masonry layout only looks up slots.

use glam::Vec2;

use crate::models::Footprint;

/// Packs `count` tiles into `columns` columns of equal width and returns the
/// centre of every tile, with the whole packing centred on the origin.
pub fn pack<F>(count: usize, columns: usize, column_width: f32, spacing: f32, footprint: F) -> Vec<Vec2>
where
    F: Fn(usize) -> Footprint,
{
    if count == 0 {
        return Vec::new();
    }
    let columns = columns.max(1);
    let pitch = column_width + spacing;
    let mut heights = vec![0.0f32; columns];
    let mut slots = Vec::with_capacity(count);

    for index in 0..count {
        let tile = footprint(index);
        let height = if tile.width > 0.0 {
            column_width * tile.height / tile.width
        } else {
            column_width
        };

        // first shortest column wins ties
        let mut column = 0;
        for (c, h) in heights.iter().enumerate() {
            if *h < heights[column] {
                column = c;
            }
        }

        let x = (column as f32 - (columns as f32 - 1.0) / 2.0) * pitch;
        let y = -(heights[column] + height / 2.0);
        slots.push(Vec2::new(x, y));
        heights[column] += height + spacing;
    }

    let tallest = heights.iter().cloned().fold(0.0f32, f32::max) - spacing;
    let lift = tallest.max(0.0) / 2.0;
    for slot in slots.iter_mut() {
        slot.y += lift;
    }
    slots
}
