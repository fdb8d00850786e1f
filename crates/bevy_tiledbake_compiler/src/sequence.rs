//! Tile placement sequencing.
//!
//! The order of the produced tiles is the runtime's paint order: tiles are
//! drawn back to front with no depth buffer, so later tiles overlap earlier
//! ones. Nothing downstream reorders them.

use crate::model::{Horizontal, PlacedTile, RenderOrder, Vertical};

/// Walk a dense row-major grid in `order` and emit every non-empty cell.
///
/// The outer loop runs over rows in the order's vertical direction, the inner
/// loop over columns in its horizontal direction. Cells holding `0` are skipped.
///
/// # Arguments
///
/// * `grid` - `width * height` global ids, row-major
/// * `width`, `height` - Grid size in tiles
/// * `order` - The map's render order
pub fn sequence(grid: &[u32], width: u32, height: u32, order: RenderOrder) -> Vec<PlacedTile> {
    debug_assert_eq!(grid.len(), width as usize * height as usize);

    let rows: Box<dyn Iterator<Item = u32>> = match order.vertical() {
        Vertical::Down => Box::new(0..height),
        Vertical::Up => Box::new((0..height).rev()),
    };

    let mut tiles = Vec::new();
    for y in rows {
        let row_start = y as usize * width as usize;
        let Some(row) = grid.get(row_start..row_start + width as usize) else {
            continue;
        };
        let mut push = |x: u32| {
            let gid = row[x as usize];
            if gid != 0 {
                tiles.push(PlacedTile { gid, x, y });
            }
        };
        match order.horizontal() {
            Horizontal::Right => (0..width).for_each(&mut push),
            Horizontal::Left => (0..width).rev().for_each(&mut push),
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: [u32; 6] = [1, 0, 0, 0, 5, 0];

    fn tile(gid: u32, x: u32, y: u32) -> PlacedTile {
        PlacedTile { gid, x, y }
    }

    #[test]
    fn test_sequence_right_down() {
        let tiles = sequence(&GRID, 3, 2, RenderOrder::RightDown);
        assert_eq!(tiles, vec![tile(1, 0, 0), tile(5, 1, 1)]);
    }

    #[test]
    fn test_sequence_left_up() {
        let tiles = sequence(&GRID, 3, 2, RenderOrder::LeftUp);
        assert_eq!(tiles, vec![tile(5, 1, 1), tile(1, 0, 0)]);
    }

    #[test]
    fn test_sequence_axis_order() {
        // 1 2
        // 3 4
        let grid = [1, 2, 3, 4];
        let gids = |order| -> Vec<u32> {
            sequence(&grid, 2, 2, order).iter().map(|t| t.gid).collect()
        };
        assert_eq!(gids(RenderOrder::RightDown), [1, 2, 3, 4]);
        assert_eq!(gids(RenderOrder::LeftDown), [2, 1, 4, 3]);
        assert_eq!(gids(RenderOrder::RightUp), [3, 4, 1, 2]);
        assert_eq!(gids(RenderOrder::LeftUp), [4, 3, 2, 1]);
    }

    #[test]
    fn test_sequence_visits_each_nonzero_cell_once() {
        let (width, height) = (7u32, 5u32);
        let grid: Vec<u32> = (0..width * height)
            .map(|i| if i % 4 == 1 || i % 5 == 0 { 0 } else { i })
            .collect();
        let nonzero = grid.iter().filter(|gid| **gid != 0).count();

        for order in RenderOrder::ALL {
            let tiles = sequence(&grid, width, height, order);
            assert_eq!(tiles.len(), nonzero);

            let mut seen = vec![false; grid.len()];
            for placed in &tiles {
                let index = (placed.y * width + placed.x) as usize;
                assert_eq!(grid[index], placed.gid);
                assert!(!seen[index], "cell visited twice under {order:?}");
                seen[index] = true;
            }
        }
    }

    #[test]
    fn test_sequence_empty_grid() {
        assert!(sequence(&[], 0, 0, RenderOrder::RightDown).is_empty());
        assert!(sequence(&[0; 4], 2, 2, RenderOrder::LeftUp).is_empty());
    }
}
