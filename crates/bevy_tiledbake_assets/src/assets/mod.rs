use bevy::math::UVec2;

pub mod map;
pub mod tileset;

/// Tileset grid dimensions in tiles (columns, rows).
///
/// Image collection tilesets have no grid and report `UVec2::ZERO`.
pub(crate) fn grid_size(columns: u32, tile_count: u32) -> UVec2 {
    if columns > 0 {
        UVec2::new(columns, tile_count.div_ceil(columns))
    } else {
        UVec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_rounds_rows_up() {
        assert_eq!(grid_size(4, 10), UVec2::new(4, 3));
        assert_eq!(grid_size(4, 8), UVec2::new(4, 2));
    }

    #[test]
    fn test_grid_size_image_collection() {
        assert_eq!(grid_size(0, 12), UVec2::ZERO);
    }
}
