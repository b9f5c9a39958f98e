//! Tests for grid sampling, cell dimensions and grid document validation

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use numberpaint::PipelineError;
    use numberpaint::color::Palette;
    use numberpaint::spatial::grid::{
        Cell, CellGrid, GridDocument, block_mean, build_grid, cell_dimensions,
    };

    fn quadrant_image(side: u32) -> RgbImage {
        RgbImage::from_fn(side, side, |x, y| {
            let half = side / 2;
            match (x < half, y < half) {
                (true, true) => Rgb([255, 0, 0]),
                (false, true) => Rgb([0, 255, 0]),
                (true, false) => Rgb([0, 0, 255]),
                (false, false) => Rgb([255, 255, 255]),
            }
        })
    }

    // Tests each block maps to the palette entry of its mean color
    // Verified by sampling only the block's first pixel
    #[test]
    fn test_build_grid_maps_blocks_to_palette() {
        let palette = Palette::from_colors(&[[255, 255, 255], [255, 0, 0], [0, 255, 0], [0, 0, 255]]);
        let grid = build_grid(&quadrant_image(8), &palette, 2).expect("Failed to build grid");

        assert_eq!(grid.size(), 2);
        assert_eq!(grid.color_at(0, 0), Some(1));
        assert_eq!(grid.color_at(1, 0), Some(2));
        assert_eq!(grid.color_at(0, 1), Some(3));
        assert_eq!(grid.color_at(1, 1), Some(0));
    }

    // Tests mixed blocks use their mean before matching
    // Verified by taking the majority color instead of the mean
    #[test]
    fn test_build_grid_uses_block_mean() {
        let image = RgbImage::from_fn(2, 2, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([200, 200, 200]) }
        });
        let palette = Palette::from_colors(&[[0, 0, 0], [100, 100, 100], [200, 200, 200]]);

        let grid = build_grid(&image, &palette, 1).expect("Failed to build grid");

        assert_eq!(grid.color_at(0, 0), Some(1));
    }

    // Tests leftover edge pixels are ignored when dimensions do not divide evenly
    // Verified by stretching the last block over the remainder
    #[test]
    fn test_build_grid_truncates_remainder() {
        let image = RgbImage::from_fn(5, 5, |x, y| {
            if x == 4 || y == 4 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
        });
        let palette = Palette::from_colors(&[[0, 0, 0], [255, 255, 255]]);

        let grid = build_grid(&image, &palette, 2).expect("Failed to build grid");

        assert!(grid.cells().all(|cell| cell.color_id == 0));
        assert_eq!(cell_dimensions(5, 5, 2).expect("Valid dimensions"), (2, 2));
    }

    // Tests grid sizes outside 1..=min(width, height) are rejected
    // Verified by allowing zero-pixel blocks
    #[test]
    fn test_build_grid_rejects_bad_sizes() {
        let palette = Palette::from_colors(&[[0, 0, 0]]);
        let image = RgbImage::new(4, 3);

        for size in [0, 4] {
            assert!(matches!(
                build_grid(&image, &palette, size),
                Err(PipelineError::InvalidParameter {
                    parameter: "grid_size",
                    ..
                })
            ));
        }
        assert!(matches!(
            build_grid(&image, &Palette::from_colors(&[]), 1),
            Err(PipelineError::InvalidSourceData { .. })
        ));
    }

    // Tests block means over a sub-rectangle
    // Verified by averaging the whole image
    #[test]
    fn test_block_mean() {
        let image = RgbImage::from_fn(4, 4, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 0]));

        assert_eq!(block_mean(&image, 2, 0, 2, 2), Some([25.0, 5.0, 0.0]));
        assert_eq!(block_mean(&image, 10, 10, 1, 1), None);
    }

    // Tests cells are listed row by row
    // Verified by iterating the array column-major
    #[test]
    fn test_cells_row_major() {
        let grid = CellGrid::from_color_ids(2, vec![0, 1, 2, 3]).expect("Valid grid");
        let cells: Vec<Cell> = grid.cells().collect();

        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0, 0),
                Cell::new(1, 0, 1),
                Cell::new(0, 1, 2),
                Cell::new(1, 1, 3),
            ]
        );
        assert!(CellGrid::from_color_ids(2, vec![0, 1, 2]).is_err());
    }

    // Tests documents rebuild to the same grid regardless of cell order
    // Verified by trusting list order as row-major
    #[test]
    fn test_from_cells_accepts_any_order() {
        let grid = CellGrid::from_color_ids(2, vec![0, 1, 1, 0]).expect("Valid grid");
        let mut cells: Vec<Cell> = grid.cells().collect();
        cells.reverse();

        let rebuilt = CellGrid::from_cells(2, &cells).expect("Valid cells");

        assert_eq!(rebuilt, grid);
    }

    // Tests malformed cell lists name the offending entry
    // Verified by silently overwriting duplicates
    #[test]
    fn test_from_cells_reports_field() {
        let duplicate = [
            Cell::new(0, 0, 0),
            Cell::new(1, 0, 0),
            Cell::new(0, 1, 0),
            Cell::new(0, 0, 1),
        ];
        let outside = [
            Cell::new(3, 0, 0),
            Cell::new(1, 0, 0),
            Cell::new(0, 1, 0),
            Cell::new(1, 1, 0),
        ];
        let missing = [Cell::new(0, 0, 0)];

        assert_eq!(field_of(CellGrid::from_cells(2, &duplicate)), "cells[3]");
        assert_eq!(field_of(CellGrid::from_cells(2, &outside)), "cells[0]");
        assert_eq!(field_of(CellGrid::from_cells(2, &missing)), "gridSize");
    }

    // Tests a grid size disagreeing with the cell count is rejected before allocating
    // Verified by allocating the grid before comparing sizes
    #[test]
    fn test_from_cells_rejects_size_mismatch() {
        let cells = [Cell::new(0, 0, 0)];

        for grid_size in [2, 100_000, 5_000_000_000, usize::MAX] {
            assert_eq!(field_of(CellGrid::from_cells(grid_size, &cells)), "gridSize");
        }
        assert_eq!(field_of(CellGrid::from_cells(0, &[])), "gridSize");
    }

    // Tests color ids missing from the palette are rejected with their position
    // Verified by skipping the palette check
    #[test]
    fn test_from_document_rejects_unknown_color() {
        let palette = Palette::from_colors(&[[0, 0, 0], [9, 9, 9]]);
        let document = GridDocument {
            grid_size: 1,
            cells: vec![Cell::new(0, 0, 5)],
        };

        match CellGrid::from_document(&document, &palette) {
            Err(PipelineError::MalformedPersistedData { field, .. }) => {
                assert_eq!(field, "cells[0].colorId");
            }
            other => unreachable!("Expected MalformedPersistedData, got {other:?}"),
        }
    }

    // Tests the document uses camelCase keys
    // Verified by removing the rename attribute
    #[test]
    fn test_document_json_shape() {
        let document = CellGrid::uniform(1, 2).to_document();
        let json = serde_json::to_value(&document).expect("Failed to encode");

        assert_eq!(
            json,
            serde_json::json!({ "gridSize": 1, "cells": [{ "x": 0, "y": 0, "colorId": 2 }] })
        );
    }

    fn field_of(result: numberpaint::Result<CellGrid>) -> String {
        match result {
            Err(PipelineError::MalformedPersistedData { field, .. }) => field,
            other => unreachable!("Expected MalformedPersistedData, got {other:?}"),
        }
    }
}
