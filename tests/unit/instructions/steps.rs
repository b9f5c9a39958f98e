//! Tests for step numbering and the serialized step format

#[cfg(test)]
mod tests {
    use numberpaint::instructions::grouping::ColorGroups;
    use numberpaint::instructions::steps::{
        StepKind, cell_steps, serialize_steps, steps_by_color, steps_by_region,
    };
    use numberpaint::spatial::grid::{Cell, CellGrid};
    use numberpaint::spatial::regions::segment_regions;

    // Tests steps are numbered from zero without gaps in input order
    // Verified by numbering from one
    #[test]
    fn test_serialize_steps_numbering() {
        let groups = vec![
            (4, vec![Cell::new(0, 0, 4)]),
            (1, vec![Cell::new(1, 0, 1)]),
            (4, vec![Cell::new(0, 1, 4)]),
        ];

        let steps = serialize_steps(StepKind::Region, groups);

        assert_eq!(steps.iter().map(|s| s.step).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(steps.iter().map(|s| s.color_id).collect::<Vec<_>>(), vec![4, 1, 4]);
        assert!(steps.iter().all(|s| s.kind == StepKind::Region));
        assert!(serialize_steps(StepKind::Color, Vec::<(usize, Vec<Cell>)>::new()).is_empty());
    }

    // Tests a uniform grid yields one color step and one region step
    // Verified by emitting one step per cell
    #[test]
    fn test_uniform_grid_single_steps() {
        let grid = CellGrid::uniform(3, 2);

        let by_color = steps_by_color(&ColorGroups::from_grid(&grid));
        let by_region = steps_by_region(&segment_regions(&grid));

        assert_eq!(by_color.len(), 1);
        assert_eq!(by_region.len(), 1);
        assert_eq!(by_color[0].cells.len(), 9);
        assert_eq!(by_region[0].cells.len(), 9);
        assert_eq!(by_color[0].kind, StepKind::Color);
    }

    // Tests each color step lists its cells in row-major order
    // Verified by listing cells in region order
    #[test]
    fn test_color_steps_row_major_cells() {
        let grid = CellGrid::from_color_ids(2, vec![0, 1, 1, 0]).expect("Valid grid");
        let steps = steps_by_color(&ColorGroups::from_grid(&grid));

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].cells, vec![Cell::new(0, 0, 0), Cell::new(1, 1, 0)]);
        assert_eq!(steps[1].cells, vec![Cell::new(1, 0, 1), Cell::new(0, 1, 1)]);
    }

    // Tests single-cell steps follow row-major order
    // Verified by numbering column-major
    #[test]
    fn test_cell_steps() {
        let grid = CellGrid::from_color_ids(2, vec![0, 1, 2, 3]).expect("Valid grid");
        let steps = cell_steps(&grid);

        assert_eq!(steps.len(), 4);
        assert_eq!((steps[1].step, steps[1].x, steps[1].y, steps[1].color_id), (1, 1, 0, 1));
        assert_eq!((steps[2].x, steps[2].y), (0, 1));
    }

    // Tests the persisted step shape and key names
    // Verified by serializing the kind field under its Rust name
    #[test]
    fn test_step_json_shape() {
        let steps = serialize_steps(StepKind::Color, vec![(3, vec![Cell::new(1, 2, 3)])]);
        let json = serde_json::to_value(&steps).expect("Failed to encode");

        assert_eq!(
            json,
            serde_json::json!([{
                "step": 0,
                "type": "color",
                "colorId": 3,
                "cells": [{ "x": 1, "y": 2, "colorId": 3 }]
            }])
        );
    }
}
