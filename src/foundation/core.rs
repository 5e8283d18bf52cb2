use crate::foundation::error::{GridplotError, GridplotResult};

/// Rectangular grid dimensions in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridShape {
    /// Number of rows, non-zero.
    pub rows: u32,
    /// Number of columns, non-zero.
    pub cols: u32,
}

impl GridShape {
    /// Create a validated shape with non-zero dimensions.
    pub fn new(rows: u32, cols: u32) -> GridplotResult<Self> {
        if rows == 0 {
            return Err(GridplotError::config("GridShape rows must be > 0"));
        }
        if cols == 0 {
            return Err(GridplotError::config("GridShape cols must be > 0"));
        }
        Ok(Self { rows, cols })
    }

    /// Total number of addressable cells.
    pub fn cell_count(self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }
}

/// Per-cell canvas dimensions in pixels.
///
/// The composite canvas is `cols * width` by `rows * height`, plus label
/// bands when labels are configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellSize {
    /// Cell width in pixels, non-zero.
    pub width: u32,
    /// Cell height in pixels, non-zero.
    pub height: u32,
}

impl CellSize {
    /// Create a validated size with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> GridplotResult<Self> {
        if width == 0 {
            return Err(GridplotError::config("CellSize width must be > 0"));
        }
        if height == 0 {
            return Err(GridplotError::config("CellSize height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 600,
            height: 1200,
        }
    }
}

/// Grid coordinate of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CellCoord {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u32,
}

/// Rule mapping a linear task index onto a 2D grid coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TraversalOrder {
    /// Indexes increase left-to-right, then top-to-bottom.
    #[default]
    RowMajor,
    /// Indexes increase top-to-bottom, then left-to-right.
    ColumnMajor,
}

impl TraversalOrder {
    /// Map a linear `index` to its cell coordinate.
    ///
    /// Pure and total over `index < shape.cell_count()`; a bijection onto the
    /// grid for either order. Indexes outside that range are a caller error.
    pub fn cell_at(self, index: usize, shape: GridShape) -> CellCoord {
        debug_assert!(index < shape.cell_count());
        let rows = shape.rows as usize;
        let cols = shape.cols as usize;
        match self {
            TraversalOrder::RowMajor => CellCoord {
                row: (index / cols) as u32,
                col: (index % cols) as u32,
            },
            TraversalOrder::ColumnMajor => CellCoord {
                row: (index % rows) as u32,
                col: (index / rows) as u32,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn row_major_maps_left_to_right_then_down() {
        let shape = GridShape::new(2, 3).unwrap();
        let got: Vec<(u32, u32)> = (0..6)
            .map(|i| {
                let c = TraversalOrder::RowMajor.cell_at(i, shape);
                (c.row, c.col)
            })
            .collect();
        assert_eq!(
            got,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn column_major_maps_top_to_bottom_then_right() {
        let shape = GridShape::new(2, 3).unwrap();
        let got: Vec<(u32, u32)> = (0..6)
            .map(|i| {
                let c = TraversalOrder::ColumnMajor.cell_at(i, shape);
                (c.row, c.col)
            })
            .collect();
        assert_eq!(
            got,
            vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn both_orders_are_bijections_onto_the_grid() {
        let shape = GridShape::new(5, 7).unwrap();
        for order in [TraversalOrder::RowMajor, TraversalOrder::ColumnMajor] {
            let mut seen = HashSet::new();
            for i in 0..shape.cell_count() {
                let c = order.cell_at(i, shape);
                assert!(c.row < shape.rows);
                assert!(c.col < shape.cols);
                assert!(seen.insert((c.row, c.col)), "{order:?} aliased index {i}");
            }
            assert_eq!(seen.len(), shape.cell_count());
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(GridShape::new(0, 3).is_err());
        assert!(GridShape::new(2, 0).is_err());
        assert!(CellSize::new(0, 10).is_err());
        assert!(CellSize::new(10, 0).is_err());
    }

    #[test]
    fn model_types_round_trip_through_json() {
        let shape = GridShape::new(4, 2).unwrap();
        let json = serde_json::to_string(&shape).unwrap();
        let back: GridShape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);

        let json = serde_json::to_string(&TraversalOrder::ColumnMajor).unwrap();
        assert_eq!(json, "\"ColumnMajor\"");
    }
}
