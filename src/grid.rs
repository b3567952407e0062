use crate::coord::Coordinate;
use crate::error::{NeighborhoodError, Result};

/// Validated grid extent: both sides at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    height: usize,
    width: usize,
}

impl Dimensions {
    pub fn new(height: i64, width: i64) -> Result<Self> {
        // The cell count must fit in usize so the flat store can be indexed.
        if height <= 0 || width <= 0 || (height as usize).checked_mul(width as usize).is_none() {
            return Err(NeighborhoodError::InvalidDimensions { height, width });
        }
        Ok(Self {
            height: height as usize,
            width: width as usize,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Largest Manhattan distance between two cells of the grid.
    #[inline]
    pub fn diameter(&self) -> usize {
        (self.height - 1) + (self.width - 1)
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.row() < self.height && coord.column() < self.width
    }

    fn out_of_bounds(&self, coord: Coordinate) -> NeighborhoodError {
        NeighborhoodError::PositionOutOfBounds {
            row: coord.row() as i64,
            column: coord.column() as i64,
            height: self.height,
            width: self.width,
        }
    }
}

/// Row-major flat grid. Row 0 is stored first and is the bottom edge.
/// Dimensions are fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    dims: Dimensions,
}

/// The integer grid whose positive cells seed neighborhoods.
pub type CellGrid = Grid<i64>;

impl<T: Copy + Default> Grid<T> {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            data: vec![T::default(); dims.area()],
            dims,
        }
    }

    #[inline]
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.dims.width
    }

    #[inline]
    pub fn is_valid(&self, coord: Coordinate) -> bool {
        self.dims.contains(coord)
    }

    #[inline]
    fn idx(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.dims.height && column < self.dims.width);
        row * self.dims.width + column
    }

    pub fn get(&self, coord: Coordinate) -> Result<T> {
        if !self.is_valid(coord) {
            return Err(self.dims.out_of_bounds(coord));
        }
        Ok(self.data[self.idx(coord.row(), coord.column())])
    }

    pub fn set(&mut self, coord: Coordinate, v: T) -> Result<()> {
        if !self.is_valid(coord) {
            return Err(self.dims.out_of_bounds(coord));
        }
        let i = self.idx(coord.row(), coord.column());
        self.data[i] = v;
        Ok(())
    }

    /// Unchecked write for callers that already clamped to the grid.
    #[inline]
    pub(crate) fn put(&mut self, row: usize, column: usize, v: T) {
        let i = self.idx(row, column);
        self.data[i] = v;
    }

    /// Fill `[min_col, max_col]` of one row.
    #[inline]
    pub(crate) fn fill_span(&mut self, row: usize, min_col: usize, max_col: usize, v: T) {
        let start = self.idx(row, min_col);
        let end = self.idx(row, max_col);
        self.data[start..=end].fill(v);
    }

    /// Rows bottom to top.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.dims.width)
    }

    pub fn cells(&self) -> &[T] {
        &self.data
    }
}

impl CellGrid {
    /// Build from a pre-populated `height` x `width` array, `rows[0]` being row 0.
    pub fn from_rows(height: i64, width: i64, rows: Vec<Vec<i64>>) -> Result<Self> {
        let dims = Dimensions::new(height, width)?;
        let bad_row = rows.iter().position(|r| r.len() != dims.width);
        if rows.len() != dims.height || bad_row.is_some() {
            return Err(NeighborhoodError::DimensionMismatch {
                height: dims.height,
                width: dims.width,
                found_rows: rows.len(),
                bad_row,
            });
        }
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            dims,
        })
    }

    /// Grid with every listed cell set to 1 and the rest 0.
    pub fn with_positive_cells(dims: Dimensions, cells: &[Coordinate]) -> Result<Self> {
        let mut grid = Self::new(dims);
        for &c in cells {
            grid.set(c, 1)?;
        }
        Ok(grid)
    }

    /// All cells with value > 0, in row-major order.
    pub fn positive_cells(&self) -> Vec<Coordinate> {
        let w = self.dims.width;
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0)
            .map(|(i, _)| Coordinate::at(i / w, i % w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_get_set_bounds() {
        let mut grid = CellGrid::new(Dimensions::new(3, 4).unwrap());
        let c = Coordinate::at(2, 3);
        grid.set(c, 9).unwrap();
        assert_eq!(grid.get(c), Ok(9));
        assert_eq!(grid.get(Coordinate::at(0, 0)), Ok(0));

        let outside = Coordinate::at(3, 0);
        assert_eq!(
            grid.set(outside, 1),
            Err(NeighborhoodError::PositionOutOfBounds {
                row: 3,
                column: 0,
                height: 3,
                width: 4
            })
        );
        assert!(grid.get(Coordinate::at(0, 4)).is_err());
        // failed write leaves contents alone
        assert_eq!(grid.positive_cells(), vec![c]);
    }

    #[test]
    fn test_positive_cells_row_major() {
        let mut grid = CellGrid::new(Dimensions::new(3, 3).unwrap());
        grid.set(Coordinate::at(2, 0), 5).unwrap();
        grid.set(Coordinate::at(0, 2), 1).unwrap();
        grid.set(Coordinate::at(1, 1), -4).unwrap();
        grid.set(Coordinate::at(0, 1), 0).unwrap();
        assert_eq!(
            grid.positive_cells(),
            vec![Coordinate::at(0, 2), Coordinate::at(2, 0)]
        );
    }

    #[test]
    fn test_from_rows() {
        let grid = CellGrid::from_rows(2, 3, vec![vec![0, 1, 0], vec![-1, 0, 2]]).unwrap();
        assert_eq!(grid.get(Coordinate::at(1, 2)), Ok(2));
        assert_eq!(
            grid.positive_cells(),
            vec![Coordinate::at(0, 1), Coordinate::at(1, 2)]
        );

        assert_eq!(
            CellGrid::from_rows(2, 3, vec![vec![0, 0, 0]]),
            Err(NeighborhoodError::DimensionMismatch {
                height: 2,
                width: 3,
                found_rows: 1,
                bad_row: None
            })
        );
        assert_eq!(
            CellGrid::from_rows(2, 3, vec![vec![0, 0, 0], vec![0, 0]]),
            Err(NeighborhoodError::DimensionMismatch {
                height: 2,
                width: 3,
                found_rows: 2,
                bad_row: Some(1)
            })
        );
    }

    #[test]
    fn test_with_positive_cells_rejects_outside() {
        let dims = Dimensions::new(2, 2).unwrap();
        assert_eq!(
            CellGrid::with_positive_cells(dims, &[Coordinate::at(0, 2)]),
            Err(NeighborhoodError::PositionOutOfBounds {
                row: 0,
                column: 2,
                height: 2,
                width: 2
            })
        );
    }

    #[test]
    fn test_area_overflow_rejected() {
        let (h, w) = (1i64 << 33, 1i64 << 31);
        assert_eq!(
            Dimensions::new(h, w),
            Err(NeighborhoodError::InvalidDimensions { height: h, width: w })
        );
        assert_eq!(
            Dimensions::new(i64::MAX, 3),
            Err(NeighborhoodError::InvalidDimensions { height: i64::MAX, width: 3 })
        );
        let tall = Dimensions::new(i64::MAX, 1).unwrap();
        assert_eq!(tall.area(), i64::MAX as usize);
    }

    proptest! {
        #[test]
        fn test_construction(h in -5..20i64, w in -5..20i64) {
            match Dimensions::new(h, w) {
                Ok(dims) => {
                    prop_assert!(h > 0 && w > 0);
                    let grid = CellGrid::new(dims);
                    prop_assert_eq!(grid.rows().len(), h as usize);
                    prop_assert!(grid.rows().all(|r| r.len() == w as usize && r.iter().all(|&v| v == 0)));
                }
                Err(e) => {
                    prop_assert!(h <= 0 || w <= 0);
                    prop_assert_eq!(e, NeighborhoodError::InvalidDimensions { height: h, width: w });
                }
            }
        }
    }
}
