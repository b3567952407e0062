use std::collections::HashSet;

use tracing::debug;

use crate::coord::Coordinate;
use crate::error::Result;
use crate::grid::{CellGrid, Grid};

use super::diamond::{row_spans, validate_threshold};

/// Coverage mask codes.
pub const UNCOVERED: u8 = 0;
pub const COVERED: u8 = 1;
pub const POSITIVE: u8 = 2;

/// Exact shortcut chosen for a grid/threshold pair, checked in this order.
#[derive(Debug)]
enum Plan {
    /// No positive cells.
    Empty,
    /// Threshold reaches across the whole grid.
    Saturated(Vec<Coordinate>),
    /// Threshold 0: each positive cell covers only itself.
    PositiveOnly(Vec<Coordinate>),
    /// General case: union the diamonds of every positive cell.
    Sweep(Vec<Coordinate>, usize),
}

fn plan(grid: &CellGrid, threshold: i64) -> Result<Plan> {
    let n = validate_threshold(threshold)?;
    let positives = grid.positive_cells();
    let plan = if positives.is_empty() {
        Plan::Empty
    } else if n >= grid.dims().diameter() {
        Plan::Saturated(positives)
    } else if n == 0 {
        Plan::PositiveOnly(positives)
    } else {
        Plan::Sweep(positives, n)
    };
    debug!(
        height = grid.height(),
        width = grid.width(),
        threshold = n,
        plan = plan.name(),
        "neighborhood plan"
    );
    Ok(plan)
}

impl Plan {
    fn name(&self) -> &'static str {
        match self {
            Plan::Empty => "empty",
            Plan::Saturated(_) => "saturated",
            Plan::PositiveOnly(_) => "positive_only",
            Plan::Sweep(..) => "sweep",
        }
    }
}

/// Union of the threshold neighborhoods of every positive cell in `grid`.
pub fn neighborhood_cells(grid: &CellGrid, threshold: i64) -> Result<HashSet<Coordinate>> {
    let dims = grid.dims();
    let cells = match plan(grid, threshold)? {
        Plan::Empty => HashSet::new(),
        Plan::Saturated(_) => (0..dims.height())
            .flat_map(|row| (0..dims.width()).map(move |col| Coordinate::at(row, col)))
            .collect(),
        Plan::PositiveOnly(positives) => positives.into_iter().collect(),
        Plan::Sweep(positives, n) => {
            let mut out = HashSet::new();
            for center in positives {
                for span in row_spans(center, n, dims) {
                    out.extend(
                        (span.min_col..=span.max_col).map(|col| Coordinate::at(span.row, col)),
                    );
                }
            }
            out
        }
    };
    debug!(cells = cells.len(), "neighborhood union");
    Ok(cells)
}

/// Number of distinct cells in [`neighborhood_cells`], without building the set.
pub fn count_neighborhood_cells(grid: &CellGrid, threshold: i64) -> Result<usize> {
    let count = match plan(grid, threshold)? {
        Plan::Empty => 0,
        Plan::Saturated(_) => grid.dims().area(),
        Plan::PositiveOnly(positives) => positives.len(),
        Plan::Sweep(positives, n) => {
            let mask = sweep_mask(grid, &positives, n);
            mask.cells().iter().filter(|&&v| v != UNCOVERED).count()
        }
    };
    debug!(count, "neighborhood count");
    Ok(count)
}

/// Per-cell coverage: [`POSITIVE`] for seed cells, [`COVERED`] for cells within
/// the threshold of one, [`UNCOVERED`] otherwise.
pub fn coverage(grid: &CellGrid, threshold: i64) -> Result<Grid<u8>> {
    let dims = grid.dims();
    let (mut mask, positives) = match plan(grid, threshold)? {
        Plan::Empty => return Ok(Grid::new(dims)),
        Plan::Saturated(positives) => {
            let mut mask = Grid::new(dims);
            for row in 0..dims.height() {
                mask.fill_span(row, 0, dims.width() - 1, COVERED);
            }
            (mask, positives)
        }
        Plan::PositiveOnly(positives) => (Grid::new(dims), positives),
        Plan::Sweep(positives, n) => (sweep_mask(grid, &positives, n), positives),
    };
    for c in positives {
        mask.put(c.row(), c.column(), POSITIVE);
    }
    Ok(mask)
}

fn sweep_mask(grid: &CellGrid, positives: &[Coordinate], n: usize) -> Grid<u8> {
    let dims = grid.dims();
    let mut mask = Grid::new(dims);
    for &center in positives {
        for span in row_spans(center, n, dims) {
            mask.fill_span(span.row, span.min_col, span.max_col, COVERED);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::NeighborhoodError;
    use crate::grid::Dimensions;
    use crate::neighborhood::diamond::enumerate;
    use crate::neighborhood::diamond::tests::enumerate_by_offsets;

    fn grid_with(h: i64, w: i64, cells: &[(usize, usize)]) -> CellGrid {
        let cells: Vec<_> = cells.iter().map(|&(r, c)| Coordinate::at(r, c)).collect();
        CellGrid::with_positive_cells(Dimensions::new(h, w).unwrap(), &cells).unwrap()
    }

    fn count(h: i64, w: i64, cells: &[(usize, usize)], n: i64) -> usize {
        count_neighborhood_cells(&grid_with(h, w, cells), n).unwrap()
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(count(11, 11, &[(5, 5)], 3), 25);
        assert_eq!(count(11, 11, &[(5, 1)], 3), 21);
        assert_eq!(count(11, 11, &[(3, 3), (7, 7)], 2), 26);
        assert_eq!(count(11, 11, &[(3, 3), (4, 5)], 2), 22);
        assert_eq!(count(1, 1, &[(0, 0)], 0), 1);
        assert_eq!(count(20, 20, &[], 0), 0);
        assert_eq!(count(20, 20, &[], 7), 0);
        assert_eq!(count(20, 20, &[], 1000), 0);
    }

    #[test]
    fn test_edge_shifted_overlaps() {
        assert_eq!(count(11, 11, &[(3, 0), (4, 2)], 2), 18);
        assert_eq!(count(11, 11, &[(0, 0), (1, 2)], 2), 14);
        assert_eq!(count(11, 11, &[(0, 3), (1, 5)], 2), 17);
        assert_eq!(count(11, 11, &[(3, 8), (4, 10)], 2), 18);
        assert_eq!(count(11, 11, &[(9, 3), (10, 5)], 2), 17);
    }

    #[test]
    fn test_adjacent_and_corners() {
        assert_eq!(count(11, 11, &[(3, 3), (4, 4)], 2), 18);
        assert_eq!(count(11, 11, &[(3, 3), (3, 4)], 2), 18);
        assert_eq!(count(11, 11, &[(3, 4), (4, 4)], 2), 18);
        assert_eq!(count(11, 11, &[(0, 0), (10, 10)], 3), 20);
        assert_eq!(count(11, 11, &[(10, 9), (9, 10), (10, 10)], 3), 15);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(count(2, 2, &[(0, 1)], 2), 4);
        assert_eq!(count(2, 2, &[(0, 1)], 100_000), 4);
        assert_eq!(count(11, 11, &[(5, 5)], 12), 121);
        // below the diameter the far corner stays out
        assert_eq!(count(11, 11, &[(0, 0)], 19), 120);
    }

    #[test]
    fn test_negative_threshold() {
        let grid = grid_with(3, 3, &[(1, 1)]);
        assert_eq!(
            count_neighborhood_cells(&grid, -1),
            Err(NeighborhoodError::InvalidDistanceThreshold(-1))
        );
        assert_eq!(
            neighborhood_cells(&grid, -5),
            Err(NeighborhoodError::InvalidDistanceThreshold(-5))
        );
        // checked even when nothing is positive
        let empty = grid_with(3, 3, &[]);
        assert!(coverage(&empty, -2).is_err());
    }

    #[test]
    fn test_single_cell_equals_enumerate() {
        let grid = grid_with(9, 7, &[(2, 5)]);
        for n in 0..16 {
            assert_eq!(
                neighborhood_cells(&grid, n).unwrap(),
                enumerate(Coordinate::at(2, 5), n, grid.dims()).unwrap()
            );
        }
    }

    #[test]
    fn test_coverage_codes() {
        let grid = grid_with(3, 3, &[(0, 0)]);
        let mask = coverage(&grid, 1).unwrap();
        assert_eq!(
            mask.rows().map(|r| r.to_vec()).collect::<Vec<_>>(),
            vec![vec![2, 1, 0], vec![1, 0, 0], vec![0, 0, 0]]
        );
        let full = coverage(&grid, 4).unwrap();
        assert_eq!(full.get(Coordinate::at(0, 0)), Ok(POSITIVE));
        assert_eq!(full.cells().iter().filter(|&&v| v == COVERED).count(), 8);
    }

    fn grid_strategy() -> impl Strategy<Value = CellGrid> {
        (1..12i64, 1..12i64).prop_flat_map(|(h, w)| {
            prop::collection::vec(prop::bool::weighted(0.1), (h * w) as usize).prop_map(
                move |bits| {
                    let rows = bits
                        .chunks(w as usize)
                        .map(|r| r.iter().map(|&b| i64::from(b)).collect())
                        .collect();
                    CellGrid::from_rows(h, w, rows).unwrap()
                },
            )
        })
    }

    proptest! {
        #[test]
        fn test_union_count_agree(grid in grid_strategy(), n in 0..25i64) {
            let cells = neighborhood_cells(&grid, n).unwrap();
            prop_assert_eq!(count_neighborhood_cells(&grid, n).unwrap(), cells.len());

            let mask = coverage(&grid, n).unwrap();
            prop_assert_eq!(mask.cells().iter().filter(|&&v| v != UNCOVERED).count(), cells.len());

            let mut oracle = HashSet::new();
            for p in grid.positive_cells() {
                oracle.extend(enumerate_by_offsets(p, n as usize, grid.dims()));
            }
            prop_assert_eq!(cells, oracle);
        }

        #[test]
        fn test_monotonic(grid in grid_strategy(), t1 in 0..12i64, dt in 0..12i64) {
            let small = neighborhood_cells(&grid, t1).unwrap();
            let large = neighborhood_cells(&grid, t1 + dt).unwrap();
            prop_assert!(small.is_subset(&large));
        }

        #[test]
        fn test_zero_and_saturation(grid in grid_strategy(), extra in 0..5i64) {
            let positives = grid.positive_cells().len();
            prop_assert_eq!(count_neighborhood_cells(&grid, 0).unwrap(), positives);

            let t = grid.dims().diameter() as i64 + extra;
            let expected = if positives == 0 { 0 } else { grid.dims().area() };
            prop_assert_eq!(count_neighborhood_cells(&grid, t).unwrap(), expected);
        }

        #[test]
        fn test_two_cell_inclusion_exclusion(
            r1 in 0..15usize, c1 in 0..15usize,
            r2 in 0..15usize, c2 in 0..15usize,
            n in 0..6i64,
        ) {
            prop_assume!((r1, c1) != (r2, c2));
            let grid = grid_with(15, 15, &[(r1, c1), (r2, c2)]);
            let d1 = enumerate(Coordinate::at(r1, c1), n, grid.dims()).unwrap();
            let d2 = enumerate(Coordinate::at(r2, c2), n, grid.dims()).unwrap();
            let overlap = d1.intersection(&d2).count();
            prop_assert_eq!(
                count_neighborhood_cells(&grid, n).unwrap(),
                d1.len() + d2.len() - overlap
            );
        }
    }
}
