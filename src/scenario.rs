//! Labelled neighborhood problems and a timed runner for batches of them.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coord::Coordinate;
use crate::error::Result;
use crate::grid::{CellGrid, Dimensions};
use crate::neighborhood::{count_neighborhood_cells, neighborhood_cells};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub label: String,
    pub height: i64,
    pub width: i64,
    pub threshold: i64,
    /// `[row, column]` pairs.
    #[serde(default)]
    pub positives: Vec<[i64; 2]>,
    /// Known answer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub label: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<Coordinate>>,
    pub ms: f64,
}

impl Report {
    /// `None` when the scenario has no known answer.
    pub fn matches(&self, scenario: &Scenario) -> Option<bool> {
        scenario.expected.map(|e| e == self.count)
    }
}

impl Scenario {
    pub fn new(label: &str, height: i64, width: i64, threshold: i64, positives: &[[i64; 2]]) -> Self {
        Self {
            label: label.to_string(),
            height,
            width,
            threshold,
            positives: positives.to_vec(),
            expected: None,
        }
    }

    pub fn with_expected(mut self, count: usize) -> Self {
        self.expected = Some(count);
        self
    }

    /// Grid with the scenario's positive cells marked.
    pub fn grid(&self) -> Result<CellGrid> {
        let dims = Dimensions::new(self.height, self.width)?;
        let cells = self
            .positives
            .iter()
            .map(|&[r, c]| Coordinate::new(r, c))
            .collect::<Result<Vec<_>>>()?;
        CellGrid::with_positive_cells(dims, &cells)
    }

    pub fn run(&self, list_cells: bool) -> Result<Report> {
        let t = Instant::now();
        let grid = self.grid()?;
        let (count, cells) = if list_cells {
            let mut cells: Vec<_> = neighborhood_cells(&grid, self.threshold)?.into_iter().collect();
            cells.sort();
            (cells.len(), Some(cells))
        } else {
            (count_neighborhood_cells(&grid, self.threshold)?, None)
        };
        let ms = t.elapsed().as_secs_f64() * 1000.0;
        info!(label = %self.label, count, ms, "scenario done");
        Ok(Report {
            label: self.label.clone(),
            count,
            cells,
            ms,
        })
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scenario{{threshold={}, height={}, width={}, positives={}",
            self.threshold,
            self.height,
            self.width,
            self.positives.len()
        )?;
        if !self.label.is_empty() {
            write!(f, ", label={}", self.label)?;
        }
        write!(f, "}}")
    }
}

/// Run every scenario in order. Returns per-scenario results and total ms.
pub fn run_all(scenarios: &[Scenario], list_cells: bool) -> (Vec<Result<Report>>, f64) {
    let start = Instant::now();
    let reports = scenarios.iter().map(|s| s.run(list_cells)).collect();
    (reports, start.elapsed().as_secs_f64() * 1000.0)
}

/// Read a JSON array of scenarios.
pub fn load_json(path: &Path) -> anyhow::Result<Vec<Scenario>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenarios {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenarios {}", path.display()))
}

/// Hand-checked catalogue: centered, edge-clipped, overlapping, degenerate and
/// oversized-threshold cases on small grids.
pub fn builtin() -> Vec<Scenario> {
    vec![
        Scenario::new("1 positive, center", 11, 11, 3, &[[5, 5]]).with_expected(25),
        Scenario::new("1 positive, near left edge", 11, 11, 3, &[[5, 1]]).with_expected(21),
        Scenario::new("2 positives, no overlap", 11, 11, 2, &[[7, 7], [3, 3]]).with_expected(26),
        Scenario::new("2 positives, overlap", 11, 11, 2, &[[3, 3], [4, 5]]).with_expected(22),
        Scenario::new("2 positives, overlap, clipped left", 11, 11, 2, &[[3, 0], [4, 2]]).with_expected(18),
        Scenario::new("2 positives, overlap, clipped bottom left", 11, 11, 2, &[[0, 0], [1, 2]])
            .with_expected(14),
        Scenario::new("2 positives, overlap, clipped bottom", 11, 11, 2, &[[0, 3], [1, 5]]).with_expected(17),
        Scenario::new("2 positives, overlap, clipped right", 11, 11, 2, &[[3, 8], [4, 10]]).with_expected(18),
        Scenario::new("2 positives, overlap, clipped top", 11, 11, 2, &[[9, 3], [10, 5]]).with_expected(17),
        Scenario::new("2 positives, diagonal adjacent", 11, 11, 2, &[[3, 3], [4, 4]]).with_expected(18),
        Scenario::new("2 positives, same row adjacent", 11, 11, 2, &[[3, 3], [3, 4]]).with_expected(18),
        Scenario::new("2 positives, same column adjacent", 11, 11, 2, &[[3, 4], [4, 4]]).with_expected(18),
        Scenario::new("opposite corners", 11, 11, 3, &[[0, 0], [10, 10]]).with_expected(20),
        Scenario::new("3 in one corner", 11, 11, 3, &[[10, 9], [9, 10], [10, 10]]).with_expected(15),
        Scenario::new("1x21 grid", 1, 21, 3, &[[0, 9]]).with_expected(7),
        Scenario::new("21x1 grid", 21, 1, 3, &[[10, 0]]).with_expected(7),
        Scenario::new("1x1 grid, threshold 0", 1, 1, 0, &[[0, 0]]).with_expected(1),
        Scenario::new("20x20 grid, threshold 0", 20, 20, 0, &[[0, 0]]).with_expected(1),
        Scenario::new("2x2 grid", 2, 2, 2, &[[0, 1]]).with_expected(4),
        Scenario::new("21x3 grid, threshold wider than grid", 21, 3, 5, &[[10, 2]]).with_expected(27),
        Scenario::new("4x15 grid, threshold taller than grid", 4, 15, 5, &[[2, 9]]).with_expected(36),
        Scenario::new("2x2 grid, threshold beyond both sides", 2, 2, 3, &[[0, 1]]).with_expected(4),
        Scenario::new("2x2 grid, huge threshold", 2, 2, 100_000, &[[0, 1]]).with_expected(4),
        Scenario::new("corner, threshold beyond sides", 11, 11, 12, &[[0, 0]]).with_expected(85),
        Scenario::new("center, threshold covers grid", 11, 11, 12, &[[5, 5]]).with_expected(121),
        Scenario::new("no positives", 10, 10, 3, &[]).with_expected(0),
    ]
}
