pub mod diamond;
pub mod union;

pub use diamond::{enumerate, validate_threshold};
pub use union::{COVERED, POSITIVE, UNCOVERED, count_neighborhood_cells, coverage, neighborhood_cells};
