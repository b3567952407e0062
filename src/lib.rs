pub mod bounds;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid;
pub mod neighborhood;
pub mod render;
pub mod scenario;

pub use coord::Coordinate;
pub use error::{NeighborhoodError, Result};
pub use grid::{CellGrid, Dimensions, Grid};
pub use neighborhood::{count_neighborhood_cells, coverage, enumerate, neighborhood_cells};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber for the binaries. `RUST_LOG` wins over `verbosity`.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
