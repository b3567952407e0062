use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Tunables shared by the CLI and the server. Any subset can be given in a
/// JSON file; missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Side length in pixels of one grid cell in rendered images.
    pub cell_px: usize,
    /// Include the sorted cell list in reports.
    pub list_cells: bool,
    /// Largest height*width the server will compute.
    pub max_area: usize,
    /// Largest rendered image, in pixels.
    pub max_pixels: usize,
    pub bind: SocketAddr,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            cell_px: 8,
            list_cells: false,
            max_area: 4_000_000,
            max_pixels: 16_000_000,
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Params {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
