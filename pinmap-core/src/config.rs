use serde::{Deserialize, Serialize};

use crate::geo::LatLng;
use crate::overlay::Rgba;
use crate::tiles::TileSource;

pub const DEFAULT_CENTER: LatLng = LatLng::new(51.505, -0.09);
pub const DEFAULT_ZOOM: f64 = 13.0;
pub const DEFAULT_RADIUS_TEXT: &str = "500";

/// Startup configuration for a map. Binaries fill this from CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub initial_radius: String,
    pub circle_color: Rgba,
    /// Concurrent tile downloads.
    pub fetch_workers: usize,
    pub tiles: TileSource,
}

impl Default for MapConfig {
    fn default() -> Self {
        let tiles = TileSource::default();
        Self {
            initial_center: DEFAULT_CENTER,
            initial_zoom: DEFAULT_ZOOM,
            min_zoom: 0.0,
            max_zoom: tiles.max_zoom as f64,
            initial_radius: DEFAULT_RADIUS_TEXT.to_string(),
            circle_color: Rgba::BLUE,
            fetch_workers: 4,
            tiles,
        }
    }
}

impl MapConfig {
    /// Zoom bounds ordered and kept inside what the tile source serves.
    pub fn zoom_bounds(&self) -> (f64, f64) {
        let max = self.max_zoom.min(self.tiles.max_zoom as f64).max(0.0);
        let min = self.min_zoom.clamp(0.0, max);
        (min, max)
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (min, max) = self.zoom_bounds();
        zoom.clamp(min, max)
    }
}
