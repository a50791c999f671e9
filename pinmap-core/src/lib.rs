pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod overlay;
pub mod radius;
pub mod script;
pub mod state;
pub mod tiles;
pub mod viewport;

pub use config::MapConfig;
pub use error::{MapError, RadiusError, ScriptError, ScriptErrorKind};
pub use geo::{LatLng, TileCoord};
pub use model::{AnnotationId, Applied, Circle, MapEvent, Marker};
pub use overlay::{Overlay, Rgba, ScreenOverlay};
pub use radius::{Radius, RadiusField};
pub use state::MapState;
pub use tiles::{TileClient, TileEvent, TileRequest, TileSource};
pub use viewport::{PlacedTile, Viewport};

pub fn init() {
    tracing::info!("Initializing Pinmap Core");
}
