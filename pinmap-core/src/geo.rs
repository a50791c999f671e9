use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Pixel edge length of one map tile.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Deepest zoom the tile grid supports. Tile indices stay well inside `u32`.
pub const MAX_TILE_ZOOM: u8 = 30;

/// Equatorial circumference of the WGS84 ellipsoid, in metres.
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Index of a tile in the slippy-map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tile that contains `position` at zoom `z`, capped at [`MAX_TILE_ZOOM`].
    pub fn containing(position: LatLng, z: u8) -> Self {
        let z = z.min(MAX_TILE_ZOOM);
        let (px, py) = project(position, z as f64);
        let n = 1_i64 << z;
        let x = ((px / TILE_SIZE).floor() as i64).rem_euclid(n);
        let y = ((py / TILE_SIZE).floor() as i64).clamp(0, n - 1);
        Self { z, x: x as u32, y: y as u32 }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Size of the world in pixels at a (possibly fractional) zoom level.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Spherical Web Mercator: coordinate to world pixels at `zoom`.
/// The origin is the north-west corner of the world.
pub fn project(position: LatLng, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (position.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng { lat, lng }
}

/// Ground distance covered by one screen pixel at `lat`.
pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * lat.to_radians().cos() / world_size(zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_prime_meridian_is_world_center() {
        let (x, y) = project(LatLng::new(0.0, 0.0), 0.0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_containing_tile_for_london() {
        // Matches the tile OSM serves for central London at z13.
        let tile = TileCoord::containing(LatLng::new(51.505, -0.09), 13);
        assert_eq!(tile, TileCoord::new(13, 4093, 2724));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let p = LatLng::new(-33.8688, 151.2093);
        let (x, y) = project(p, 11.0);
        let back = unproject(x, y, 11.0);
        assert!((back.lat - p.lat).abs() < 1e-9);
        assert!((back.lng - p.lng).abs() < 1e-9);
    }
}
