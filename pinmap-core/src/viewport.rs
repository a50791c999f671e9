use serde::{Deserialize, Serialize};

use crate::geo::{project, unproject, LatLng, TileCoord, MAX_LATITUDE, MAX_TILE_ZOOM, TILE_SIZE};

/// The visible part of the map: a center, a zoom level and a pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: LatLng,
    zoom: f64,
    width: f64,
    height: f64,
}

/// A tile and where its top-left corner lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub coord: TileCoord,
    pub x: f64,
    pub y: f64,
}

impl Viewport {
    /// `zoom` is clamped to `0 ..= MAX_TILE_ZOOM`.
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center: clamp_lat(center),
            zoom: clamp_zoom(zoom),
            width,
            height,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Integer zoom used to pick tiles.
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.round().clamp(0.0, MAX_TILE_ZOOM as f64) as u8
    }

    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = project(self.center, self.zoom);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    pub fn to_screen(&self, position: LatLng) -> (f64, f64) {
        let (px, py) = project(position, self.zoom);
        let (ox, oy) = self.origin();
        (px - ox, py - oy)
    }

    pub fn to_latlng(&self, x: f64, y: f64) -> LatLng {
        let (ox, oy) = self.origin();
        unproject(ox + x, oy + y, self.zoom)
    }

    /// Move the view so that content shifts by `(dx, dy)` screen pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = project(self.center, self.zoom);
        self.center = clamp_lat(wrap_lng(unproject(cx - dx, cy - dy, self.zoom)));
    }

    /// Change zoom while keeping the coordinate under `(x, y)` fixed on screen.
    pub fn zoom_around(&mut self, zoom: f64, x: f64, y: f64) {
        let zoom = clamp_zoom(zoom);
        if zoom == self.zoom {
            return;
        }
        let anchor = self.to_latlng(x, y);
        self.zoom = zoom;
        let (ax, ay) = self.to_screen(anchor);
        self.pan_by(x - ax, y - ay);
    }

    /// Tiles covering the viewport at [`Viewport::tile_zoom`], row by row.
    pub fn visible_tiles(&self) -> Vec<PlacedTile> {
        let z = self.tile_zoom();
        let scale = 2f64.powf(self.zoom - z as f64);
        let tile_px = TILE_SIZE * scale;
        let (ox, oy) = self.origin();
        let n = 1_i64 << z;

        let first_x = (ox / tile_px).floor() as i64;
        let first_y = (oy / tile_px).floor() as i64;
        let last_x = ((ox + self.width) / tile_px).ceil() as i64;
        let last_y = ((oy + self.height) / tile_px).ceil() as i64;

        let mut tiles = Vec::new();
        for ty in first_y.max(0)..last_y.min(n) {
            for tx in first_x..last_x {
                tiles.push(PlacedTile {
                    coord: TileCoord::new(z, tx.rem_euclid(n) as u32, ty as u32),
                    x: tx as f64 * tile_px - ox,
                    y: ty as f64 * tile_px - oy,
                });
            }
        }
        tiles
    }

    /// Screen size of one tile at the current fractional zoom.
    pub fn tile_pixels(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom - self.tile_zoom() as f64)
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 0.0;
    }
    zoom.clamp(0.0, MAX_TILE_ZOOM as f64)
}

fn clamp_lat(position: LatLng) -> LatLng {
    LatLng::new(position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), position.lng)
}

fn wrap_lng(position: LatLng) -> LatLng {
    let lng = (position.lng + 180.0).rem_euclid(360.0) - 180.0;
    LatLng::new(position.lat, lng)
}
