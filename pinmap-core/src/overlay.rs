use serde::{Deserialize, Serialize};

use crate::geo::{meters_per_pixel, LatLng};
use crate::model::AnnotationId;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// A drawable annotation in geographic space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    CenterPin {
        position: LatLng,
    },
    Pin {
        id: AnnotationId,
        position: LatLng,
    },
    Disc {
        id: AnnotationId,
        center: LatLng,
        radius_m: f64,
        color: Rgba,
    },
}

/// An overlay projected into widget pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenOverlay {
    CenterPin { x: f64, y: f64 },
    Pin { id: AnnotationId, x: f64, y: f64 },
    Disc { id: AnnotationId, x: f64, y: f64, radius_px: f64, color: Rgba },
}

impl Overlay {
    pub fn project(&self, viewport: &Viewport) -> ScreenOverlay {
        match self {
            Overlay::CenterPin { position } => {
                let (x, y) = viewport.to_screen(*position);
                ScreenOverlay::CenterPin { x, y }
            }
            Overlay::Pin { id, position } => {
                let (x, y) = viewport.to_screen(*position);
                ScreenOverlay::Pin { id: *id, x, y }
            }
            Overlay::Disc {
                id,
                center,
                radius_m,
                color,
            } => {
                let (x, y) = viewport.to_screen(*center);
                let radius_px = radius_m / meters_per_pixel(center.lat, viewport.zoom());
                ScreenOverlay::Disc {
                    id: *id,
                    x,
                    y,
                    radius_px,
                    color: *color,
                }
            }
        }
    }
}

/// Project a whole overlay list, keeping its order.
pub fn project_all(overlays: &[Overlay], viewport: &Viewport) -> Vec<ScreenOverlay> {
    overlays.iter().map(|o| o.project(viewport)).collect()
}
