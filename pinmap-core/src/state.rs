use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::error::{MapError, RadiusError};
use crate::geo::LatLng;
use crate::model::{Applied, Circle, IdGenerator, MapEvent, Marker};
use crate::overlay::{Overlay, Rgba};
use crate::radius::{Radius, RadiusField};

/// All annotation state of one map.
///
/// `center` is the single source of truth for the draggable marker: the
/// marker is drawn from it and only reports drag-end positions back through
/// [`MapEvent::CenterDragEnd`].
#[derive(Debug, Clone)]
pub struct MapState {
    center: LatLng,
    markers: Vec<Marker>,
    circles: Vec<Circle>,
    radius: RadiusField,
    circle_color: Rgba,
    ids: IdGenerator,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(&MapConfig::default())
    }
}

impl MapState {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            center: config.initial_center,
            markers: Vec::new(),
            circles: Vec::new(),
            radius: RadiusField::new(config.initial_radius.clone()),
            circle_color: config.circle_color,
            ids: IdGenerator::new(),
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn radius_field(&self) -> &RadiusField {
        &self.radius
    }

    pub fn circle_color(&self) -> Rgba {
        self.circle_color
    }

    /// Apply one interaction. State is left untouched when an error is returned.
    pub fn apply(&mut self, event: MapEvent) -> Result<Applied, MapError> {
        match event {
            MapEvent::Click(position) => Ok(Applied::MarkerAdded(self.add_marker(position).id)),
            MapEvent::CenterDragEnd(position) => {
                self.set_center(position);
                Ok(Applied::CenterMoved(position))
            }
            MapEvent::RadiusInput(text) => Ok(match self.set_radius_text(text) {
                Ok(radius) => Applied::RadiusChanged(radius),
                Err(err) => Applied::RadiusRejected(err),
            }),
            MapEvent::AddCircle => Ok(Applied::CircleAdded(self.add_circle()?.id)),
        }
    }

    pub fn add_marker(&mut self, position: LatLng) -> &Marker {
        let marker = Marker {
            id: self.ids.next_id(),
            position,
        };
        info!("📍 [MAP] Marker {} placed at {}", marker.id, position);
        self.markers.push(marker);
        &self.markers[self.markers.len() - 1]
    }

    pub fn set_center(&mut self, position: LatLng) {
        info!("🎯 [MAP] Center moved {} -> {}", self.center, position);
        self.center = position;
    }

    pub fn set_radius_text(&mut self, text: impl Into<String>) -> Result<Radius, RadiusError> {
        let result = self.radius.set_text(text);
        match &result {
            Ok(radius) => debug!("[MAP] Radius set to {}", radius),
            Err(err) => debug!("[MAP] Radius input {:?} rejected: {}", self.radius.text(), err),
        }
        result
    }

    /// Append a circle at the current center with the current radius.
    pub fn add_circle(&mut self) -> Result<&Circle, MapError> {
        let radius = match self.radius.value() {
            Ok(radius) => radius,
            Err(err) => {
                warn!("⚠️ [MAP] Add circle refused: {}", err);
                return Err(MapError::InvalidRadius(err));
            }
        };
        let circle = Circle {
            id: self.ids.next_id(),
            center: self.center,
            radius,
        };
        info!("⭕ [MAP] Circle {} of {} at {}", circle.id, radius, circle.center);
        self.circles.push(circle);
        Ok(&self.circles[self.circles.len() - 1])
    }

    /// Drawable annotations: center pin, then circles, then markers.
    pub fn overlays(&self) -> Vec<Overlay> {
        let mut overlays = Vec::with_capacity(1 + self.circles.len() + self.markers.len());
        overlays.push(Overlay::CenterPin {
            position: self.center,
        });
        overlays.extend(self.circles.iter().map(|circle| Overlay::Disc {
            id: circle.id,
            center: circle.center,
            radius_m: circle.radius.meters(),
            color: self.circle_color,
        }));
        overlays.extend(self.markers.iter().map(|marker| Overlay::Pin {
            id: marker.id,
            position: marker.position,
        }));
        overlays
    }
}
