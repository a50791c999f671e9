use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RadiusError;
use crate::geo::LatLng;
use crate::radius::Radius;

/// Identity of a marker or circle. Unique within one map state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source shared by markers and circles.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> AnnotationId {
        self.next += 1;
        AnnotationId(self.next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: AnnotationId,
    pub position: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: AnnotationId,
    pub center: LatLng, // Snapshot of the center at creation time
    pub radius: Radius,
}

/// One user interaction with the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map clicked at a coordinate.
    Click(LatLng),
    /// Center marker released at a coordinate.
    CenterDragEnd(LatLng),
    /// Radius input text changed.
    RadiusInput(String),
    /// "Add Circle" pressed.
    AddCircle,
}

/// What applying a [`MapEvent`] changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    MarkerAdded(AnnotationId),
    CircleAdded(AnnotationId),
    CenterMoved(LatLng),
    RadiusChanged(Radius),
    /// The radius text was stored but does not parse to a valid radius.
    RadiusRejected(RadiusError),
}
