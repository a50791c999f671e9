//! Line-oriented text form of [`MapEvent`]s.
//!
//! ```text
//! click 51.51 -0.1
//! drag 51.52 -0.08
//! radius 1000
//! add-circle
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ScriptError, ScriptErrorKind};
use crate::geo::LatLng;
use crate::model::{Applied, Circle, MapEvent, Marker};
use crate::overlay::Overlay;
use crate::state::MapState;

/// Annotations of a [`MapState`] in the shape `pinmap-cli replay` prints.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub center: LatLng,
    pub markers: &'a [Marker],
    pub circles: &'a [Circle],
    pub overlays: Vec<Overlay>,
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a MapState) -> Self {
        Self {
            center: state.center(),
            markers: state.markers(),
            circles: state.circles(),
            overlays: state.overlays(),
        }
    }
}

/// Apply `events` in order. Rejected events are logged and skipped.
/// Returns how many were rejected.
pub fn replay(state: &mut MapState, events: impl IntoIterator<Item = MapEvent>) -> usize {
    let mut rejected = 0;
    for (index, event) in events.into_iter().enumerate() {
        match state.apply(event) {
            Ok(Applied::RadiusRejected(err)) => {
                warn!("⚠️ [REPLAY] Event {}: radius input rejected: {}", index + 1, err);
                rejected += 1;
            }
            Ok(applied) => debug!("[REPLAY] Event {}: {:?}", index + 1, applied),
            Err(e) => {
                warn!("⚠️ [REPLAY] Event {}: {}", index + 1, e);
                rejected += 1;
            }
        }
    }
    rejected
}

pub fn parse_script(text: &str) -> Result<Vec<MapEvent>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let event = parse_line(line).map_err(|kind| ScriptError {
            line: index + 1,
            kind,
        })?;
        events.push(event);
    }
    Ok(events)
}

fn parse_line(line: &str) -> Result<MapEvent, ScriptErrorKind> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "click" => Ok(MapEvent::Click(parse_coordinate("click", rest)?)),
        "drag" => Ok(MapEvent::CenterDragEnd(parse_coordinate("drag", rest)?)),
        // The rest of the line is raw input text, including an empty one.
        "radius" => Ok(MapEvent::RadiusInput(rest.to_string())),
        "add-circle" => {
            if rest.is_empty() {
                Ok(MapEvent::AddCircle)
            } else {
                Err(ScriptErrorKind::WrongArity {
                    command: "add-circle",
                    expected: 0,
                    got: rest.split_whitespace().count(),
                })
            }
        }
        other => Err(ScriptErrorKind::UnknownCommand(other.to_string())),
    }
}

fn parse_coordinate(command: &'static str, args: &str) -> Result<LatLng, ScriptErrorKind> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(ScriptErrorKind::WrongArity {
            command,
            expected: 2,
            got: parts.len(),
        });
    }
    let parse = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ScriptErrorKind::BadCoordinate(s.to_string()))
    };
    Ok(LatLng::new(parse(parts[0])?, parse(parts[1])?))
}
