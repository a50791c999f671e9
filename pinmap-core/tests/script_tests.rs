// Tests for the event script format used by the CLI replay command

use pinmap_core::script::{parse_script, replay, Snapshot};
use pinmap_core::{LatLng, MapEvent, MapState, ScriptErrorKind};

#[test]
fn test_parse_all_commands() {
    let script = "\
# session
click 51.51 -0.1
drag 51.52 -0.08

radius 1000
add-circle
radius
";
    let events = parse_script(script).unwrap();

    assert_eq!(
        events,
        vec![
            MapEvent::Click(LatLng::new(51.51, -0.1)),
            MapEvent::CenterDragEnd(LatLng::new(51.52, -0.08)),
            MapEvent::RadiusInput("1000".to_string()),
            MapEvent::AddCircle,
            MapEvent::RadiusInput(String::new()),
        ]
    );
}

#[test]
fn test_unknown_command_reports_line() {
    let err = parse_script("click 1 2\nzoom 3\n").unwrap_err();

    assert_eq!(err.line, 2);
    assert_eq!(err.kind, ScriptErrorKind::UnknownCommand("zoom".to_string()));
    assert_eq!(err.to_string(), "line 2: unknown command \"zoom\"");
}

#[test]
fn test_bad_coordinates() {
    let err = parse_script("click 51.5").unwrap_err();
    assert!(matches!(
        err.kind,
        ScriptErrorKind::WrongArity { command: "click", expected: 2, got: 1 }
    ));

    let err = parse_script("drag north 0").unwrap_err();
    assert_eq!(err.kind, ScriptErrorKind::BadCoordinate("north".to_string()));
}

#[test]
fn test_replay_scenario() {
    let events = parse_script("radius 1000\nadd-circle\nadd-circle\nclick 51.51 -0.1\n").unwrap();
    let mut state = MapState::default();

    assert_eq!(replay(&mut state, events), 0);

    assert_eq!(state.circles().len(), 2);
    assert_eq!(state.markers().len(), 1);
    assert!(state.circles().iter().all(|c| c.radius.meters() == 1000.0));
}

#[test]
fn test_replay_continues_after_rejected_events() {
    let events = parse_script("radius -5\nadd-circle\nradius 10\nadd-circle\n").unwrap();
    let mut state = MapState::default();

    let rejected = replay(&mut state, events);

    // The bad radius input and the add-circle that followed it
    assert_eq!(rejected, 2);
    assert_eq!(state.circles().len(), 1);
    assert_eq!(state.circles()[0].radius.meters(), 10.0);

    let json = serde_json::to_value(Snapshot::of(&state)).unwrap();
    for key in ["center", "markers", "circles", "overlays"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["circles"].as_array().unwrap().len(), 1);
    assert_eq!(json["overlays"].as_array().unwrap().len(), 2);
}
