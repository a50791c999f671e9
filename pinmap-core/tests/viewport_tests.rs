// Tests for viewport projection, panning, zooming and tile coverage

use pinmap_core::geo::{meters_per_pixel, MAX_TILE_ZOOM, TILE_SIZE};
use pinmap_core::overlay::project_all;
use pinmap_core::{LatLng, MapEvent, MapState, ScreenOverlay, TileCoord, Viewport};
use std::collections::HashSet;

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

fn london_view() -> Viewport {
    Viewport::new(LatLng::new(51.505, -0.09), 13.0, 800.0, 500.0)
}

#[test]
fn test_center_maps_to_screen_center() {
    let view = london_view();
    let (x, y) = view.to_screen(view.center());

    assert!(close(x, 400.0, 1e-6));
    assert!(close(y, 250.0, 1e-6));
}

#[test]
fn test_screen_latlng_round_trip() {
    let view = london_view();
    for &(x, y) in &[(0.0, 0.0), (123.0, 456.0), (799.0, 1.0), (400.0, 250.0)] {
        let p = view.to_latlng(x, y);
        let (bx, by) = view.to_screen(p);
        assert!(close(bx, x, 1e-6), "x {} -> {}", x, bx);
        assert!(close(by, y, 1e-6), "y {} -> {}", y, by);
    }
}

#[test]
fn test_east_is_right_and_north_is_up() {
    let view = london_view();
    let c = view.center();
    let (ex, _) = view.to_screen(LatLng::new(c.lat, c.lng + 0.01));
    let (_, ny) = view.to_screen(LatLng::new(c.lat + 0.01, c.lng));

    assert!(ex > 400.0);
    assert!(ny < 250.0);
}

#[test]
fn test_pan_moves_content_with_pointer() {
    let mut view = london_view();
    let anchor = view.to_latlng(100.0, 100.0);

    view.pan_by(50.0, -30.0);

    let (x, y) = view.to_screen(anchor);
    assert!(close(x, 150.0, 1e-6));
    assert!(close(y, 70.0, 1e-6));
}

#[test]
fn test_zoom_around_keeps_anchor_fixed() {
    let mut view = london_view();
    let anchor = view.to_latlng(600.0, 120.0);

    view.zoom_around(14.0, 600.0, 120.0);

    assert_eq!(view.zoom(), 14.0);
    let (x, y) = view.to_screen(anchor);
    assert!(close(x, 600.0, 1e-6));
    assert!(close(y, 120.0, 1e-6));
}

#[test]
fn test_visible_tiles_cover_viewport() {
    let view = london_view();
    let tiles = view.visible_tiles();

    assert!(!tiles.is_empty());
    assert!(tiles.iter().all(|t| t.coord.z == 13));

    let unique: HashSet<TileCoord> = tiles.iter().map(|t| t.coord).collect();
    assert_eq!(unique.len(), tiles.len());

    // Every corner of the widget lies inside some placed tile.
    for &(cx, cy) in &[(0.0, 0.0), (799.9, 0.0), (0.0, 499.9), (799.9, 499.9)] {
        assert!(tiles.iter().any(|t| {
            cx >= t.x && cx < t.x + TILE_SIZE && cy >= t.y && cy < t.y + TILE_SIZE
        }));
    }

    assert!(unique.contains(&TileCoord::containing(view.center(), 13)));
}

#[test]
fn test_visible_tiles_wrap_and_skip_poles() {
    let view = Viewport::new(LatLng::new(0.0, 0.0), 0.0, 1024.0, 1024.0);
    let tiles = view.visible_tiles();

    // One row exists at z0; the world repeats horizontally.
    assert!(tiles.iter().all(|t| t.coord == TileCoord::new(0, 0, 0)));
    assert!(tiles.len() >= 4);
}

#[test]
fn test_disc_radius_in_pixels() {
    let view = london_view();
    let mut state = MapState::default();
    state.apply(MapEvent::AddCircle).unwrap();

    let projected = project_all(&state.overlays(), &view);

    match &projected[1] {
        ScreenOverlay::Disc { x, y, radius_px, .. } => {
            assert!(close(*x, 400.0, 1e-6));
            assert!(close(*y, 250.0, 1e-6));
            let expected = 500.0 / meters_per_pixel(51.505, 13.0);
            assert!(close(*radius_px, expected, 1e-9));
            // About 42 px at z13 over London.
            assert!(*radius_px > 38.0 && *radius_px < 46.0);
        }
        other => panic!("Wrong overlay: {:?}", other),
    }
}

#[test]
fn test_zoom_is_capped_at_tile_grid_depth() {
    let view = Viewport::new(LatLng::new(51.505, -0.09), 64.0, 800.0, 500.0);
    assert_eq!(view.zoom(), MAX_TILE_ZOOM as f64);
    assert_eq!(view.tile_zoom(), MAX_TILE_ZOOM);
    assert!(!view.visible_tiles().is_empty());

    let mut view = london_view();
    view.zoom_around(200.0, 400.0, 250.0);
    assert_eq!(view.zoom(), MAX_TILE_ZOOM as f64);
    assert!(view.visible_tiles().iter().all(|t| t.coord.z == MAX_TILE_ZOOM));

    view.zoom_around(-3.0, 400.0, 250.0);
    assert_eq!(view.zoom(), 0.0);

    let coord = TileCoord::containing(LatLng::new(51.505, -0.09), 70);
    assert_eq!(coord.z, MAX_TILE_ZOOM);
}

#[test]
fn test_pins_project_to_their_screen_position() {
    let view = london_view();
    let mut state = MapState::default();
    state.apply(MapEvent::Click(view.center())).unwrap();
    let north_west = view.to_latlng(100.0, 80.0);
    state.apply(MapEvent::Click(north_west)).unwrap();

    let projected = project_all(&state.overlays(), &view);

    assert!(matches!(
        projected[0],
        ScreenOverlay::CenterPin { x, y } if close(x, 400.0, 1e-6) && close(y, 250.0, 1e-6)
    ));
    assert!(matches!(
        projected[1],
        ScreenOverlay::Pin { x, y, .. } if close(x, 400.0, 1e-6) && close(y, 250.0, 1e-6)
    ));
    assert!(matches!(
        projected[2],
        ScreenOverlay::Pin { x, y, .. } if close(x, 100.0, 1e-6) && close(y, 80.0, 1e-6)
    ));
}
