// Tests for the background tile client
// Uses a closed local port so no real tile server is contacted

use pinmap_core::{TileClient, TileCoord, TileEvent, TileSource};
use std::time::Duration;

fn unreachable_source() -> TileSource {
    TileSource {
        url_template: "http://127.0.0.1:9/{z}/{x}/{y}.png".to_string(),
        subdomains: Vec::new(),
        ..TileSource::default()
    }
}

#[test]
fn test_failed_fetch_reports_coord() {
    let (tx, rx) = std::sync::mpsc::channel();
    let client = TileClient::new(unreachable_source(), 2, tx).unwrap();
    let coord = TileCoord::new(13, 4093, 2724);

    assert!(client.request(coord).unwrap());

    let event = rx.recv_timeout(Duration::from_secs(30)).expect("no tile event");
    assert_eq!(event.coord(), coord);
    assert!(matches!(event, TileEvent::Failed { .. }));
    assert_eq!(client.in_flight(), 0);
}

#[test]
fn test_every_request_gets_an_answer() {
    let (tx, rx) = std::sync::mpsc::channel();
    let client = TileClient::new(unreachable_source(), 3, tx).unwrap();
    let coords: Vec<TileCoord> = (0..4).map(|x| TileCoord::new(2, x, 1)).collect();

    for &c in &coords {
        client.request(c).unwrap();
    }

    let mut answered: Vec<TileCoord> = (0..coords.len())
        .map(|_| rx.recv_timeout(Duration::from_secs(30)).expect("missing tile event").coord())
        .collect();
    answered.sort_by_key(|c| c.x);
    assert_eq!(answered, coords);
}

#[test]
fn test_request_after_shutdown_fails() {
    let (tx, _rx) = std::sync::mpsc::channel();
    let client = TileClient::new(unreachable_source(), 1, tx).unwrap();

    client.shutdown();
    // The dispatcher drops its receiver once it has stopped
    std::thread::sleep(Duration::from_millis(200));

    let coord = TileCoord::new(0, 0, 0);
    assert!(client.request(coord).is_err());
    assert_eq!(client.in_flight(), 0);
    // Not mistaken for a duplicate of the dropped request
    assert!(client.request(coord).is_err());
}
