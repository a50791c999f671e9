use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::MapError;
use crate::geo::TileCoord;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Where tiles come from and how to ask for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSource {
    /// Template with `{s}`, `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub max_zoom: u8,
    pub attribution: String,
    pub user_agent: String,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            subdomains: vec!["a".into(), "b".into(), "c".into()],
            max_zoom: 19,
            attribution: OSM_ATTRIBUTION.to_string(),
            user_agent: concat!("pinmap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TileSource {
    /// Subdomain for a tile; spreads neighbouring tiles over the servers.
    pub fn subdomain_for(&self, coord: TileCoord) -> &str {
        if self.subdomains.is_empty() {
            return "";
        }
        let index = (coord.x as u64 + coord.y as u64) % self.subdomains.len() as u64;
        &self.subdomains[index as usize]
    }

    pub fn url_for(&self, coord: TileCoord) -> String {
        self.url_template
            .replace("{s}", self.subdomain_for(coord))
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    pub fn http_client(&self) -> Result<reqwest::blocking::Client, MapError> {
        Ok(reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(Duration::from_secs(15))
            .build()?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileRequest {
    Fetch(TileCoord),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TileEvent {
    /// Encoded image bytes as served (PNG for the default source).
    Loaded { coord: TileCoord, bytes: Vec<u8> },
    Failed { coord: TileCoord, reason: String },
}

impl TileEvent {
    pub fn coord(&self) -> TileCoord {
        match self {
            TileEvent::Loaded { coord, .. } | TileEvent::Failed { coord, .. } => *coord,
        }
    }
}

/// Download one tile.
pub fn fetch_tile(
    client: &reqwest::blocking::Client,
    source: &TileSource,
    coord: TileCoord,
) -> Result<Vec<u8>, MapError> {
    let url = source.url_for(coord);
    debug!("[TILES] GET {}", url);
    let response = client.get(&url).send()?;
    if !response.status().is_success() {
        return Err(MapError::TileStatus(response.status()));
    }
    Ok(response.bytes()?.to_vec())
}

/// Background tile downloader.
///
/// A dispatcher thread takes [`TileRequest`]s and runs each fetch on a bounded
/// worker pool; results come back on the event channel given to [`TileClient::new`].
pub struct TileClient {
    requests: Sender<TileRequest>,
    in_flight: Arc<Mutex<HashSet<TileCoord>>>,
    _dispatcher: thread::JoinHandle<()>,
}

impl TileClient {
    pub fn new(source: TileSource, workers: usize, sender: Sender<TileEvent>) -> Result<Self, MapError> {
        let http = source.http_client()?;
        let (requests, receiver) = std::sync::mpsc::channel();
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let pool = threadpool::ThreadPool::new(workers.max(1));

        let source = Arc::new(source);
        let in_flight_dispatch = in_flight.clone();
        let dispatcher = thread::spawn(move || {
            Self::dispatch(receiver, pool, http, source, in_flight_dispatch, sender);
        });

        Ok(Self {
            requests,
            in_flight,
            _dispatcher: dispatcher,
        })
    }

    fn dispatch(
        receiver: Receiver<TileRequest>,
        pool: threadpool::ThreadPool,
        http: reqwest::blocking::Client,
        source: Arc<TileSource>,
        in_flight: Arc<Mutex<HashSet<TileCoord>>>,
        sender: Sender<TileEvent>,
    ) {
        info!("🟢 [TILES] Dispatcher started with {} workers", pool.max_count());
        let mut fetched = 0_u64;
        loop {
            match receiver.recv() {
                Ok(TileRequest::Fetch(coord)) => {
                    fetched += 1;
                    let http = http.clone();
                    let source = source.clone();
                    let in_flight = in_flight.clone();
                    let sender = sender.clone();
                    pool.execute(move || {
                        let event = match fetch_tile(&http, &source, coord) {
                            Ok(bytes) => TileEvent::Loaded { coord, bytes },
                            Err(e) => {
                                warn!("⚠️ [TILES] Tile {} failed: {}", coord, e);
                                TileEvent::Failed {
                                    coord,
                                    reason: e.to_string(),
                                }
                            }
                        };
                        if let Ok(mut set) = in_flight.lock() {
                            set.remove(&coord);
                        }
                        let _ = sender.send(event);
                    });
                }
                Ok(TileRequest::Shutdown) => {
                    info!("🛑 [TILES] Shutdown requested after {} requests", fetched);
                    break;
                }
                Err(_) => {
                    info!("[TILES] Request channel closed after {} requests", fetched);
                    break;
                }
            }
        }
        pool.join();
    }

    /// Queue a download unless the same tile is already being fetched.
    /// Returns `Ok(false)` for a duplicate request.
    pub fn request(&self, coord: TileCoord) -> Result<bool, MapError> {
        {
            let mut set = self.in_flight.lock().map_err(|_| MapError::TileClientClosed)?;
            if !set.insert(coord) {
                return Ok(false);
            }
        }
        if self.requests.send(TileRequest::Fetch(coord)).is_err() {
            error!("💀 [TILES] Dispatcher is gone, dropping request for {}", coord);
            if let Ok(mut set) = self.in_flight.lock() {
                set.remove(&coord);
            }
            return Err(MapError::TileClientClosed);
        }
        Ok(true)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().map(|set| set.len()).unwrap_or(0)
    }

    pub fn shutdown(&self) {
        let _ = self.requests.send(TileRequest::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdomain_rotation() {
        let source = TileSource::default();
        assert_eq!(source.subdomain_for(TileCoord::new(3, 0, 0)), "a");
        assert_eq!(source.subdomain_for(TileCoord::new(3, 1, 0)), "b");
        assert_eq!(source.subdomain_for(TileCoord::new(3, 1, 1)), "c");
        assert_eq!(source.subdomain_for(TileCoord::new(3, 2, 1)), "a");
    }

    #[test]
    fn test_template_without_subdomain() {
        let source = TileSource {
            url_template: "https://tiles.example.org/{z}/{x}/{y}.png".into(),
            subdomains: Vec::new(),
            ..TileSource::default()
        };
        assert_eq!(
            source.url_for(TileCoord::new(2, 1, 3)),
            "https://tiles.example.org/2/1/3.png"
        );
    }
}
