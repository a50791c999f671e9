use clap::Parser;
use gtk4::prelude::*;
use pinmap_core::{LatLng, MapConfig, TileClient};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

pub mod state;
pub mod canvas;
pub mod controls;
pub mod annotation_list;
pub mod window;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive map with a draggable center, markers and circles", long_about = None)]
struct Args {
    /// Initial center latitude
    #[arg(long, env = "PINMAP_LAT", default_value_t = pinmap_core::config::DEFAULT_CENTER.lat, allow_negative_numbers = true)]
    lat: f64,
    /// Initial center longitude
    #[arg(long, env = "PINMAP_LNG", default_value_t = pinmap_core::config::DEFAULT_CENTER.lng, allow_negative_numbers = true)]
    lng: f64,
    /// Initial zoom level
    #[arg(long, env = "PINMAP_ZOOM", default_value_t = pinmap_core::config::DEFAULT_ZOOM)]
    zoom: f64,
    /// Initial circle radius input, in meters
    #[arg(long, env = "PINMAP_RADIUS", default_value = pinmap_core::config::DEFAULT_RADIUS_TEXT)]
    radius: String,
    /// Tile URL template with {s}, {z}, {x} and {y} placeholders
    #[arg(long, env = "PINMAP_TILE_URL")]
    tile_url: Option<String>,
    /// Concurrent tile downloads
    #[arg(long, env = "PINMAP_WORKERS", default_value_t = 4)]
    workers: usize,
}

impl Args {
    fn into_config(self) -> MapConfig {
        let mut config = MapConfig {
            initial_center: LatLng::new(self.lat, self.lng),
            initial_zoom: self.zoom,
            initial_radius: self.radius,
            fetch_workers: self.workers,
            ..MapConfig::default()
        };
        if let Some(url) = self.tile_url {
            config.tiles.url_template = url;
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Args::parse().into_config();
    tracing::info!("🚀 [MAIN] Pinmap starting at {} zoom {}", config.initial_center, config.initial_zoom);
    pinmap_core::init();

    // 1. Tile channel (MPSC) - tile workers write to this
    let (tile_tx, tile_rx) = std::sync::mpsc::channel();

    // UI side of the tile events
    let (ui_tx, ui_rx) = async_channel::unbounded();

    // Bridge thread: tiles (MPSC) -> UI (async-channel)
    std::thread::spawn(move || {
        tracing::info!("🌉 [BRIDGE] Bridge thread started");
        while let Ok(event) = tile_rx.recv() {
            if ui_tx.send_blocking(event).is_err() {
                tracing::info!("🌉 [BRIDGE] UI channel closed, stopping bridge");
                break;
            }
        }
        tracing::info!("🌉 [BRIDGE] Tile channel closed, stopping bridge");
    });

    let tiles = Rc::new(TileClient::new(config.tiles.clone(), config.fetch_workers, tile_tx)?);
    tracing::info!("✓ [MAIN] Tile client ready ({})", config.tiles.url_template);

    // The receiver is consumed by the first activation
    let rx_holder = Rc::new(RefCell::new(Some(ui_rx)));

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let shutdown_signal_ctrlc = shutdown_signal.clone();

    ctrlc::set_handler(move || {
        tracing::info!("🛑 [MAIN] Ctrl+C received");
        shutdown_signal_ctrlc.store(true, Ordering::Relaxed);
    })?;

    let app = libadwaita::Application::builder()
        .application_id("org.example.Pinmap")
        .build();

    let tiles_app = tiles.clone();
    app.connect_activate(move |app| {
        let provider = gtk4::CssProvider::new();
        match pinmap_assets::get_asset("style.css") {
            Some(css) => provider.load_from_data(&String::from_utf8_lossy(&css)),
            None => tracing::warn!("⚠️ [MAIN] style.css missing from embedded assets"),
        }

        match gtk4::gdk::Display::default() {
            Some(display) => gtk4::style_context_add_provider_for_display(
                &display,
                &provider,
                gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
            ),
            None => tracing::error!("❌ [MAIN] No display to attach the stylesheet to"),
        }

        // Set up shutdown signal polling
        let shutdown_check = shutdown_signal.clone();
        let app_clone = app.clone();
        glib::timeout_add_local(std::time::Duration::from_millis(100), move || {
            if shutdown_check.load(Ordering::Relaxed) {
                tracing::info!("🛑 [SHUTDOWN] Quitting GTK application...");
                app_clone.quit();
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });

        if let Some(rx) = rx_holder.borrow_mut().take() {
            tracing::info!("🎨 [MAIN] Building UI window...");
            window::build(app, rx, tiles_app.clone(), config.clone());
            tracing::info!("✓ [MAIN] UI window built and activated");
        } else {
            tracing::warn!("Application activated again, but channel is already consumed");
        }
    });

    // GTK parses its own argv; ours was already handled by clap
    let _ = app.run_with_args::<&str>(&[]);

    tiles.shutdown();
    Ok(())
}
