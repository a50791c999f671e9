use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pinmap_core::script::{parse_script, replay as replay_events, Snapshot};
use pinmap_core::{LatLng, MapConfig, MapState, TileCoord, TileSource};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an event script and print the resulting annotations as JSON
    Replay {
        script: PathBuf,
        /// Initial circle radius input, in meters
        #[arg(long, env = "PINMAP_RADIUS", default_value = pinmap_core::config::DEFAULT_RADIUS_TEXT)]
        radius: String,
    },
    /// Print the URL of the tile under a coordinate, optionally downloading it
    Tile {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, default_value_t = 13)]
        zoom: u8,
        /// Tile URL template with {s}, {z}, {x} and {y} placeholders
        #[arg(long, env = "PINMAP_TILE_URL")]
        tile_url: Option<String>,
        /// Write the tile image here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    match args.command {
        Command::Replay { script, radius } => replay(&script, radius),
        Command::Tile {
            lat,
            lng,
            zoom,
            tile_url,
            output,
        } => {
            let mut source = TileSource::default();
            if let Some(url) = tile_url {
                source.url_template = url;
            }
            tile(&source, LatLng::new(lat, lng), zoom, output).await
        }
    }
}

fn replay(path: &Path, radius: String) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let events = parse_script(&text).with_context(|| format!("parsing {}", path.display()))?;

    let config = MapConfig {
        initial_radius: radius,
        ..MapConfig::default()
    };
    let mut state = MapState::new(&config);

    let rejected = replay_events(&mut state, events);
    if rejected > 0 {
        tracing::warn!("{} event(s) rejected during replay", rejected);
    }

    println!("{}", serde_json::to_string_pretty(&Snapshot::of(&state))?);
    Ok(())
}

async fn tile(source: &TileSource, position: LatLng, zoom: u8, output: Option<PathBuf>) -> Result<()> {
    let zoom = zoom.min(source.max_zoom);
    let coord = TileCoord::containing(position, zoom);
    let url = source.url_for(coord);
    println!("{} {}", coord, url);

    if let Some(output) = output {
        let client = reqwest::Client::builder()
            .user_agent(source.user_agent.clone())
            .build()?;
        let response = client.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(&output, &bytes)
            .await
            .with_context(|| format!("writing {}", output.display()))?;
        tracing::info!("wrote {} bytes to {}", bytes.len(), output.display());
    }
    Ok(())
}
