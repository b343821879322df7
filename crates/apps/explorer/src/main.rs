use std::sync::Arc;

use clap::Parser;
use explorer::{Action, ExplorerConfig, HudSummary, Session};
use ingest::OverpassSource;
use layers::basemap::MapStyle;
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless bus-stop hexbin explorer")]
struct Args {
    /// Overpass interpreter URL (default: OVERPASS_URL or overpass-api.de)
    #[arg(long)]
    overpass_url: Option<String>,

    /// Cell resolution, 6 to 10 (default: EXPLORER_RESOLUTION or 8)
    #[arg(long)]
    resolution: Option<u8>,

    /// Select and confirm this many of the densest cells
    #[arg(long, default_value_t = 0)]
    select: usize,

    /// Frame length used to play camera transitions
    #[arg(long, default_value_t = 16)]
    frame_ms: u32,

    /// Basemap, by label ("Carto Dark") or tile URL
    #[arg(long)]
    style: Option<String>,

    /// Print the HUD text to stderr
    #[arg(long)]
    hud: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ExplorerConfig::from_env()?;
    if let Some(url) = args.overpass_url {
        config.overpass_url = url;
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    config.validate()?;
    let style = match args.style.as_deref() {
        Some(name) => Some(
            MapStyle::find_by_label(name)
                .or_else(|| MapStyle::find_by_url(name))
                .ok_or_else(|| format!("unknown map style: {name}"))?,
        ),
        None => None,
    };

    let source = Arc::new(OverpassSource::new(config.overpass_url.clone()));
    let mut session = Session::new(&config, source);
    if let Some(style) = style {
        session.dispatch(Action::SetMapStyle(style));
    }

    info!(url = %config.overpass_url, resolution = config.resolution, "loading points");
    session.load().await;
    if let Some(err) = session.explorer().point_data().error() {
        warn!(%err, "fetch failed");
    }

    if args.select > 0 {
        let chosen = session.select_densest(args.select);
        if chosen.is_empty() {
            warn!("no cells to select");
        }
        session.run_transition(args.frame_ms);
    }

    let explorer = session.explorer_mut();
    for event in explorer.drain_events() {
        debug!(seq = event.seq, kind = ?event.kind, "{}", event.message);
    }
    let hud = HudSummary::of(explorer);
    if args.hud {
        eprint!("{hud}");
    }
    let pose = explorer.camera().pose();
    let out = json!({
        "hud": hud,
        "camera": {
            "longitude": pose.longitude,
            "latitude": pose.latitude,
            "zoom": pose.zoom,
            "pitch": pose.pitch,
            "bearing": pose.bearing,
        },
        "layers": explorer.layers(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
