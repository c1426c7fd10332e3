use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use controller::{GestureController, MemoryOrientationStore};
use field::synthetic::{LatitudeBands, TwoStopGradient, UniformGrid, VortexGrid};
use field::{Grid, Grids, interpolate_field};
use foundation::View;
use globe::GlobeRegistry;
use runtime::{CancelToken, Outcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::AppConfig;
use render::{RenderSummary, composite_rgb, encode_ppm};

#[derive(Debug, Parser)]
#[command(name = "windglobe", about = "Globe projections and screen-space wind fields")]
struct Cli {
    /// JSON settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the projection names the registry knows.
    Projections,
    /// Normalize an orientation string, optionally after a simulated drag or zoom.
    Orient {
        projection: String,
        #[arg(long, default_value = "")]
        orientation: String,
        #[arg(long, default_value_t = 1024)]
        width: u32,
        #[arg(long, default_value_t = 768)]
        height: u32,
        /// Drag by `DX,DY` pixels from the view centre.
        #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
        drag: Option<[f64; 2]>,
        /// Zoom to this scale.
        #[arg(long)]
        zoom: Option<f64>,
    },
    /// Interpolate a synthetic grid and write the overlay as a PPM image.
    Render {
        projection: String,
        out: PathBuf,
        #[arg(long, default_value = "")]
        orientation: String,
        #[arg(long, default_value_t = 1024)]
        width: u32,
        #[arg(long, default_value_t = 768)]
        height: u32,
        #[arg(long, value_enum, default_value_t = GridKind::Uniform)]
        grid: GridKind,
        /// Colour by latitude bands instead of wind speed.
        #[arg(long)]
        bands: bool,
        /// Also write a JSON summary here.
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum GridKind {
    Uniform,
    Vortex,
}

fn parse_pair(s: &str) -> Result<[f64; 2], String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number {v:?}: {e}"))
    };
    Ok([parse(a)?, parse(b)?])
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let registry = GlobeRegistry::new(config.utc_offset_minutes);

    match cli.command {
        Command::Projections => {
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Orient {
            projection,
            orientation,
            width,
            height,
            drag,
            zoom,
        } => cmd_orient(
            &registry,
            &config,
            &projection,
            &orientation,
            View::new(width, height),
            drag,
            zoom,
        ),
        Command::Render {
            projection,
            out,
            orientation,
            width,
            height,
            grid,
            bands,
            summary,
        } => {
            let request = RenderRequest {
                projection,
                orientation,
                view: View::new(width, height),
                grid,
                bands,
            };
            cmd_render(&registry, &config, &request, &out, summary.as_deref()).await
        }
    }
}

fn cmd_orient(
    registry: &GlobeRegistry,
    config: &AppConfig,
    projection: &str,
    orientation: &str,
    view: View,
    drag: Option<[f64; 2]>,
    zoom: Option<f64>,
) -> Result<(), String> {
    let globe = registry.build(projection, view).map_err(|e| e.to_string())?;
    let store = MemoryOrientationStore::with_orientation(orientation);
    let mut controller = GestureController::new(globe, view, store, config.gesture);

    if drag.is_some() || zoom.is_some() {
        let start = [view.width as f64 / 2.0, view.height as f64 / 2.0];
        let [dx, dy] = drag.unwrap_or([0.0, 0.0]);
        let scale = zoom.unwrap_or(controller.zoom_scale());
        let now = Instant::now();
        controller.on_gesture_start(start);
        controller.on_gesture_update(Some([start[0] + dx, start[1] + dy]), scale);
        controller.on_gesture_end(now);
        controller.poll(now + config.gesture.move_end_wait());
        for event in controller.drain_events() {
            info!(?event, "gesture event");
        }
    }

    println!("{}", controller.globe().orientation());
    Ok(())
}

struct RenderRequest {
    projection: String,
    orientation: String,
    view: View,
    grid: GridKind,
    bands: bool,
}

async fn cmd_render(
    registry: &GlobeRegistry,
    config: &AppConfig,
    request: &RenderRequest,
    out: &Path,
    summary: Option<&Path>,
) -> Result<(), String> {
    let started = Instant::now();
    let view = request.view;
    let mut globe = registry
        .build(&request.projection, view)
        .map_err(|e| e.to_string())?;
    globe.set_orientation(&request.orientation, view);

    let rotate = globe.projection().rotate();
    let primary: Arc<dyn Grid> = match request.grid {
        GridKind::Uniform => Arc::new(UniformGrid::new(10.0, 4.0)),
        GridKind::Vortex => Arc::new(VortexGrid::new([-rotate[0], -rotate[1]], 25.0, 20.0)),
    };
    let grids = if request.bands {
        let bands = LatitudeBands {
            gradient: TwoStopGradient {
                min: 0.0,
                max: 90.0,
                ..TwoStopGradient::default()
            },
        };
        Grids::with_overlay(primary, Arc::new(bands))
    } else {
        Grids::new(primary)
    };

    let outcome = interpolate_field(
        globe.as_ref(),
        grids,
        view,
        &config.interpolation,
        &CancelToken::new(),
    )
    .await
    .map_err(|e| e.to_string())?;
    let field = match outcome {
        Outcome::Completed(field) => field,
        Outcome::Canceled => return Err("interpolation canceled".to_string()),
    };

    let rgb = composite_rgb(field.overlay(), [0, 0, 0]);
    fs::write(out, encode_ppm(view, &rgb)).map_err(|e| format!("write {out:?}: {e}"))?;

    let report = RenderSummary {
        projection: globe.name().to_string(),
        orientation: globe.orientation(),
        width: view.width,
        height: view.height,
        bounds: field.bounds().into(),
        defined_vectors: field.defined_count(),
        sample_seed: field.randomize_seed(&mut rand::rng()),
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        projection = %report.projection,
        defined = report.defined_vectors,
        elapsed_ms = report.elapsed_ms,
        "rendered {out:?}"
    );
    if let Some(path) = summary {
        let payload = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
        fs::write(path, payload).map_err(|e| format!("write {path:?}: {e}"))?;
    }
    Ok(())
}
