use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use formats::GlobePoints;
use foundation::math::MapSize;
use serde::Serialize;
use tools::{Projection, curves, inspect, project};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect globe point data and the geometry built from it")]
struct Args {
    /// Sphere radius in world units
    #[arg(long, default_value_t = 800.0, global = true)]
    radius: f64,

    /// Half-width of the source map in pixels
    #[arg(long, default_value_t = 1024.0, global = true)]
    map_width: f64,

    /// Half-height of the source map in pixels
    #[arg(long, default_value_t = 512.0, global = true)]
    map_height: f64,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise locations, roles and connectors
    Inspect { file: PathBuf },
    /// Sphere positions and camera angles for every location
    Project {
        file: PathBuf,

        /// Also project the unlabelled map points
        #[arg(long)]
        points: bool,
    },
    /// Control points and apex of every connector curve
    Curves {
        file: PathBuf,

        /// Only connectors starting at this location
        #[arg(long)]
        from: Option<String>,

        /// Include the sampled path
        #[arg(long)]
        path: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    let projection = Projection {
        map: MapSize::new(args.map_width, args.map_height),
        radius: args.radius,
    };
    if !projection.map.is_valid() {
        return Err(format!(
            "invalid map size {}x{}",
            args.map_width, args.map_height
        ));
    }
    if !(projection.radius.is_finite() && projection.radius > 0.0) {
        return Err(format!("invalid radius {}", args.radius));
    }

    match args.command {
        Command::Inspect { file } => {
            let data = load(&file)?;
            emit(&inspect(&data), args.pretty)
        }
        Command::Project { file, points } => {
            let data = load(&file)?;
            emit(&project(&data, projection, points), args.pretty)
        }
        Command::Curves { file, from, path } => {
            let data = load(&file)?;
            if let Some(key) = from.as_deref().filter(|k| data.location(k).is_none()) {
                return Err(format!("unknown location `{key}`"));
            }
            let report = curves(&data, projection, from.as_deref(), path);
            info!(count = report.len(), "built connector curves");
            emit(&report, args.pretty)
        }
    }
}

fn load(file: &Path) -> Result<GlobePoints, String> {
    let data = GlobePoints::load(file).map_err(|e| e.to_string())?;
    info!(
        file = %file.display(),
        locations = data.locations.len(),
        points = data.points.len(),
        "loaded globe points"
    );
    Ok(data)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| format!("serialize: {e}"))?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{json}").map_err(|e| format!("write stdout: {e}"))
}
