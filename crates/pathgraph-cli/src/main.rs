// crates/pathgraph-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pathgraph_core::constants::{GAP_THRESHOLD, RDP_EPSILON, RESAMPLE_SPACING};
use pathgraph_pipeline::{CancellationToken, PipelineConfig, RdpFlattener};
use pathgraph_pose::{generate_trajectory, write_sqlite, GeneratorConfig, SqlitePoseStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "pathgraph-cli",
    about = "Indoor SLAM-trajectory-to-path-graph reference CLI",
    long_about = "Turn a decoded SLAM pose trajectory into a merged, per-floor indoor path graph.\n\nUse this tool to generate synthetic trajectories and to run the full pipeline over a pose store.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Generate a synthetic multi-floor trajectory and persist it as a
    /// pose store (a `Node(id, pose)` SQLite database).
    Simulate {
        /// Number of floors to walk, joined by vertical passages.
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
        floors: u32,

        /// Trajectory points sampled per floor.
        #[arg(long, default_value_t = 200)]
        points_per_floor: usize,

        /// Vertical step height between consecutive floors, in meters.
        #[arg(long, default_value_t = 3.0)]
        floor_height: f64,

        /// Step spacing for the per-floor random walk, in meters.
        #[arg(long, default_value_t = 0.3)]
        step_spacing: f64,

        /// Seed for the deterministic trajectory generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output path for the pose store (SQLite database).
        #[arg(long, default_value = "trajectory.db")]
        out: PathBuf,
    },

    /// Run the full pipeline over a pose store and write the merged path
    /// graph (JSON or CBOR, chosen by the output file extension).
    Run {
        /// Input pose store (SQLite database).
        #[arg(long)]
        store: PathBuf,

        /// Output path for the pipeline result (`.json` or `.cbor`).
        #[arg(long, default_value = "path_graph.json")]
        out: PathBuf,

        /// Optional TOML file tuning the path flattener's RDP parameters.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Tunable knobs exposed at the CLI boundary. Every other stage uses its
/// spec default; only the flattener's RDP parameters are independently
/// adjustable per floor plan (§9).
#[derive(Debug, Deserialize)]
struct TunableConfig {
    #[serde(default)]
    flatten: FlattenConfig,
}

#[derive(Debug, Deserialize)]
struct FlattenConfig {
    #[serde(default = "default_gap_threshold")]
    gap_threshold: f64,
    #[serde(default = "default_rdp_epsilon")]
    rdp_epsilon: f64,
    #[serde(default = "default_resample_spacing")]
    resample_spacing: f64,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            gap_threshold: default_gap_threshold(),
            rdp_epsilon: default_rdp_epsilon(),
            resample_spacing: default_resample_spacing(),
        }
    }
}

fn default_gap_threshold() -> f64 {
    GAP_THRESHOLD
}
fn default_rdp_epsilon() -> f64 {
    RDP_EPSILON
}
fn default_resample_spacing() -> f64 {
    RESAMPLE_SPACING
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Simulate {
            floors,
            points_per_floor,
            floor_height,
            step_spacing,
            seed,
            out,
        } => simulate(floors, points_per_floor, floor_height, step_spacing, seed, out),

        Cmd::Run { store, out, config } => run(store, out, config),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}

fn simulate(
    floors: u32,
    points_per_floor: usize,
    floor_height: f64,
    step_spacing: f64,
    seed: u64,
    out: PathBuf,
) -> Result<()> {
    info!(floors, points_per_floor, seed, "generating synthetic trajectory");
    let cfg = GeneratorConfig {
        floor_count: floors,
        points_per_floor,
        floor_height,
        step_spacing,
        ..GeneratorConfig::default()
    };
    let store = generate_trajectory(cfg);
    let rows = pathgraph_pose::PoseStore::raw_rows(&store)?;

    ensure_parent_dir(&out)?;
    write_sqlite(&out, &rows).with_context(|| format!("writing pose store to {}", out.display()))?;

    println!(
        "Simulated {} floors, {} poses → {}",
        floors,
        rows.len(),
        out.display()
    );
    Ok(())
}

fn run(store_path: PathBuf, out: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    info!(store=%store_path.display(), out=%out.display(), "running pipeline");

    let tunable = match config_path {
        Some(path) => {
            let src = std::fs::read_to_string(&path)
                .with_context(|| format!("read config {}", path.display()))?;
            toml::from_str(&src).with_context(|| format!("parse config {}", path.display()))?
        }
        None => TunableConfig { flatten: FlattenConfig::default() },
    };

    let store = SqlitePoseStore::open(&store_path)
        .with_context(|| format!("open pose store {}", store_path.display()))?;

    let flattener = RdpFlattener::new(
        tunable.flatten.gap_threshold,
        tunable.flatten.rdp_epsilon,
        tunable.flatten.resample_spacing,
    );
    let run_config = PipelineConfig {
        vertical: Default::default(),
        floors: Default::default(),
        dedup: Default::default(),
        flattener,
        graph: Default::default(),
    };

    let result = pathgraph_pipeline::run_with(&store, &CancellationToken::new(), &run_config)
        .context("pipeline run failed")?;

    ensure_parent_dir(&out)?;
    pathgraph_core::io::write_result_auto(&out, &result)
        .with_context(|| format!("writing result to {}", out.display()))?;

    println!(
        "Pipeline complete: {} floors, {} nodes, {} edges → {}",
        result.stats.floors_detected,
        result.path_nodes.len(),
        result.path_edges.len(),
        out.display()
    );
    Ok(())
}
