//! pathgraph-bench-harness
//!
//! Run small end-to-end benchmarks (generate -> run the full pipeline)
//! over a synthetic multi-floor trajectory and append CSV rows into
//! `benchmarks/reports/bench-<unix>.csv`.
//!
//! Usage examples:
//!   cargo run -p pathgraph-bench-harness -- --profile benchmarks/profiles/small.toml
//!   cargo run -p pathgraph-bench-harness -- --profile benchmarks/profiles/medium.toml

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Deserialize;

use pathgraph_pipeline::CancellationToken;
use pathgraph_pose::{generate_trajectory, GeneratorConfig};

#[derive(Debug, Deserialize)]
struct Profile {
    /// Number of floors, joined by vertical passages.
    floors: u32,
    /// Trajectory points sampled per floor.
    points_per_floor: usize,
    /// Vertical step height between consecutive floors, in meters.
    floor_height: f64,
    /// Step spacing for the per-floor random walk, in meters.
    step_spacing: f64,
    /// Repetitions of the whole pipeline.
    repeats: u32,
}

fn parse_flag(name: &str, default: &str) -> String {
    let mut it = std::env::args().skip(1);
    while let Some(k) = it.next() {
        if k == format!("--{name}") {
            return it.next().unwrap_or_else(|| default.to_string());
        }
    }
    default.to_string()
}

fn dur_ms(d: Duration) -> u128 {
    d.as_millis()
}

fn main() -> Result<()> {
    let profile_path = PathBuf::from(parse_flag("profile", "benchmarks/profiles/small.toml"));

    let profile_src = fs::read_to_string(&profile_path)
        .with_context(|| format!("read profile {:?}", profile_path))?;
    let profile: Profile = toml::from_str(&profile_src).context("parse profile toml")?;
    println!(
        "Profile: floors={}, points_per_floor={}, repeats={}",
        profile.floors, profile.points_per_floor, profile.repeats
    );

    fs::create_dir_all("benchmarks/reports").ok();

    let ts = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    let csv_path = PathBuf::from(format!("benchmarks/reports/bench-{ts}.csv"));
    let mut csv = fs::OpenOptions::new().create(true).append(true).open(&csv_path)?;
    writeln!(csv, "timestamp,floors,points_per_floor,repeat,stage,ms,extra")?;

    for rep in 0..profile.repeats {
        let gen_cfg = GeneratorConfig {
            floor_count: profile.floors,
            points_per_floor: profile.points_per_floor,
            floor_height: profile.floor_height,
            step_spacing: profile.step_spacing,
            seed: u64::from(rep) + 1,
            ..GeneratorConfig::default()
        };

        let t0 = Instant::now();
        let store = generate_trajectory(gen_cfg);
        let t_gen = t0.elapsed();
        writeln!(
            csv,
            "{ts},{},{},{},generate,{},",
            profile.floors,
            profile.points_per_floor,
            rep,
            dur_ms(t_gen)
        )?;

        let t0 = Instant::now();
        let result = pathgraph_pipeline::run(&store, &CancellationToken::new())
            .context("pipeline run failed")?;
        let t_run = t0.elapsed();
        writeln!(
            csv,
            "{ts},{},{},{},run,{},floors_detected={} nodes={} edges={}",
            profile.floors,
            profile.points_per_floor,
            rep,
            dur_ms(t_run),
            result.stats.floors_detected,
            result.path_nodes.len(),
            result.path_edges.len()
        )?;
    }

    println!("Wrote report → {}", csv_path.display());
    Ok(())
}
