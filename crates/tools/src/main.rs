use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use playmap::{GenerationConfig, Map, MapGenerator, TerrainCategory};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML generation config; defaults apply for anything it omits
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the config seed (0 picks one)
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
    /// Write the accepted map as JSON to this path
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Print the terrain as ASCII, resources marked with '*'
    #[arg(short, long)]
    preview: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("playmap=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let generator = MapGenerator::new(&config);
    info!(target: "playmap::tools", seed = generator.seed(), "generating map");
    let map = generator.generate().context("Map generation failed")?;

    print_summary(&map);
    if args.preview {
        print_preview(&map).context("Failed to write preview")?;
    }
    if let Some(path) = &args.out {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &map)
            .with_context(|| "Failed to serialize map JSON")?;
        writer.flush().with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Map written to {}", path.display());
    }
    Ok(())
}

fn print_summary(map: &Map) {
    println!("Map {}x{}", map.width(), map.height());
    println!("Seed: {} (accepted attempt seed {})", map.seed(), map.generation_seed());
    println!("Attempts: {}", map.attempts());
    println!("Fingerprint: {:016x}", map.fingerprint());

    let histogram = map.terrain_histogram();
    let total = (map.width() * map.height()) as f64;
    for category in TerrainCategory::ALL {
        let count = histogram[category.index()];
        if count > 0 {
            println!("  {:?}: {} ({:.1}%)", category, count, 100.0 * count as f64 / total);
        }
    }
    println!("Resources: {}", map.resources().len());
}

fn print_preview(map: &Map) -> io::Result<()> {
    let occupied: BTreeSet<(usize, usize)> = map
        .resources()
        .iter()
        .map(|point| (point.position().x as usize, point.position().y as usize))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for y in 0..map.height() {
        let row: String = (0..map.width())
            .map(|x| {
                if occupied.contains(&(x, y)) {
                    '*'
                } else {
                    map.terrain_at(x, y).map_or(' ', TerrainCategory::glyph)
                }
            })
            .collect();
        writeln!(out, "{row}")?;
    }
    Ok(())
}
