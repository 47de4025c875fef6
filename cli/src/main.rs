use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tabletop::config::{ConfigError, EngineConfig};
use tabletop::dice::{self, DiceError};
use tabletop::scene::Scene;
use tabletop::serial::{self, SceneError};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tabletop", about = "Inspect and repair tabletop scene files")]
struct Cli {
    /// Engine config JSON (zoom limits, grid defaults).
    #[arg(long, env = "TABLETOP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a scene file.
    Inspect {
        scene: PathBuf,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Re-export a scene with every default filled in.
    Normalize {
        input: PathBuf,
        /// Output path; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Roll dice.
    Roll {
        #[arg(long, default_value_t = dice::DEFAULT_SIDES)]
        sides: u32,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Inspect { scene, json } => run_inspect(&scene, &config, json),
        Command::Normalize { input, out } => run_normalize(&input, out.as_deref(), &config),
        Command::Roll { sides, count } => run_roll(sides, count),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = read(path)?;
    let config = EngineConfig::from_json(&raw)?;
    tracing::debug!(path = %path.display(), "engine config loaded");
    Ok(config)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn load_scene(path: &Path, config: &EngineConfig) -> Result<Scene, CliError> {
    let raw = read(path)?;
    let scene = serial::import_scene(&raw, config)?;
    tracing::info!(path = %path.display(), tokens = scene.len(), "scene loaded");
    Ok(scene)
}

fn run_inspect(path: &Path, config: &EngineConfig, as_json: bool) -> Result<(), CliError> {
    let scene = load_scene(path, config)?;
    if as_json {
        let rendered = serde_json::to_string_pretty(&summary_json(&scene))?;
        println!("{rendered}");
    } else {
        print!("{}", summary_text(&scene));
    }
    Ok(())
}

fn run_normalize(input: &Path, out: Option<&Path>, config: &EngineConfig) -> Result<(), CliError> {
    let scene = load_scene(input, config)?;
    let doc = serial::export_scene(&scene)?;
    match out {
        Some(path) => {
            fs::write(path, doc).map_err(|source| CliError::Write { path: path.to_owned(), source })?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{doc}"),
    }
    Ok(())
}

fn run_roll(sides: u32, count: u32) -> Result<(), CliError> {
    let mut rng = rand::rng();
    for _ in 0..count {
        let roll = dice::roll(sides, &mut rng)?;
        println!("d{}: {}", roll.sides, roll.value);
    }
    Ok(())
}

fn summary_json(scene: &Scene) -> Value {
    let tokens: Vec<Value> = scene
        .tokens()
        .iter()
        .map(|t| json!({ "id": t.id, "name": t.name, "x": t.x, "y": t.y, "w": t.width, "h": t.height }))
        .collect();
    json!({
        "gridSize": scene.grid.cell_size,
        "showGrid": scene.grid.visible,
        "snap": scene.grid.snap,
        "zoom": scene.camera.zoom,
        "pan": scene.camera.pan,
        "map": scene.map.as_ref().map(|m| json!({ "src": m.src, "w": m.width, "h": m.height })),
        "tokens": tokens,
        "nextId": scene.next_id(),
    })
}

fn summary_text(scene: &Scene) -> String {
    let grid = &scene.grid;
    let on_off = |b: bool| if b { "on" } else { "off" };
    let mut out = format!(
        "grid: {} px (lines {}, snap {})\ncamera: zoom {:.2}, pan ({:.1}, {:.1})\n",
        grid.cell_size,
        on_off(grid.visible),
        on_off(grid.snap),
        scene.camera.zoom,
        scene.camera.pan.x,
        scene.camera.pan.y,
    );
    match &scene.map {
        Some(map) => out.push_str(&format!("map: {} ({} x {})\n", map.src, map.width, map.height)),
        None => out.push_str("map: none\n"),
    }
    out.push_str(&format!("tokens: {}\n", scene.len()));
    for t in scene.tokens() {
        out.push_str(&format!("  #{} {:<16} at ({:.1}, {:.1}) size {} x {}\n", t.id, t.name, t.x, t.y, t.width, t.height));
    }
    out
}
