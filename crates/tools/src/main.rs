use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scene::{DotConfig, GlobeConfig};
use tools::{bake_map, inspect_map};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and bake world bitmaps for the dot globe")]
struct Args {
    /// Globe config JSON; only the `dots` section is used
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print size, land share, dot count and fingerprint of a bitmap
    Inspect {
        map: PathBuf,

        /// Seed for the per-dot phase
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sample the dot field and write it as JSON
    Bake {
        map: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let dots = load_dot_config(args.config.as_deref())?;

    match args.command {
        Command::Inspect { map, seed, json } => cmd_inspect(&map, &dots, seed, json),
        Command::Bake { map, out, seed } => cmd_bake(&map, &out, &dots, seed),
    }
}

fn load_dot_config(path: Option<&Path>) -> Result<DotConfig, String> {
    let Some(path) = path else {
        return Ok(DotConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let cfg = GlobeConfig::from_json(&text).map_err(|e| format!("{path:?}: {e}"))?;
    Ok(cfg.dots)
}

fn cmd_inspect(map: &Path, dots: &DotConfig, seed: u64, json: bool) -> Result<(), String> {
    let bytes = fs::read(map).map_err(|e| format!("read {map:?}: {e}"))?;
    let report = inspect_map(&bytes, dots, seed).map_err(|e| format!("{map:?}: {e}"))?;

    if json {
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("map:          {}", map.display());
    println!("size:         {}x{}", report.width, report.height);
    println!("land:         {:.2}%", report.land_fraction * 100.0);
    println!("dots:         {}", report.dot_count);
    println!("fingerprint:  {}", report.fingerprint);
    Ok(())
}

fn cmd_bake(map: &Path, out: &Path, dots: &DotConfig, seed: u64) -> Result<(), String> {
    let bytes = fs::read(map).map_err(|e| format!("read {map:?}: {e}"))?;
    let baked = bake_map(&bytes, dots, seed).map_err(|e| format!("{map:?}: {e}"))?;
    let text = baked.to_json().map_err(|e| e.to_string())?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| format!("create {parent:?}: {e}"))?;
    }
    fs::write(out, text).map_err(|e| format!("write {out:?}: {e}"))?;

    info!(dots = baked.dots.len(), out = %out.display(), "wrote baked dot field");
    Ok(())
}
