// src/main.rs
// ============================================================================
// TAKE2BOB CLI
// ============================================================================
//
// Uso simple (toma más reciente):
//   take2bob
//
// Varias tomas:
//   take2bob ./take_001 ./take_002 --joints joints.json
//
// ============================================================================

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use take2bob::{
    bob::OUTPUT_FILE,
    builder::process_takes,
    mapping::{AxisRemap, RetargetConfig},
    take::locate_latest_take,
};

#[derive(Parser, Debug)]
#[command(name = "take2bob")]
#[command(about = "Convert motion capture takes to BoB channel text")]
#[command(version)]
struct Args {
    /// Take directories (newest take if none given)
    #[arg(value_name = "TAKE_DIR")]
    takes: Vec<PathBuf>,

    /// Directory searched for the newest take
    #[arg(long, value_name = "DIR")]
    take_root: Option<PathBuf>,

    /// JSON joint table replacing the built-in Shadow → BoB mapping
    #[arg(long, value_name = "FILE")]
    joints: Option<PathBuf>,

    /// Axis remap: corrected (x→2, y→0, z→1), legacy (x→0, y→2, z→1),
    /// identity, or an explicit permutation such as 2,0,1
    #[arg(long, value_name = "REMAP")]
    remap: Option<String>,

    /// Output file name inside each take directory
    #[arg(short, long, default_value = OUTPUT_FILE)]
    output_name: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<RetargetConfig> {
    let mut config = match &args.joints {
        Some(path) => RetargetConfig::load(path)
            .with_context(|| format!("Failed to load joint table {}", path.display()))?,
        None => RetargetConfig::default(),
    };

    if let Some(name) = &args.remap {
        let remap = AxisRemap::from_str(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid remap: {} (expected corrected, legacy, identity or i,j,k)",
                name
            )
        })?;
        config = config.with_remap(remap);
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let start = Instant::now();

    let config = load_config(&args)?;
    info!("joints: {}, remap: {}", config.joints.len(), config.remap);

    let takes = if args.takes.is_empty() {
        let newest = locate_latest_take(args.take_root.as_deref())
            .context("No take given and no take found to convert")?;
        info!("newest take: {}", newest.display());
        vec![newest]
    } else {
        if args.take_root.is_some() {
            warn!("--take-root ignored, take directories given explicitly");
        }
        args.takes.clone()
    };

    let results = process_takes(&takes, &config, &args.output_name);

    let mut failed = 0usize;
    for (dir, result) in &results {
        match result {
            Ok(stats) => info!(
                "✓ {} → {} ({} joints, {} frames, {} bytes)",
                dir.display(),
                stats.output.display(),
                stats.joints,
                stats.frames,
                stats.bytes_written
            ),
            Err(e) => {
                failed += 1;
                eprintln!("✗ {}: {}", dir.display(), e);
            }
        }
    }

    info!(
        "converted {}/{} takes in {:.1}s",
        results.len() - failed,
        results.len(),
        start.elapsed().as_secs_f64()
    );

    if failed > 0 {
        anyhow::bail!("{} of {} takes failed", failed, results.len());
    }

    Ok(())
}
