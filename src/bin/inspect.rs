// src/bin/inspect.rs
// ============================================================================
// TAKE INSPECTOR - Muestra metadata y node map de una toma
// ============================================================================
//
// Uso: take2bob-inspect ./take_001 [--channels]
//
// ============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;

use take2bob::{
    frame::stride_from_bytes,
    mapping::RetargetConfig,
    take::{self, build_schema_index, read_take_info},
};

#[derive(Parser)]
#[command(name = "take2bob-inspect")]
#[command(about = "Inspect a motion capture take directory")]
struct Args {
    /// Take directory to inspect
    take: PathBuf,

    /// Show channel ranges for every node
    #[arg(long)]
    channels: bool,

    /// JSON joint table to check coverage against
    #[arg(long, value_name = "FILE")]
    joints: Option<PathBuf>,
}

fn format_size(size: u64) -> String {
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / 1024.0 / 1024.0)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let stream_path = take::stream_path(&args.take);
    let (info, nodes) = read_take_info(&stream_path)
        .with_context(|| format!("Cannot read {}", stream_path.display()))?;

    let meta = std::fs::metadata(&stream_path)?;
    let modified: Option<DateTime<Local>> = meta.modified().ok().map(DateTime::from);

    let stride = stride_from_bytes(info.frame_stride)?;
    let node_map = build_schema_index(&take::metadata_path(&args.take), &nodes, stride)?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  TAKE: {}", args.take.display());
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Stream:     {} ({})", stream_path.display(), format_size(meta.len()));
    if let Some(t) = modified {
        println!("  Modified:   {}", t.format("%Y-%m-%d %H:%M:%S"));
    }
    println!("  Frames:     {}", info.num_frame);
    println!("  Frame time: {} s ({:.1} Hz)", info.h, 1.0 / info.h);
    println!("  Duration:   {:.3} s", info.duration());
    println!(
        "  Stride:     {} bytes ({} columns, {} used)",
        info.frame_stride,
        stride,
        node_map.width()
    );
    println!("  Nodes:      {}", nodes.len());

    if args.channels {
        println!("\n  NODE                 CHANNELS");
        println!("  ──────────────────── ──────────────────────────────────────");
        for node in node_map.nodes() {
            let channels: Vec<String> = node_map
                .channels(node)
                .iter()
                .map(|(tag, (start, end))| format!("{}[{}..{})", tag, start, end))
                .collect();
            println!("  {:<20} {}", node, channels.join(" "));
        }
    }

    let config = match &args.joints {
        Some(path) => RetargetConfig::load(path)?,
        None => RetargetConfig::default(),
    };

    println!("\n  JOINT COVERAGE");
    println!("  ──────────────────── ──────────────────── ────────────");
    let mut missing = 0;
    for joint in &config.joints {
        let status = if node_map.contains(&joint.source) {
            "✓"
        } else {
            missing += 1;
            "✗ missing"
        };
        println!("  {:<20} {:<20} {} {}", joint.source, joint.target, joint.kind.name(), status);
    }

    println!("═══════════════════════════════════════════════════════════════");
    if missing > 0 {
        println!("  ⚠ {} joints missing, conversion will fail", missing);
    } else {
        println!("  ✓ All {} joints present", config.joints.len());
    }

    Ok(())
}
