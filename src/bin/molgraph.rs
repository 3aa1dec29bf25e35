use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use molgraph::*;
use tracing::{info, warn};

/// Fetch a molecule from PubChem by name and draw its bond graph.
#[derive(Parser)]
#[command(name = "molgraph", version)]
struct Cli {
    /// Molecule name to look up on PubChem
    name: String,

    /// Keep explicit hydrogen atoms instead of filtering them out
    #[arg(long)]
    include_hydrogen: bool,

    /// Output image path (defaults to <NAME>.png in the current directory)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stroke-width multiplier applied to each bond order
    #[arg(long, value_name = "FACTOR", default_value_t = 2.0)]
    width_scale: f64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let lines = retrieve_sdf(&cli.name).context("retrieval failed")?;

    let (elements, bonds) =
        parse_sdf(&lines, cli.include_hydrogen).context("parsing the structure table failed")?;
    if elements.is_empty() {
        warn!("no atoms left to draw for {}", cli.name);
    }

    let graph = create_graph(&elements, &bonds).context("assembling the molecule graph failed")?;

    let style = RenderStyle {
        width_scale: cli.width_scale,
        ..Default::default()
    };
    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", cli.name)));
    render_image(&graph, &style, &output).context("rendering failed")?;

    info!("wrote {}", output.display());
    Ok(())
}
