//! Estimate transitivity and triangle count of an edge list file
//!
//! Usage:
//! ```text
//! streamtri web-Stanford.txt --edge-reservoir 1000 --wedge-reservoir 1000
//! streamtri web-Stanford.txt --verbose   # one line per sampled edge
//! RUST_LOG=debug streamtri web-Stanford.txt   # same, via the environment
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use streamtri::graph::{StreamingTriangles, TriangleFormula};
use streamtri::io::EdgeListReader;
use streamtri::traits::{Sketch, TriangleSketch};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Formula {
    /// (ρ·t² / m) · (m − 1) · W
    Literal,
    /// ρ·t² / (m·(m − 1)) · W
    Paired,
}

impl From<Formula> for TriangleFormula {
    fn from(formula: Formula) -> Self {
        match formula {
            Formula::Literal => TriangleFormula::Literal,
            Formula::Paired => TriangleFormula::Paired,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Streaming transitivity and triangle count estimation",
    after_help = "Per-update progress lines are logged at debug level: pass --verbose or set RUST_LOG=debug."
)]
struct Args {
    /// Edge list file (two node ids per line, `#` comments)
    path: PathBuf,

    /// Edge reservoir capacity
    #[arg(long, default_value = "100")]
    edge_reservoir: usize,

    /// Wedge reservoir capacity
    #[arg(long, default_value = "100")]
    wedge_reservoir: usize,

    /// Seed for reproducible sampling (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Triangle count formula
    #[arg(long, value_enum, default_value = "literal")]
    formula: Formula,

    /// Log a progress line for every edge that enters the edge reservoir
    #[arg(short, long)]
    verbose: bool,
}

/// Default log filter when RUST_LOG is unset
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(args.verbose)),
    )
    .target(env_logger::Target::Stderr)
    .init();

    let start = Instant::now();

    let rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let mut st = StreamingTriangles::with_rng(args.edge_reservoir, args.wedge_reservoir, rng)?
        .with_formula(args.formula.into());

    let file = File::open(&args.path)
        .with_context(|| format!("failed to open {}", args.path.display()))?;
    info!(
        "streaming {} (edge reservoir: {}, wedge reservoir: {})",
        args.path.display(),
        args.edge_reservoir,
        args.wedge_reservoir
    );

    for edge in EdgeListReader::new(BufReader::new(file)) {
        let edge = edge.with_context(|| format!("failed to read {}", args.path.display()))?;
        st.push(edge);
    }

    let diagnostics = st.diagnostics();
    info!(
        "processed {} edges (edge_res: {}, wedge_res: {}, closed: {}, total_wedges: {})",
        st.count(),
        diagnostics.edges_sampled,
        diagnostics.wedges_sampled,
        diagnostics.closed_wedges,
        diagnostics.total_wedges
    );

    println!("Transitivity: {}", st.transitivity());
    println!("Triangles: {}", st.triangle_count());
    println!("Time consumed: {}", format_elapsed(start.elapsed()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_enables_progress_lines() {
        let args = Args::parse_from(["streamtri", "edges.txt", "--verbose"]);
        assert!(args.verbose);
        assert_eq!(default_filter(args.verbose), "debug");

        let args = Args::parse_from(["streamtri", "edges.txt"]);
        assert!(!args.verbose);
        assert_eq!(default_filter(args.verbose), "info");
        assert_eq!(args.edge_reservoir, 100);
        assert_eq!(args.wedge_reservoir, 100);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(3725)), "01:02:05");
    }
}
