//! Command-line front end for the coderef engine crates.
//!
//! All file I/O lives here; the engine crates operate purely on in-memory
//! snapshots.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coderef", version, about = "Code reference resolution and drift detection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a reference tag and print it as JSON
    Parse {
        /// Tag text, e.g. '@Fn/auth/login#authenticate:24'
        tag: String,
    },

    /// Extract reference tags embedded in a document
    Extract {
        /// File to scan
        file: PathBuf,
    },

    /// Wrap raw scanner output into a snapshot document
    Snapshot {
        /// JSON array of scanner records
        scan: PathBuf,
    },

    /// Query elements in a snapshot
    Query {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Restrict to these type designators (repeatable)
        #[arg(long = "kind", value_name = "CODE")]
        kinds: Vec<String>,

        /// Glob over element paths, e.g. 'auth/*'
        #[arg(long)]
        path_pattern: Option<String>,

        /// Exact metadata matches (repeatable)
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        metadata: Vec<String>,

        #[arg(long)]
        limit: Option<usize>,

        /// Attach relationship flags (needs --edges)
        #[arg(long)]
        relationships: bool,

        /// JSON array of edge facts
        #[arg(long)]
        edges: Option<PathBuf>,
    },

    /// Impact analysis for one reference
    Impact {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Tag text of the changed element
        tag: String,

        /// JSON array of edge facts
        #[arg(long)]
        edges: PathBuf,

        /// Maximum traversal depth (default 3)
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Classify drift between two snapshots
    Drift {
        /// Baseline snapshot JSON file
        baseline: PathBuf,

        /// Current snapshot JSON file
        current: PathBuf,

        /// Rename similarity threshold (default 0.7)
        #[arg(long)]
        threshold: Option<f64>,

        /// Ambiguity epsilon (default 0.01)
        #[arg(long)]
        epsilon: Option<f64>,
    },
}

pub fn main_entry() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Parse { tag } => commands::parse(&tag),
        Command::Extract { file } => commands::extract(&file),
        Command::Snapshot { scan } => commands::snapshot(&scan),
        Command::Query {
            snapshot,
            kinds,
            path_pattern,
            metadata,
            limit,
            relationships,
            edges,
        } => commands::query(
            &snapshot,
            &kinds,
            path_pattern,
            &metadata,
            limit,
            relationships,
            edges.as_deref(),
        ),
        Command::Impact {
            snapshot,
            tag,
            edges,
            depth,
        } => commands::impact(&snapshot, &tag, &edges, depth),
        Command::Drift {
            baseline,
            current,
            threshold,
            epsilon,
        } => commands::drift(&baseline, &current, threshold, epsilon),
    }
}
