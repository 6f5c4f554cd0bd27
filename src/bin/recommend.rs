//! territory-recommend - print MCTS move recommendations for a snapshot.
//!
//! Reads a JSON or bincode snapshot, searches the requested stage and prints
//! the ranked moves as text or JSON. Logging goes to stderr and follows
//! `RUST_LOG`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use territory_mcts::io::{load_config, load_state};
use territory_mcts::mcts::{MCTSConfig, MCTSSearch, Stage};
use territory_mcts::rules::AllocationPolicy;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Proportional split with random one-troop variations
    Proportional,
    /// Every split over the most exposed countries
    TopK,
}

#[derive(Parser)]
#[command(name = "territory-recommend")]
#[command(about = "Recommend moves for a territory-conquest snapshot")]
struct Cli {
    /// Snapshot file (.json for JSON, anything else for bincode)
    #[arg(long)]
    state: PathBuf,

    /// Stage to search: Fortify, Battle or "AI Turn" (default: the snapshot's phase)
    #[arg(long)]
    stage: Option<Stage>,

    /// Search iterations
    #[arg(long)]
    iterations: Option<u32>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Reinforcement candidate policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Countries considered by the top-k policy
    #[arg(long, default_value = "3")]
    k: usize,

    /// Number of moves to print
    #[arg(long)]
    top: Option<usize>,

    /// Independent search trees to merge
    #[arg(long, default_value = "1")]
    roots: usize,

    /// JSON search config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn search_config(&self) -> anyhow::Result<MCTSConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => MCTSConfig::default(),
        };
        if let Some(iterations) = self.iterations {
            config = config.with_iterations(iterations);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(top) = self.top {
            config = config.with_top_n(top);
        }
        match self.policy {
            Some(PolicyArg::Proportional) => {
                config = config.with_allocation(AllocationPolicy::default());
            }
            Some(PolicyArg::TopK) => {
                config = config.with_allocation(AllocationPolicy::top_k(self.k));
            }
            None => {}
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.search_config()?;
    let state = load_state(&cli.state)
        .with_context(|| format!("loading snapshot {}", cli.state.display()))?;

    let phase = match cli.stage {
        Some(stage) => match stage.phase() {
            Some(phase) => phase,
            None => {
                println!("No recommendations during AI Turn.");
                return Ok(());
            }
        },
        None => state.phase,
    };

    info!(%phase, iterations = config.iterations, roots = cli.roots, "searching");
    let search = MCTSSearch::new(config);
    let recs = if cli.roots > 1 {
        search.recommend_roots(&state, phase, cli.roots)
    } else {
        let mut search = search;
        search.recommend(&state, phase)
    };
    info!(
        nodes = recs.stats.tree_nodes,
        sims_per_sec = format!("{:.0}", recs.stats.simulations_per_second()),
        timed_out = recs.stats.timed_out,
        "search done"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
    } else if recs.is_empty() {
        println!("No recommendations available.");
    } else {
        for line in recs.render() {
            println!("{line}");
        }
    }
    Ok(())
}
