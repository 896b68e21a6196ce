use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use gridq::agent::{PolicyExtractor, QLearningTrainer, QTable};
use gridq::config::{GridConfig, QLearningConfig};
use gridq::grid::GridModel;
use gridq::logging::init_logging;
use gridq::report::{self, PATH_HEADING};
use gridq::types::QueryMode;
use gridq::visualization::{
    plot_episode_lengths, plot_episode_returns, policy_map, training_summary,
};

/// Learn a grid-world navigation policy with tabular Q-learning.
///
/// Cells are numbered from 1 in row-major order, starting at the south-west corner.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First goal cell
    goal1: usize,

    /// Second goal cell
    goal2: usize,

    /// Forbidden (penalty) cell
    forbidden: usize,

    /// Wall cell
    wall: usize,

    /// Output mode: `p` (policy) or `q` (query)
    mode: String,

    /// Cell to query in `q` mode
    state: Option<usize>,

    /// JSON configuration file; command line values override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exploration rate
    #[arg(long)]
    epsilon: Option<f64>,

    /// Learning rate
    #[arg(long)]
    alpha: Option<f64>,

    /// Discount factor
    #[arg(long)]
    gamma: Option<f64>,

    /// Seed for reproducible exploration
    #[arg(long)]
    seed: Option<u64>,

    /// Write the trained value table to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Skip training and use a value table saved with --save
    #[arg(long, conflicts_with_all = ["save", "metrics", "plot"])]
    load: Option<PathBuf>,

    /// Write the training metrics as JSON to this file
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Print the policy as a map of the grid
    #[arg(long)]
    map: bool,

    /// Print a training summary with episode-length and return plots
    #[arg(long)]
    plot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn build_config(&self) -> Result<QLearningConfig> {
        let mut config = match &self.config {
            Some(path) => QLearningConfig::from_json_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => QLearningConfig::default(),
        };

        let cells = GridConfig::from_one_based(self.goal1, self.goal2, self.forbidden, self.wall)?;
        config.grid.goal1 = cells.goal1;
        config.grid.goal2 = cells.goal2;
        config.grid.forbidden = cells.forbidden;
        config.grid.wall = cells.wall;

        if let Some(epsilon) = self.epsilon {
            config.learning.epsilon = epsilon;
        }
        if let Some(alpha) = self.alpha {
            config.learning.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.learning.gamma = gamma;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mode = QueryMode::parse(&cli.mode, cli.state)?;
    let config = cli.build_config().context("Invalid configuration")?;
    let grid = GridModel::new(&config.grid)?;

    if let QueryMode::Query(state) = mode {
        anyhow::ensure!(
            state < grid.num_states(),
            "Query state {} is outside the grid (1..={})",
            state + 1,
            grid.num_states()
        );
    }

    let table = match &cli.load {
        Some(path) => {
            info!("Loading value table from {}", path.display());
            QTable::load(path, &grid)
                .with_context(|| format!("Failed to load value table from {}", path.display()))?
        }
        None => {
            let mut trainer = QLearningTrainer::new(&grid, &config)?;
            let training = trainer.train().context("Training failed")?;
            info!(
                episodes = training.episodes,
                converged = training.converged(),
                "training finished"
            );

            if let Some(path) = &cli.metrics {
                training.metrics.save(path)
                    .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
            }
            if cli.plot {
                eprintln!("{}", training_summary(&training));
                eprintln!("{}", plot_episode_lengths(&training.metrics, 60, 12));
                eprintln!("{}", plot_episode_returns(&training.metrics, 60, 12));
            }

            trainer.into_q_table()
        }
    };

    if let Some(path) = &cli.save {
        table.save(path)
            .with_context(|| format!("Failed to save value table to {}", path.display()))?;
        info!("Value table saved to {}", path.display());
    }

    let policy = PolicyExtractor::new(&grid, &table);
    match mode {
        QueryMode::Policy => {
            for line in report::policy_lines(&policy)? {
                println!("{}", line);
            }
            println!();
            println!("{}", PATH_HEADING);
            for line in report::path_lines(&grid, &policy)? {
                println!("{}", line);
            }
        }
        QueryMode::Query(state) => {
            for line in report::query_lines(&grid, &table, state)? {
                println!("{}", line);
            }
        }
    }

    if cli.map {
        println!();
        print!("{}", policy_map(&grid, &policy)?);
    }

    Ok(())
}
