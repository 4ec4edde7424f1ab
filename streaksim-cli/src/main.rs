//! StreakSim CLI: single runs, config-driven sweeps and break-even lookups.
//!
//! Commands:
//! - `run`: one Monte Carlo run from command-line parameters
//! - `sweep`: hit-rate × model sweep from a TOML config file
//! - `break-even`: break-even hit rate for a payoff profile and model
//!
//! Reports go to stdout; logs go to stderr (`RUST_LOG`, default `info`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use streaksim_core::{
    adjusted_break_even, simulate, GenerationParams, Regime, RegimeFill, RngHierarchy,
    SequenceModel, SimulationRequest,
};
use streaksim_runner::{
    render_outcome, render_run, ModelKind, SimulationConfig, SweepPlan, SweepRunner,
    DEFAULT_TOP_N,
};

#[derive(Parser)]
#[command(
    name = "streaksim",
    about = "StreakSim: Monte Carlo comparison of streak-based position sizing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Model selection and per-model parameters shared by `run` and `break-even`.
#[derive(clap::Args, Debug)]
struct ModelArgs {
    /// Sequence model: independent, phased, markov, markov2, regime.
    #[arg(long, default_value = "phased")]
    model: ModelKind,

    /// P(win | previous win) for the markov model.
    #[arg(long, default_value_t = SequenceModel::DEFAULT_P_WIN_AFTER_WIN)]
    p_win_after_win: f64,

    /// P(win | previous loss) for the markov model.
    #[arg(long, default_value_t = SequenceModel::DEFAULT_P_WIN_AFTER_LOSS)]
    p_win_after_loss: f64,

    /// P(win | win, win) for the markov2 model.
    #[arg(long, default_value_t = 0.8)]
    p_win_ww: f64,

    /// P(win | win, loss) for the markov2 model.
    #[arg(long, default_value_t = 0.6)]
    p_win_wl: f64,

    /// P(win | loss, win) for the markov2 model.
    #[arg(long, default_value_t = 0.5)]
    p_win_lw: f64,

    /// P(win | loss, loss) for the markov2 model.
    #[arg(long, default_value_t = 0.3)]
    p_win_ll: f64,

    /// Regime schedule as JSON: [{"length":120,"hit_rate":0.9,"avg_win":200,"avg_loss":100}, ...].
    #[arg(long)]
    regimes: Option<String>,

    /// Pad a short regime schedule with base-parameter trades instead of truncating.
    #[arg(long, default_value_t = false)]
    backfill_regimes: bool,
}

impl ModelArgs {
    fn to_model(&self) -> Result<SequenceModel> {
        Ok(match self.model {
            ModelKind::Independent => SequenceModel::Independent,
            ModelKind::Phased => SequenceModel::Phased,
            ModelKind::Markov => SequenceModel::Markov {
                p_win_after_win: self.p_win_after_win,
                p_win_after_loss: self.p_win_after_loss,
            },
            ModelKind::Markov2 => SequenceModel::Markov2 {
                p_win_ww: self.p_win_ww,
                p_win_wl: self.p_win_wl,
                p_win_lw: self.p_win_lw,
                p_win_ll: self.p_win_ll,
            },
            ModelKind::Regime => {
                let regimes = self
                    .regimes
                    .as_deref()
                    .map(|json| serde_json::from_str::<Vec<Regime>>(json))
                    .transpose()
                    .context("--regimes is not a valid regime JSON array")?;
                SequenceModel::RegimeSwitch {
                    regimes,
                    fill: if self.backfill_regimes {
                        RegimeFill::Backfill
                    } else {
                        RegimeFill::Truncate
                    },
                }
            }
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one Monte Carlo simulation and print the ranked strategy table.
    Run {
        /// Base hit rate, e.g. 0.7.
        #[arg(long)]
        hit_rate: f64,

        /// Average win per trade.
        #[arg(long)]
        avg_win: f64,

        /// Average loss per trade (positive).
        #[arg(long)]
        avg_loss: f64,

        /// Trades per generated sequence.
        #[arg(long, default_value_t = 400)]
        num_trades: usize,

        /// Base sequences to generate.
        #[arg(long, default_value_t = 200)]
        num_simulations: usize,

        /// Shuffles per base sequence.
        #[arg(long, default_value_t = 200)]
        num_mc_shuffles: usize,

        #[command(flatten)]
        model: ModelArgs,

        /// Master seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Leaders shown in the baseline comparison.
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },
    /// Run every (hit rate, model) pair a TOML config describes.
    Sweep {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Run one simulation at a time instead of on the thread pool.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Print the break-even hit rate for a payoff profile.
    BreakEven {
        /// Average win per trade.
        #[arg(long)]
        avg_win: f64,

        /// Average loss per trade (positive).
        #[arg(long)]
        avg_loss: f64,

        #[command(flatten)]
        model: ModelArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            hit_rate,
            avg_win,
            avg_loss,
            num_trades,
            num_simulations,
            num_mc_shuffles,
            model,
            seed,
            top,
        } => {
            let request = SimulationRequest::new(
                GenerationParams::new(hit_rate, avg_win, avg_loss, num_trades),
                model.to_model()?,
                num_simulations,
                num_mc_shuffles,
            );
            run_single(&request, seed, top)
        }
        Commands::Sweep { config, sequential } => run_sweep_cmd(&config, sequential),
        Commands::BreakEven {
            avg_win,
            avg_loss,
            model,
        } => {
            let model = model.to_model()?;
            let rate = adjusted_break_even(avg_win, avg_loss, &model)?;
            println!("Break-even hit rate ({}): {:.2}%", model.label(), rate * 100.0);
            Ok(())
        }
    }
}

fn run_single(request: &SimulationRequest, seed: u64, top: usize) -> Result<()> {
    info!(model = request.model.label(), seed, "running simulation");
    let mut rng = RngHierarchy::new(seed).rng_for("run", 0);
    let report = simulate(request, &mut rng)?;
    print!("{}", render_run(request, &report, top));
    Ok(())
}

fn run_sweep_cmd(config_path: &Path, sequential: bool) -> Result<()> {
    let config = SimulationConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let plan = SweepPlan::from_config(&config);
    let parallel = config.sweep.parallel && !sequential;

    let outcomes = SweepRunner::new()
        .with_parallelism(parallel)
        .run_with_progress(&plan, |index, total, outcome| {
            info!(
                run = index + 1,
                total,
                label = %outcome.run.label,
                "run finished"
            );
        })?;

    for outcome in &outcomes {
        print!("{}", render_outcome(outcome, outcomes.len()));
    }
    Ok(())
}
