//! StreakSim Runner: configuration, hit-rate/model sweeps, text reports.
//!
//! This crate builds on `streaksim-core` to provide:
//! - TOML configuration with per-model parameter sections
//! - Sweep planning over hit-rate offsets × sequence models
//! - Parallel (rayon) or sequential sweep execution with per-run seeding
//! - Plain-text run reports with a baseline comparison

pub mod config;
pub mod report;
pub mod sweep;

pub use config::{
    ConfigError, Markov2Section, MarkovSection, ModelKind, RegimeSection, SimulationConfig,
    SimulationSection, SweepSection,
};
pub use report::{render_outcome, render_run, DEFAULT_TOP_N};
pub use sweep::{
    execute_run, run_sweep, PlannedRun, RunOutcome, SweepError, SweepPlan, SweepRunner,
};
