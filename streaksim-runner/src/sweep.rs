//! Hit-rate × model sweeps.
//!
//! A [`SweepPlan`] expands a config into one [`PlannedRun`] per (hit rate, model)
//! pair, hit-rate-major. [`SweepRunner`] executes the plan sequentially or on
//! the rayon pool. Every run draws from its own RNG derived from the master
//! seed, run label and plan index, so results do not depend on scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use streaksim_core::{simulate, RngHierarchy, SimError, SimulationReport, SimulationRequest};

use crate::config::{ModelKind, SimulationConfig};

/// Errors from executing a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("run {index} ({label}) failed: {source}")]
    Run {
        index: usize,
        label: String,
        #[source]
        source: SimError,
    },
}

/// One planned run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRun {
    /// Position in the plan, 0-based.
    pub index: usize,
    /// Stable label, also the RNG derivation key.
    pub label: String,
    pub model: ModelKind,
    pub request: SimulationRequest,
}

impl PlannedRun {
    pub fn hit_rate(&self) -> f64 {
        self.request.params.hit_rate
    }
}

/// Ordered runs plus the master seed they derive from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub seed: u64,
    pub runs: Vec<PlannedRun>,
}

impl SweepPlan {
    /// Offsets outer, models inner. Shifted hit rates are clamped to `[0, 1]`.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let base = config.simulation.hit_rate;
        let mut runs =
            Vec::with_capacity(config.sweep.hit_rate_offsets.len() * config.sweep.models.len());

        for offset in &config.sweep.hit_rate_offsets {
            let hit_rate = (base + offset).clamp(0.0, 1.0);
            for &model in &config.sweep.models {
                let index = runs.len();
                runs.push(PlannedRun {
                    index,
                    label: format!("{model}@{hit_rate:.4}"),
                    model,
                    request: config.request(hit_rate, model),
                });
            }
        }

        Self {
            seed: config.simulation.seed,
            runs,
        }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run: PlannedRun,
    pub report: SimulationReport,
}

/// Executes sweep plans.
#[derive(Debug, Clone)]
pub struct SweepRunner {
    parallel: bool,
}

impl Default for SweepRunner {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl SweepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Execute the whole plan; outcomes come back in plan order.
    pub fn run(&self, plan: &SweepPlan) -> Result<Vec<RunOutcome>, SweepError> {
        self.run_with_progress(plan, |_, _, _| {})
    }

    /// Like [`SweepRunner::run`], invoking `progress(index, total, outcome)`
    /// as each run finishes (completion order, not plan order, when parallel).
    pub fn run_with_progress<F>(
        &self,
        plan: &SweepPlan,
        progress: F,
    ) -> Result<Vec<RunOutcome>, SweepError>
    where
        F: Fn(usize, usize, &RunOutcome) + Send + Sync,
    {
        let hierarchy = RngHierarchy::new(plan.seed);
        let total = plan.len();
        info!(runs = total, seed = plan.seed, parallel = self.parallel, "sweep start");

        let execute = |run: &PlannedRun| -> Result<RunOutcome, SweepError> {
            let outcome = execute_run(run, &hierarchy)?;
            progress(run.index, total, &outcome);
            Ok(outcome)
        };

        let outcomes = if self.parallel {
            plan.runs
                .par_iter()
                .map(execute)
                .collect::<Result<Vec<_>, SweepError>>()?
        } else {
            plan.runs
                .iter()
                .map(execute)
                .collect::<Result<Vec<_>, SweepError>>()?
        };

        info!(runs = outcomes.len(), "sweep done");
        Ok(outcomes)
    }
}

/// Execute one planned run with its derived RNG.
pub fn execute_run(run: &PlannedRun, hierarchy: &RngHierarchy) -> Result<RunOutcome, SweepError> {
    let mut rng = hierarchy.rng_for(&run.label, run.index as u64);
    let report = simulate(&run.request, &mut rng).map_err(|source| SweepError::Run {
        index: run.index,
        label: run.label.clone(),
        source,
    })?;
    debug!(
        index = run.index,
        label = %run.label,
        break_even = report.break_even,
        "run complete"
    );
    Ok(RunOutcome {
        run: run.clone(),
        report,
    })
}

/// Build the plan from `config` and run it with the config's parallelism.
pub fn run_sweep(config: &SimulationConfig) -> Result<Vec<RunOutcome>, SweepError> {
    let plan = SweepPlan::from_config(config);
    SweepRunner::new()
        .with_parallelism(config.sweep.parallel)
        .run(&plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(extra: &str) -> SimulationConfig {
        let toml_str = format!(
            r#"
[simulation]
hit_rate = 0.6
avg_win = 300.0
avg_loss = 500.0
num_trades = 20
num_simulations = 2
num_mc_shuffles = 3
{extra}
"#
        );
        SimulationConfig::from_toml(&toml_str).unwrap()
    }

    #[test]
    fn default_plan_is_twelve_runs_hit_rate_major() {
        let plan = SweepPlan::from_config(&config(""));
        assert_eq!(plan.len(), 12);
        let first_four: Vec<ModelKind> = plan.runs[..4].iter().map(|r| r.model).collect();
        assert_eq!(
            first_four,
            vec![ModelKind::Phased, ModelKind::Markov, ModelKind::Markov2, ModelKind::Regime]
        );
        assert!((plan.runs[0].hit_rate() - 0.5).abs() < 1e-12);
        assert!((plan.runs[4].hit_rate() - 0.55).abs() < 1e-12);
        assert!((plan.runs[11].hit_rate() - 0.6).abs() < 1e-12);
        for (i, run) in plan.runs.iter().enumerate() {
            assert_eq!(run.index, i);
        }
    }

    #[test]
    fn shifted_hit_rates_are_clamped() {
        let plan = SweepPlan::from_config(&config(
            "[sweep]\nhit_rate_offsets = [-0.9, 0.7]\nmodels = [\"independent\"]\n",
        ));
        assert_eq!(plan.runs[0].hit_rate(), 0.0);
        assert_eq!(plan.runs[1].hit_rate(), 1.0);
    }

    #[test]
    fn labels_are_unique() {
        let plan = SweepPlan::from_config(&config(""));
        let mut labels: Vec<&str> = plan.runs.iter().map(|r| r.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), plan.len());
    }

    #[test]
    fn outcomes_follow_plan_order() {
        let outcomes = run_sweep(&config("")).unwrap();
        assert_eq!(outcomes.len(), 12);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.run.index, i);
            assert_eq!(outcome.report.stats.len(), 20);
        }
    }

    #[test]
    fn progress_reports_every_run() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let plan = SweepPlan::from_config(&config(""));
        let seen = AtomicUsize::new(0);
        SweepRunner::new()
            .run_with_progress(&plan, |_, total, _| {
                assert_eq!(total, 12);
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 12);
    }
}
