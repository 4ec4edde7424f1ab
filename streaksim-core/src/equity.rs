//! Equity and drawdown accounting: pure functions over signed per-trade
//! contributions.
//!
//! The curve has no implicit zero starting point: the running peak starts at
//! the first equity value, so a sequence that opens with a loss shows no
//! drawdown until equity falls below that first value.

use serde::{Deserialize, Serialize};

/// Result of accounting one contribution series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EquityOutcome {
    pub total_profit: f64,
    /// Worst `equity - running_peak`; always `<= 0`.
    pub max_drawdown: f64,
}

/// One (sequence permutation, policy) observation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationSample {
    pub total_profit: f64,
    pub max_drawdown: f64,
}

impl From<EquityOutcome> for SimulationSample {
    fn from(outcome: EquityOutcome) -> Self {
        Self {
            total_profit: outcome.total_profit,
            max_drawdown: outcome.max_drawdown,
        }
    }
}

/// Single pass: running sum, running peak, worst drawdown.
pub fn evaluate_equity(contributions: &[f64]) -> EquityOutcome {
    let mut equity = 0.0;
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;

    for &c in contributions {
        equity += c;
        peak = peak.max(equity);
        max_drawdown = max_drawdown.min(equity - peak);
    }

    EquityOutcome {
        total_profit: equity,
        max_drawdown,
    }
}

/// Cumulative equity after each trade.
pub fn equity_curve(contributions: &[f64]) -> Vec<f64> {
    contributions
        .iter()
        .scan(0.0, |equity, &c| {
            *equity += c;
            Some(*equity)
        })
        .collect()
}

/// `equity[i] - max(equity[..=i])` for each trade.
pub fn drawdown_series(contributions: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve(contributions)
        .into_iter()
        .map(|equity| {
            peak = peak.max(equity);
            equity - peak
        })
        .collect()
}
