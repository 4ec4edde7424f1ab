//! Per-policy statistics and ranking.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::equity::SimulationSample;
use crate::monte_carlo::SampleBook;
use crate::policy::PolicyId;

/// Summary of every sample one policy produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStat {
    pub policy: PolicyId,
    pub description: String,
    pub avg_profit: f64,
    pub avg_drawdown: f64,
    /// `avg_profit / |avg_drawdown|`, +inf when the average drawdown is 0.
    pub ratio: f64,
    pub min_profit: f64,
    pub max_profit: f64,
    /// Deepest sample drawdown.
    pub min_drawdown: f64,
    /// Mildest sample drawdown (closest to 0).
    pub max_drawdown: f64,
    pub avg_profit_per_trade: f64,
    /// `avg_profit / |max_drawdown|`, +inf when `max_drawdown` is 0.
    pub profit_to_max_drawdown: f64,
}

impl AggregateStat {
    /// Summarise `samples`; `None` when there are none.
    pub fn from_samples(
        policy: PolicyId,
        samples: &[SimulationSample],
        num_trades: usize,
    ) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mut profit_sum = 0.0;
        let mut drawdown_sum = 0.0;
        let mut min_profit = f64::INFINITY;
        let mut max_profit = f64::NEG_INFINITY;
        let mut min_drawdown = f64::INFINITY;
        let mut max_drawdown = f64::NEG_INFINITY;

        for s in samples {
            profit_sum += s.total_profit;
            drawdown_sum += s.max_drawdown;
            min_profit = min_profit.min(s.total_profit);
            max_profit = max_profit.max(s.total_profit);
            min_drawdown = min_drawdown.min(s.max_drawdown);
            max_drawdown = max_drawdown.max(s.max_drawdown);
        }

        let avg_profit = profit_sum / n;
        let avg_drawdown = drawdown_sum / n;

        Some(Self {
            policy,
            description: policy.description().to_string(),
            avg_profit,
            avg_drawdown,
            ratio: ratio_to(avg_profit, avg_drawdown),
            min_profit,
            max_profit,
            min_drawdown,
            max_drawdown,
            avg_profit_per_trade: avg_profit / num_trades as f64,
            profit_to_max_drawdown: ratio_to(avg_profit, max_drawdown),
        })
    }
}

fn ratio_to(profit: f64, drawdown: f64) -> f64 {
    if drawdown == 0.0 {
        f64::INFINITY
    } else {
        profit / drawdown.abs()
    }
}

/// One stat per policy that has samples, in id order.
pub fn summarize(book: &SampleBook, num_trades: usize) -> Vec<AggregateStat> {
    book.iter()
        .filter_map(|(policy, samples)| AggregateStat::from_samples(policy, samples, num_trades))
        .collect()
}

/// Non-negative `profit_to_max_drawdown` first, then negative; each partition
/// descending, so the negative block runs from least to most negative.
/// Ties keep their input order.
pub fn rank(stats: Vec<AggregateStat>) -> Vec<AggregateStat> {
    let (mut ranked, mut negative): (Vec<_>, Vec<_>) = stats
        .into_iter()
        .partition(|s| s.profit_to_max_drawdown >= 0.0);
    ranked.sort_by(descending);
    negative.sort_by(descending);
    ranked.append(&mut negative);
    ranked
}

fn descending(a: &AggregateStat, b: &AggregateStat) -> Ordering {
    b.profit_to_max_drawdown
        .partial_cmp(&a.profit_to_max_drawdown)
        .unwrap_or(Ordering::Equal)
}
