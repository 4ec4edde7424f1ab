//! Policy evaluation over one sequence.

use crate::domain::TradeSequence;
use crate::equity::{evaluate_equity, SimulationSample};

use super::{PolicyId, StrategyState};

/// Evaluate `policy` over `sequence` with a fresh state.
pub fn evaluate_policy(sequence: &TradeSequence, policy: PolicyId) -> SimulationSample {
    let mut contributions = Vec::with_capacity(sequence.len());
    evaluate_policy_into(sequence, policy, &mut contributions)
}

/// Same as [`evaluate_policy`] but reuses `contributions` as the per-trade
/// output buffer. The buffer is cleared first and holds the signed
/// contribution of every trade on return.
pub fn evaluate_policy_into(
    sequence: &TradeSequence,
    policy: PolicyId,
    contributions: &mut Vec<f64>,
) -> SimulationSample {
    contributions.clear();
    let rule = policy.rule();
    let mut state = StrategyState::fresh();

    for &outcome in sequence {
        contributions.push(state.contribution(outcome));
        state.observe(outcome);
        rule.apply(outcome, &mut state);
    }

    evaluate_equity(contributions).into()
}
