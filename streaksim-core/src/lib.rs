//! StreakSim Core: trade-sequence generators, position-sizing policies,
//! equity accounting and Monte Carlo ranking.
//!
//! This crate contains the simulation engine:
//! - Sequence models (independent, phased, 1st/2nd-order Markov, regime switching)
//! - Twenty finite-state sizing policies driven by win/loss streaks
//! - Equity curve and maximum drawdown accounting
//! - Monte Carlo aggregation over shuffled sequences, summary stats and ranking
//! - Deterministic seeding via a BLAKE3-derived RNG hierarchy
//!
//! All randomness is injected by the caller; the same seed reproduces the same
//! report.

pub mod break_even;
pub mod domain;
pub mod equity;
pub mod error;
pub mod generator;
pub mod monte_carlo;
pub mod policy;
pub mod ranking;
pub mod rng;

pub use break_even::{adjusted_break_even, break_even_hit_rate};
pub use domain::{
    GenerationParams, Regime, RegimeFill, SequenceModel, TradeOutcome, TradeSequence,
};
pub use equity::{evaluate_equity, EquityOutcome, SimulationSample};
pub use error::SimError;
pub use generator::generate;
pub use monte_carlo::{run_monte_carlo, simulate, SampleBook, SimulationReport, SimulationRequest};
pub use policy::{evaluate_policy, PolicyId, SizingRule, StrategyState};
pub use ranking::{rank, summarize, AggregateStat};
pub use rng::RngHierarchy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the runner moves across rayon workers
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<GenerationParams>();
        require_sync::<GenerationParams>();
        require_send::<SequenceModel>();
        require_sync::<SequenceModel>();
        require_send::<TradeSequence>();
        require_sync::<TradeSequence>();

        // Policy types
        require_send::<PolicyId>();
        require_sync::<PolicyId>();
        require_send::<StrategyState>();
        require_sync::<StrategyState>();

        // Results
        require_send::<SampleBook>();
        require_sync::<SampleBook>();
        require_send::<AggregateStat>();
        require_sync::<AggregateStat>();
        require_send::<SimulationReport>();
        require_sync::<SimulationReport>();
        require_send::<SimError>();
        require_sync::<SimError>();

        // RNG
        require_send::<RngHierarchy>();
        require_sync::<RngHierarchy>();
    }

    /// Architecture contract: policies read the sequence, never mutate it.
    ///
    /// `evaluate_policy` takes `&TradeSequence`, so a policy cannot disturb
    /// the permutation the other 19 policies are about to read.
    #[test]
    fn policy_evaluation_borrows_sequence_immutably() {
        fn _check(seq: &TradeSequence) -> SimulationSample {
            evaluate_policy(seq, PolicyId::Constant)
        }
    }
}
