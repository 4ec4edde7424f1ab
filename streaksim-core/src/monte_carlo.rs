//! Monte Carlo aggregation.
//!
//! Outer loop: one base sequence per simulation. Inner loop: shuffle that
//! sequence in place and evaluate all 20 policies against the same
//! permutation, each from a fresh state. Shuffling always happens, so any
//! serial structure the generator built into the base sequence is destroyed
//! before evaluation; only the outcome multiset carries through.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::break_even::adjusted_break_even;
use crate::domain::{GenerationParams, SequenceModel};
use crate::equity::SimulationSample;
use crate::error::{check_count, SimError};
use crate::generator::generate_validated;
use crate::policy::{evaluate_policy_into, PolicyId};
use crate::ranking::{rank, summarize, AggregateStat};

/// Everything one Monte Carlo run needs besides the RNG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub params: GenerationParams,
    pub model: SequenceModel,
    pub num_simulations: usize,
    pub num_mc_shuffles: usize,
}

impl SimulationRequest {
    pub fn new(
        params: GenerationParams,
        model: SequenceModel,
        num_simulations: usize,
        num_mc_shuffles: usize,
    ) -> Self {
        Self {
            params,
            model,
            num_simulations,
            num_mc_shuffles,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.params.validate()?;
        self.model.validate()?;
        check_count("num_simulations", self.num_simulations)?;
        check_count("num_mc_shuffles", self.num_mc_shuffles)?;
        Ok(())
    }

    /// Samples each policy ends up with.
    pub fn samples_per_policy(&self) -> usize {
        self.num_simulations * self.num_mc_shuffles
    }
}

/// Samples grouped by policy, indexed by [`PolicyId::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBook {
    samples: Vec<Vec<SimulationSample>>,
}

impl SampleBook {
    pub fn with_capacity(per_policy: usize) -> Self {
        Self {
            samples: (0..PolicyId::COUNT)
                .map(|_| Vec::with_capacity(per_policy))
                .collect(),
        }
    }

    pub fn record(&mut self, policy: PolicyId, sample: SimulationSample) {
        self.samples[policy.index()].push(sample);
    }

    pub fn get(&self, policy: PolicyId) -> &[SimulationSample] {
        &self.samples[policy.index()]
    }

    /// `(policy, samples)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PolicyId, &[SimulationSample])> + '_ {
        PolicyId::ALL
            .iter()
            .zip(&self.samples)
            .map(|(p, s)| (*p, s.as_slice()))
    }
}

/// Ranked output of one run plus the break-even rate for its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub break_even: f64,
    pub stats: Vec<AggregateStat>,
}

impl SimulationReport {
    /// Entry for the constant-size baseline.
    pub fn baseline(&self) -> Option<&AggregateStat> {
        self.stats.iter().find(|s| s.policy == PolicyId::Constant)
    }
}

/// Run the nested simulation/shuffle loops and collect every sample.
pub fn run_monte_carlo<R: Rng + ?Sized>(
    request: &SimulationRequest,
    rng: &mut R,
) -> Result<SampleBook, SimError> {
    request.validate()?;

    debug!(
        model = request.model.label(),
        hit_rate = request.params.hit_rate,
        num_trades = request.params.num_trades,
        num_simulations = request.num_simulations,
        num_mc_shuffles = request.num_mc_shuffles,
        "monte carlo start"
    );

    let mut book = SampleBook::with_capacity(request.samples_per_policy());
    let mut contributions = Vec::with_capacity(request.params.num_trades);

    for _ in 0..request.num_simulations {
        let mut sequence = generate_validated(&request.params, &request.model, rng);
        for _ in 0..request.num_mc_shuffles {
            sequence.shuffle(rng);
            for policy in PolicyId::ALL {
                let sample = evaluate_policy_into(&sequence, policy, &mut contributions);
                book.record(policy, sample);
            }
        }
    }

    debug!(
        samples_per_policy = request.samples_per_policy(),
        "monte carlo done"
    );
    Ok(book)
}

/// Validate, run, summarise and rank.
pub fn simulate<R: Rng + ?Sized>(
    request: &SimulationRequest,
    rng: &mut R,
) -> Result<SimulationReport, SimError> {
    let book = run_monte_carlo(request, rng)?;
    let stats = rank(summarize(&book, request.params.num_trades));
    let break_even = adjusted_break_even(
        request.params.avg_win,
        request.params.avg_loss,
        &request.model,
    )?;
    Ok(SimulationReport { break_even, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(num_trades: usize) -> SimulationRequest {
        SimulationRequest::new(
            GenerationParams::new(0.6, 150.0, 100.0, num_trades),
            SequenceModel::Independent,
            3,
            4,
        )
    }

    #[test]
    fn every_policy_gets_all_samples() {
        let mut rng = StdRng::seed_from_u64(1);
        let book = run_monte_carlo(&request(30), &mut rng).unwrap();
        for (_, samples) in book.iter() {
            assert_eq!(samples.len(), 12);
        }
    }

    #[test]
    fn zero_counts_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut req = request(10);
        req.num_mc_shuffles = 0;
        assert!(matches!(
            run_monte_carlo(&req, &mut rng),
            Err(SimError::InvalidParameter {
                name: "num_mc_shuffles",
                ..
            })
        ));
    }

    #[test]
    fn invalid_params_fail_before_generation() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut req = request(10);
        req.params.avg_win = 0.0;
        assert!(simulate(&req, &mut rng).is_err());
    }

    #[test]
    fn report_carries_break_even_and_baseline() {
        let mut rng = StdRng::seed_from_u64(9);
        let report = simulate(&request(20), &mut rng).unwrap();
        assert_eq!(report.stats.len(), PolicyId::COUNT);
        assert!((report.break_even - 0.4).abs() < 1e-12);
        assert!(report.baseline().is_some());
    }
}
