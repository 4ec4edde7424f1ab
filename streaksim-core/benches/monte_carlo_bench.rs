//! Criterion benchmarks for StreakSim hot paths.
//!
//! Benchmarks:
//! 1. Sequence generation per model
//! 2. Single policy evaluation over one sequence
//! 3. Full Monte Carlo run (all 20 policies, nested shuffles)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use streaksim_core::policy::evaluate_policy_into;
use streaksim_core::{
    generate, run_monte_carlo, GenerationParams, PolicyId, SequenceModel, SimulationRequest,
};

fn params(num_trades: usize) -> GenerationParams {
    GenerationParams::new(0.6, 300.0, 400.0, num_trades)
}

// ── 1. Generation ────────────────────────────────────────────────────

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let models = [
        SequenceModel::Independent,
        SequenceModel::Phased,
        SequenceModel::markov_default(),
        SequenceModel::markov2_default(),
        SequenceModel::regime_default(),
    ];
    for model in &models {
        group.bench_with_input(BenchmarkId::new(model.label(), 400), model, |b, model| {
            let mut rng = StdRng::seed_from_u64(42);
            let p = params(400);
            b.iter(|| black_box(generate(&p, model, &mut rng).unwrap()));
        });
    }
    group.finish();
}

// ── 2. Policy evaluation ─────────────────────────────────────────────

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_policy");
    let mut rng = StdRng::seed_from_u64(7);
    let seq = generate(&params(400), &SequenceModel::Independent, &mut rng).unwrap();
    let mut buf = Vec::with_capacity(400);

    group.bench_function("all_20_policies_400_trades", |b| {
        b.iter(|| {
            for policy in PolicyId::ALL {
                black_box(evaluate_policy_into(&seq, policy, &mut buf));
            }
        });
    });
    group.finish();
}

// ── 3. Monte Carlo ───────────────────────────────────────────────────

fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(10);
    for shuffles in [10usize, 50] {
        let req = SimulationRequest::new(params(400), SequenceModel::Phased, 10, shuffles);
        group.bench_with_input(BenchmarkId::new("phased_10_sims", shuffles), &req, |b, req| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(run_monte_carlo(req, &mut rng).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generation, bench_policies, bench_monte_carlo);
criterion_main!(benches);
