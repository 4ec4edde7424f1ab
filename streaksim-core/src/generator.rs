//! Trade sequence generators.
//!
//! Each model produces one base sequence of `num_trades` outcomes (regime
//! schedules may produce fewer, see [`RegimeFill`]). Randomness always comes
//! from the caller's RNG so a fixed seed reproduces the sequence exactly.

use rand::Rng;

use crate::domain::{GenerationParams, Regime, RegimeFill, SequenceModel, TradeSequence};
use crate::error::SimError;

/// Generate one base sequence under `model`.
pub fn generate<R: Rng + ?Sized>(
    params: &GenerationParams,
    model: &SequenceModel,
    rng: &mut R,
) -> Result<TradeSequence, SimError> {
    params.validate()?;
    model.validate()?;
    Ok(generate_validated(params, model, rng))
}

/// Generation without re-validating; the Monte Carlo loop validates once up front.
pub(crate) fn generate_validated<R: Rng + ?Sized>(
    params: &GenerationParams,
    model: &SequenceModel,
    rng: &mut R,
) -> TradeSequence {
    match model {
        SequenceModel::Independent => independent(params, rng),
        SequenceModel::Phased => phased(params, rng),
        SequenceModel::Markov {
            p_win_after_win,
            p_win_after_loss,
        } => markov(params, *p_win_after_win, *p_win_after_loss, rng),
        SequenceModel::Markov2 {
            p_win_ww,
            p_win_wl,
            p_win_lw,
            p_win_ll,
        } => markov2(params, [*p_win_ww, *p_win_wl, *p_win_lw, *p_win_ll], rng),
        SequenceModel::RegimeSwitch { regimes, fill } => {
            let schedule = regimes
                .clone()
                .unwrap_or_else(|| Regime::default_schedule(params.num_trades));
            regime_switch(params, &schedule, *fill, rng)
        }
    }
}

/// Phase lengths of the phased model: floor(0.2n) hot, floor(0.2n) cold and
/// n - floor(0.4n) at base. Float truncation can leave the parts one short of
/// `num_trades`; the generator backfills the gap at base parameters.
pub fn phase_lengths(num_trades: usize) -> [usize; 3] {
    let n = num_trades as f64;
    [
        (n * 0.2) as usize,
        (n * 0.2) as usize,
        num_trades - (n * 0.4) as usize,
    ]
}

fn draw<R: Rng + ?Sized>(hit_rate: f64, avg_win: f64, avg_loss: f64, rng: &mut R) -> f64 {
    if rng.gen_bool(hit_rate) {
        avg_win
    } else {
        -avg_loss
    }
}

fn draw_block<R: Rng + ?Sized>(
    seq: &mut TradeSequence,
    len: usize,
    block: &Regime,
    rng: &mut R,
) {
    for _ in 0..len {
        seq.push(draw(block.hit_rate, block.avg_win, block.avg_loss, rng));
    }
}

fn independent<R: Rng + ?Sized>(params: &GenerationParams, rng: &mut R) -> TradeSequence {
    let mut seq = TradeSequence::with_capacity(params.num_trades);
    draw_block(&mut seq, params.num_trades, &base_block(params), rng);
    seq
}

fn base_block(params: &GenerationParams) -> Regime {
    Regime::new(
        params.num_trades,
        params.hit_rate,
        params.avg_win,
        params.avg_loss,
    )
}

/// Concatenate `blocks`, capping each at the trades still missing.
/// Returns how many trades are still missing afterwards.
fn concat_blocks<R: Rng + ?Sized>(
    seq: &mut TradeSequence,
    num_trades: usize,
    blocks: &[Regime],
    rng: &mut R,
) -> usize {
    let mut left = num_trades;
    for block in blocks {
        let len = block.length.min(left);
        if len == 0 {
            continue;
        }
        draw_block(seq, len, block, rng);
        left -= len;
        if left == 0 {
            break;
        }
    }
    left
}

fn phased<R: Rng + ?Sized>(params: &GenerationParams, rng: &mut R) -> TradeSequence {
    let [hot, cold, rest] = phase_lengths(params.num_trades);
    let phases = [
        Regime::new(
            hot,
            (params.hit_rate + 0.2).min(1.0),
            params.avg_win * 1.1,
            params.avg_loss * 0.9,
        ),
        Regime::new(
            cold,
            (params.hit_rate - 0.3).max(0.05),
            params.avg_win * 0.9,
            params.avg_loss * 1.1,
        ),
        Regime::new(rest, params.hit_rate, params.avg_win, params.avg_loss),
    ];

    let mut seq = TradeSequence::with_capacity(params.num_trades);
    let left = concat_blocks(&mut seq, params.num_trades, &phases, rng);
    // Truncation can leave a trade or two uncovered (e.g. n = 8 → 1 + 1 + 5).
    draw_block(&mut seq, left, &base_block(params), rng);
    seq
}

fn markov<R: Rng + ?Sized>(
    params: &GenerationParams,
    p_win_after_win: f64,
    p_win_after_loss: f64,
    rng: &mut R,
) -> TradeSequence {
    let mut seq = TradeSequence::with_capacity(params.num_trades);
    let mut last_win = rng.gen_bool(params.hit_rate);
    seq.push(payoff(params, last_win));
    for _ in 1..params.num_trades {
        let p = if last_win {
            p_win_after_win
        } else {
            p_win_after_loss
        };
        last_win = rng.gen_bool(p);
        seq.push(payoff(params, last_win));
    }
    seq
}

/// `probs` is ordered `[ww, wl, lw, ll]`, keyed by (two back, one back).
fn markov2<R: Rng + ?Sized>(
    params: &GenerationParams,
    probs: [f64; 4],
    rng: &mut R,
) -> TradeSequence {
    let n = params.num_trades;
    let mut seq = TradeSequence::with_capacity(n);

    let seed_len = n.min(2);
    let mut history = [false; 2];
    for slot in history.iter_mut().take(seed_len) {
        *slot = rng.gen_bool(params.hit_rate);
    }
    for &win in history.iter().take(seed_len) {
        seq.push(payoff(params, win));
    }

    for _ in 2..n {
        let p = match (history[0], history[1]) {
            (true, true) => probs[0],
            (true, false) => probs[1],
            (false, true) => probs[2],
            (false, false) => probs[3],
        };
        let win = rng.gen_bool(p);
        seq.push(payoff(params, win));
        history = [history[1], win];
    }
    seq
}

fn regime_switch<R: Rng + ?Sized>(
    params: &GenerationParams,
    regimes: &[Regime],
    fill: RegimeFill,
    rng: &mut R,
) -> TradeSequence {
    let mut seq = TradeSequence::with_capacity(params.num_trades);
    let left = concat_blocks(&mut seq, params.num_trades, regimes, rng);
    if fill == RegimeFill::Backfill {
        draw_block(&mut seq, left, &base_block(params), rng);
    }
    seq
}

fn payoff(params: &GenerationParams, win: bool) -> f64 {
    if win {
        params.avg_win
    } else {
        -params.avg_loss
    }
}
