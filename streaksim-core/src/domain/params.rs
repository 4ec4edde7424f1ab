//! Generation parameters and the stochastic sequence models.

use serde::{Deserialize, Serialize};

use crate::error::{check_count, check_payoff, check_probability, SimError};

/// Base statistical profile of a trading system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Probability that a trade is a win.
    pub hit_rate: f64,
    /// Win amount per unit position size.
    pub avg_win: f64,
    /// Loss magnitude per unit position size (positive).
    pub avg_loss: f64,
    /// Nominal sequence length.
    pub num_trades: usize,
}

impl GenerationParams {
    pub fn new(hit_rate: f64, avg_win: f64, avg_loss: f64, num_trades: usize) -> Self {
        Self {
            hit_rate,
            avg_win,
            avg_loss,
            num_trades,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        check_probability("hit_rate", self.hit_rate)?;
        check_payoff("avg_win", self.avg_win)?;
        check_payoff("avg_loss", self.avg_loss)?;
        check_count("num_trades", self.num_trades)
    }
}

/// A contiguous block of trades with its own hit rate and payoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub length: usize,
    pub hit_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
}

impl Regime {
    pub fn new(length: usize, hit_rate: f64, avg_win: f64, avg_loss: f64) -> Self {
        Self {
            length,
            hit_rate,
            avg_win,
            avg_loss,
        }
    }

    /// Boom / chop / bust schedule used when no regimes are configured:
    /// 30% at 0.9 (200/100), 20% at 0.5 (100/100), remainder at 0.2 (100/200).
    /// The lengths always sum to `num_trades`.
    pub fn default_schedule(num_trades: usize) -> Vec<Regime> {
        let n = num_trades as f64;
        let boom = (n * 0.3) as usize;
        let chop = (n * 0.2) as usize;
        vec![
            Regime::new(boom, 0.9, 200.0, 100.0),
            Regime::new(chop, 0.5, 100.0, 100.0),
            Regime::new(num_trades - boom - chop, 0.2, 100.0, 200.0),
        ]
    }

    fn validate(&self) -> Result<(), SimError> {
        // Zero-length regimes are legal and skipped by the generator.
        check_probability("regime.hit_rate", self.hit_rate)?;
        check_payoff("regime.avg_win", self.avg_win)?;
        check_payoff("regime.avg_loss", self.avg_loss)
    }
}

/// What to do when a regime schedule covers fewer trades than `num_trades`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeFill {
    /// Leave the sequence short.
    #[default]
    Truncate,
    /// Draw the missing trades under the base parameters.
    Backfill,
}

/// Stochastic model used to produce one base sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequenceModel {
    /// Independent Bernoulli draws at the base hit rate.
    Independent,
    /// Three contiguous phases (hot, cold, base) concatenated.
    Phased,
    /// Two-state chain over {Win, Loss}.
    Markov {
        p_win_after_win: f64,
        p_win_after_loss: f64,
    },
    /// Chain conditioned on the previous two outcomes.
    Markov2 {
        p_win_ww: f64,
        p_win_wl: f64,
        p_win_lw: f64,
        p_win_ll: f64,
    },
    /// Explicit regime schedule; `None` selects [`Regime::default_schedule`].
    RegimeSwitch {
        regimes: Option<Vec<Regime>>,
        #[serde(default)]
        fill: RegimeFill,
    },
}

impl SequenceModel {
    pub const DEFAULT_P_WIN_AFTER_WIN: f64 = 0.7;
    pub const DEFAULT_P_WIN_AFTER_LOSS: f64 = 0.5;

    pub fn markov_default() -> Self {
        Self::Markov {
            p_win_after_win: Self::DEFAULT_P_WIN_AFTER_WIN,
            p_win_after_loss: Self::DEFAULT_P_WIN_AFTER_LOSS,
        }
    }

    pub fn markov2_default() -> Self {
        Self::Markov2 {
            p_win_ww: 0.8,
            p_win_wl: 0.6,
            p_win_lw: 0.5,
            p_win_ll: 0.3,
        }
    }

    pub fn regime_default() -> Self {
        Self::RegimeSwitch {
            regimes: None,
            fill: RegimeFill::Truncate,
        }
    }

    /// Human-readable mode name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Independent => "Independent",
            Self::Phased => "No Markov",
            Self::Markov { .. } => "1st Order Markov",
            Self::Markov2 { .. } => "2nd Order Markov",
            Self::RegimeSwitch { .. } => "Regime Switching",
        }
    }

    /// The regimes actually used for a given sequence length.
    pub fn regimes_for(&self, num_trades: usize) -> Option<Vec<Regime>> {
        match self {
            Self::RegimeSwitch { regimes, .. } => Some(
                regimes
                    .clone()
                    .unwrap_or_else(|| Regime::default_schedule(num_trades)),
            ),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            Self::Independent | Self::Phased => Ok(()),
            Self::Markov {
                p_win_after_win,
                p_win_after_loss,
            } => {
                check_probability("p_win_after_win", *p_win_after_win)?;
                check_probability("p_win_after_loss", *p_win_after_loss)
            }
            Self::Markov2 {
                p_win_ww,
                p_win_wl,
                p_win_lw,
                p_win_ll,
            } => {
                check_probability("p_win_ww", *p_win_ww)?;
                check_probability("p_win_wl", *p_win_wl)?;
                check_probability("p_win_lw", *p_win_lw)?;
                check_probability("p_win_ll", *p_win_ll)
            }
            Self::RegimeSwitch { regimes, .. } => regimes
                .iter()
                .flatten()
                .try_for_each(Regime::validate),
        }
    }
}
