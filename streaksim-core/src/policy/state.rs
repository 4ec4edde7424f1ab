//! Per-evaluation sizing state.

use serde::{Deserialize, Serialize};

use crate::domain::{is_win, TradeOutcome};

/// Whether the policy currently has exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Trading,
    /// No exposure: trades taken in this mode contribute nothing.
    Paused,
}

/// Mutable record owned by exactly one (policy, sequence) evaluation.
///
/// The streak counters are advanced by the evaluator before each rule runs;
/// rules may advance or reset them again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyState {
    pub win_streak: u32,
    pub loss_streak: u32,
    pub mode: Mode,
    /// Most recent outcome (0 before the first trade).
    pub last_result: TradeOutcome,
    /// Outcome before `last_result` (0 until two trades were seen).
    pub last2_result: TradeOutcome,
    /// Size applied to the next trade; 0 means no exposure.
    pub position_size: u32,
}

impl StrategyState {
    pub fn fresh() -> Self {
        Self {
            win_streak: 0,
            loss_streak: 0,
            mode: Mode::Trading,
            last_result: 0.0,
            last2_result: 0.0,
            position_size: 1,
        }
    }

    pub fn is_trading(&self) -> bool {
        self.mode == Mode::Trading
    }

    /// Signed contribution of `outcome` under the current size and mode.
    pub fn contribution(&self, outcome: TradeOutcome) -> f64 {
        match self.mode {
            Mode::Trading => outcome * self.position_size as f64,
            Mode::Paused => 0.0,
        }
    }

    /// Streak and history bookkeeping that precedes every rule.
    pub fn observe(&mut self, outcome: TradeOutcome) {
        if is_win(outcome) {
            self.win_streak += 1;
            self.loss_streak = 0;
        } else {
            self.loss_streak += 1;
            self.win_streak = 0;
        }
        self.last2_result = self.last_result;
        self.last_result = outcome;
    }
}

impl Default for StrategyState {
    fn default() -> Self {
        Self::fresh()
    }
}
