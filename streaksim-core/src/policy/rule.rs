//! Sizing rules: the state transition behind each policy.
//!
//! A rule runs after the evaluator has charged the current trade and advanced
//! the streak counters. It decides the size (and mode) for the next trade.
//! Rule-local counter updates stack on top of that bookkeeping, so e.g. the
//! first win of a streak already reads `win_streak == 2` inside
//! [`SizingRule::WinCapped`]. Reference rankings depend on this ordering.

use serde::{Deserialize, Serialize};

use crate::domain::{is_win, TradeOutcome};

use super::state::{Mode, StrategyState};

/// Parameterised rule families. Several policy ids share a family and differ
/// only in their threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizingRule {
    /// Always size 1.
    Constant,
    /// 2 after a win, 1 after a loss.
    DoubleAfterWin,
    /// 2 after a win until the win counter reaches `limit`, 1 after a loss.
    WinCapped { limit: u32 },
    /// 2 after a loss, 1 after a win.
    DoubleAfterLoss,
    /// 2 once the loss counter reaches `threshold`, 1 after a win.
    LossStreak { threshold: u32 },
    /// Pause once the win counter reaches `threshold`; resume at 1 on a loss.
    PauseAfterWins { threshold: u32 },
    /// 2 once wins reach 2, back to 1 once losses reach 2, otherwise unchanged.
    StreakToggle,
    /// 2 after a win whose predecessor was a loss, else 1.
    WinAfterLoss,
    /// Like `PauseAfterWins`, but the pausing step sets size 2.
    PauseThenDouble { threshold: u32 },
    /// Pause after any win; while trading, 2 once losses reach 2.
    DoubleOnLossesPauseOnWin,
    /// 3 once wins reach `threshold`, 1 after a loss, otherwise unchanged.
    TripleAfterWins { threshold: u32 },
    /// 2 on a win streak of 2, 3 on a loss streak of 2, else 1.
    StreakTiers,
    /// 1 after a win, 3 on a loss streak of 2, else 1.
    LossTier,
}

impl SizingRule {
    /// Update `state` after observing `outcome`.
    pub fn apply(&self, outcome: TradeOutcome, state: &mut StrategyState) {
        let win = is_win(outcome);
        match *self {
            Self::Constant => state.position_size = 1,

            Self::DoubleAfterWin => state.position_size = if win { 2 } else { 1 },

            Self::WinCapped { limit } => {
                if win {
                    state.win_streak += 1;
                    state.position_size = if state.win_streak >= limit { 1 } else { 2 };
                } else {
                    state.position_size = 1;
                    state.win_streak = 0;
                }
            }

            Self::DoubleAfterLoss => state.position_size = if win { 1 } else { 2 },

            Self::LossStreak { threshold } => {
                if win {
                    state.position_size = 1;
                    state.loss_streak = 0;
                } else {
                    state.loss_streak += 1;
                    state.position_size = if state.loss_streak >= threshold { 2 } else { 1 };
                }
            }

            Self::PauseAfterWins { threshold } => match state.mode {
                Mode::Trading => {
                    if win {
                        state.win_streak += 1;
                        if state.win_streak >= threshold {
                            state.mode = Mode::Paused;
                        }
                    } else {
                        state.win_streak = 0;
                    }
                    state.position_size = 1;
                }
                Mode::Paused => resume_on_loss(win, state),
            },

            Self::StreakToggle => {
                if win {
                    state.win_streak += 1;
                    if state.win_streak >= 2 {
                        state.position_size = 2;
                    }
                } else {
                    state.loss_streak += 1;
                    if state.loss_streak >= 2 {
                        state.position_size = 1;
                    }
                }
            }

            Self::WinAfterLoss => {
                state.position_size = if win && !is_win(state.last2_result) {
                    2
                } else {
                    1
                };
            }

            Self::PauseThenDouble { threshold } => match state.mode {
                Mode::Trading => {
                    if win {
                        state.win_streak += 1;
                        if state.win_streak >= threshold {
                            state.mode = Mode::Paused;
                            state.position_size = 2;
                        } else {
                            state.position_size = 1;
                        }
                    } else {
                        state.win_streak = 0;
                        state.position_size = 1;
                    }
                }
                Mode::Paused => resume_on_loss(win, state),
            },

            Self::DoubleOnLossesPauseOnWin => match state.mode {
                Mode::Trading => {
                    if win {
                        state.mode = Mode::Paused;
                        state.position_size = 1;
                    } else {
                        state.loss_streak += 1;
                        state.position_size = if state.loss_streak >= 2 { 2 } else { 1 };
                    }
                }
                Mode::Paused => resume_on_loss(win, state),
            },

            Self::TripleAfterWins { threshold } => {
                if win {
                    state.win_streak += 1;
                    if state.win_streak >= threshold {
                        state.position_size = 3;
                    }
                } else {
                    state.position_size = 1;
                    state.win_streak = 0;
                }
            }

            Self::StreakTiers => {
                state.position_size = if state.win_streak >= 2 {
                    2
                } else if state.loss_streak >= 2 {
                    3
                } else {
                    1
                };
            }

            Self::LossTier => {
                state.position_size = if !win && state.loss_streak >= 2 { 3 } else { 1 };
            }
        }
    }
}

/// Paused: a loss resumes trading at size 1, a win keeps exposure at 0.
fn resume_on_loss(win: bool, state: &mut StrategyState) {
    if win {
        state.position_size = 0;
    } else {
        state.mode = Mode::Trading;
        state.win_streak = 0;
        state.position_size = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(rule: SizingRule, state: &mut StrategyState, outcome: f64) {
        state.observe(outcome);
        rule.apply(outcome, state);
    }

    #[test]
    fn win_capped_counts_bookkeeping_and_rule_increments() {
        // limit 3: the first win reads 2 (< 3) → size 2; the second reads 4 → size 1
        let rule = SizingRule::WinCapped { limit: 3 };
        let mut state = StrategyState::fresh();
        step(rule, &mut state, 1.0);
        assert_eq!((state.win_streak, state.position_size), (2, 2));
        step(rule, &mut state, 1.0);
        assert_eq!((state.win_streak, state.position_size), (4, 1));
        step(rule, &mut state, -1.0);
        assert_eq!((state.win_streak, state.position_size), (0, 1));
    }

    #[test]
    fn pause_after_wins_resumes_on_loss() {
        let rule = SizingRule::PauseAfterWins { threshold: 1 };
        let mut state = StrategyState::fresh();
        step(rule, &mut state, 1.0);
        assert_eq!(state.mode, Mode::Paused);
        assert_eq!(state.position_size, 1);
        step(rule, &mut state, 1.0);
        assert_eq!(state.position_size, 0);
        step(rule, &mut state, -1.0);
        assert_eq!(state.mode, Mode::Trading);
        assert_eq!(state.position_size, 1);
    }

    #[test]
    fn streak_toggle_keeps_size_when_no_threshold_hit() {
        let rule = SizingRule::StreakToggle;
        let mut state = StrategyState {
            position_size: 2,
            ..StrategyState::fresh()
        };
        // loss_streak after bookkeeping + rule = 2 → reset to 1
        step(rule, &mut state, -1.0);
        assert_eq!(state.position_size, 1);
        // a win: win_streak 1 + 1 = 2 → size 2
        step(rule, &mut state, 1.0);
        assert_eq!(state.position_size, 2);
    }

    #[test]
    fn loss_tier_never_doubles_after_win() {
        let rule = SizingRule::LossTier;
        let mut state = StrategyState::fresh();
        for outcome in [1.0, 1.0, 1.0] {
            step(rule, &mut state, outcome);
            assert_eq!(state.position_size, 1);
        }
        step(rule, &mut state, -1.0);
        assert_eq!(state.position_size, 1);
        step(rule, &mut state, -1.0);
        assert_eq!(state.position_size, 3);
    }

    #[test]
    fn pause_then_double_sets_masked_size() {
        let rule = SizingRule::PauseThenDouble { threshold: 2 };
        let mut state = StrategyState::fresh();
        step(rule, &mut state, 1.0);
        assert_eq!(state.mode, Mode::Paused);
        assert_eq!(state.position_size, 2);
        assert_eq!(state.contribution(50.0), 0.0);
    }
}
