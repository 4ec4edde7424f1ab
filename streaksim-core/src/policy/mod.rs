//! Position-sizing policies: 20 finite-state rules over win/loss streaks.
//!
//! Each [`PolicyId`] maps to a [`SizingRule`] through a fixed table. The
//! evaluator drives a fresh [`StrategyState`] through a sequence one trade at
//! a time: charge the trade at the current size, update the streaks, then let
//! the rule choose the size for the next trade.

pub mod evaluate;
pub mod rule;
pub mod state;

pub use evaluate::{evaluate_policy, evaluate_policy_into};
pub use rule::SizingRule;
pub use state::{Mode, StrategyState};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SimError;

/// Closed set of sizing policies, numbered 1..=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PolicyId {
    Constant = 1,
    DoubleAfterWin = 2,
    DoubleAfterWinCap2 = 3,
    DoubleAfterWinCap3 = 4,
    DoubleAfterWinCap4 = 5,
    DoubleAfterLoss = 6,
    DoubleAfterTwoLosses = 7,
    DoubleAfterThreeLosses = 8,
    PauseAfterOneWin = 9,
    PauseAfterTwoWins = 10,
    PauseAfterThreeWins = 11,
    PauseAfterFourWins = 12,
    StreakToggle = 13,
    DoubleAfterMixedPair = 14,
    PauseAfterTwoWinsThenDouble = 15,
    DoubleOnLossesPauseOnWin = 16,
    DoubleAfterLossThenWin = 17,
    TripleAfterThreeWins = 18,
    StreakTiers = 19,
    WinResetLossTier = 20,
}

impl PolicyId {
    pub const COUNT: usize = 20;

    /// All policies in id order.
    pub const ALL: [PolicyId; Self::COUNT] = [
        Self::Constant,
        Self::DoubleAfterWin,
        Self::DoubleAfterWinCap2,
        Self::DoubleAfterWinCap3,
        Self::DoubleAfterWinCap4,
        Self::DoubleAfterLoss,
        Self::DoubleAfterTwoLosses,
        Self::DoubleAfterThreeLosses,
        Self::PauseAfterOneWin,
        Self::PauseAfterTwoWins,
        Self::PauseAfterThreeWins,
        Self::PauseAfterFourWins,
        Self::StreakToggle,
        Self::DoubleAfterMixedPair,
        Self::PauseAfterTwoWinsThenDouble,
        Self::DoubleOnLossesPauseOnWin,
        Self::DoubleAfterLossThenWin,
        Self::TripleAfterThreeWins,
        Self::StreakTiers,
        Self::WinResetLossTier,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Zero-based position in [`PolicyId::ALL`].
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn from_id(id: u8) -> Result<Self, SimError> {
        match id {
            1..=20 => Ok(Self::ALL[id as usize - 1]),
            _ => Err(SimError::UnknownPolicy(id)),
        }
    }

    /// The rule this policy runs.
    pub fn rule(self) -> SizingRule {
        match self {
            Self::Constant => SizingRule::Constant,
            Self::DoubleAfterWin => SizingRule::DoubleAfterWin,
            Self::DoubleAfterWinCap2 => SizingRule::WinCapped { limit: 2 },
            Self::DoubleAfterWinCap3 => SizingRule::WinCapped { limit: 3 },
            Self::DoubleAfterWinCap4 => SizingRule::WinCapped { limit: 4 },
            Self::DoubleAfterLoss => SizingRule::DoubleAfterLoss,
            Self::DoubleAfterTwoLosses => SizingRule::LossStreak { threshold: 2 },
            Self::DoubleAfterThreeLosses => SizingRule::LossStreak { threshold: 3 },
            Self::PauseAfterOneWin => SizingRule::PauseAfterWins { threshold: 1 },
            Self::PauseAfterTwoWins => SizingRule::PauseAfterWins { threshold: 2 },
            Self::PauseAfterThreeWins => SizingRule::PauseAfterWins { threshold: 3 },
            Self::PauseAfterFourWins => SizingRule::PauseAfterWins { threshold: 4 },
            Self::StreakToggle => SizingRule::StreakToggle,
            Self::DoubleAfterMixedPair | Self::DoubleAfterLossThenWin => SizingRule::WinAfterLoss,
            Self::PauseAfterTwoWinsThenDouble => SizingRule::PauseThenDouble { threshold: 2 },
            Self::DoubleOnLossesPauseOnWin => SizingRule::DoubleOnLossesPauseOnWin,
            Self::TripleAfterThreeWins => SizingRule::TripleAfterWins { threshold: 3 },
            Self::StreakTiers => SizingRule::StreakTiers,
            Self::WinResetLossTier => SizingRule::LossTier,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Constant => "Constant position size 1",
            Self::DoubleAfterWin => "Increase to 2 after win, reset to 1 after loss",
            Self::DoubleAfterWinCap2 => "Increase to 2 after win, reset to 1 after loss or 2 wins",
            Self::DoubleAfterWinCap3 => "Increase to 2 after win, reset to 1 after loss or 3 wins",
            Self::DoubleAfterWinCap4 => "Increase to 2 after win, reset to 1 after loss or 4 wins",
            Self::DoubleAfterLoss => "Increase to 2 after loss, reset to 1 after win",
            Self::DoubleAfterTwoLosses => "Increase to 2 after 2 losses, reset to 1 after win",
            Self::DoubleAfterThreeLosses => "Increase to 2 after 3 losses, reset to 1 after win",
            Self::PauseAfterOneWin => "Pause after 1 win until next loss",
            Self::PauseAfterTwoWins => "Pause after 2 wins until next loss",
            Self::PauseAfterThreeWins => "Pause after 3 wins until next loss",
            Self::PauseAfterFourWins => "Pause after 4 wins until next loss",
            Self::StreakToggle => "Increase to 2 after 2 wins, reset to 1 after 2 losses",
            Self::DoubleAfterMixedPair => "Increase to 2 after 1 win and 1 loss, else 1",
            Self::PauseAfterTwoWinsThenDouble => {
                "Pause after 2 consecutive wins until 1 loss, then increase to 2"
            }
            Self::DoubleOnLossesPauseOnWin => {
                "Increase to 2 after 2 losses, pause after 1 win until next loss"
            }
            Self::DoubleAfterLossThenWin => {
                "Increase to 2 after 1 win only if preceded by 1 loss, else 1"
            }
            Self::TripleAfterThreeWins => "Increase to 3 after 3 wins, reset to 1 after 1 loss",
            Self::StreakTiers => "Increase to 2 after 2 wins, to 3 after 2 losses, else 1",
            Self::WinResetLossTier => {
                "Increase to 2 after 1 win, to 3 after 2 losses, reset to 1 after win"
            }
        }
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id(), self.description())
    }
}

impl TryFrom<u8> for PolicyId {
    type Error = SimError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_round_trip_through_table() {
        for (i, policy) in PolicyId::ALL.iter().enumerate() {
            assert_eq!(policy.index(), i);
            assert_eq!(PolicyId::from_id(policy.id()).unwrap(), *policy);
        }
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        assert_eq!(PolicyId::from_id(0), Err(SimError::UnknownPolicy(0)));
        assert_eq!(PolicyId::try_from(21), Err(SimError::UnknownPolicy(21)));
    }

    #[test]
    fn descriptions_are_unique() {
        let set: HashSet<&str> = PolicyId::ALL.iter().map(|p| p.description()).collect();
        assert_eq!(set.len(), PolicyId::COUNT);
    }

    #[test]
    fn families_share_rules_by_threshold() {
        assert_eq!(
            PolicyId::PauseAfterThreeWins.rule(),
            SizingRule::PauseAfterWins { threshold: 3 }
        );
        assert_eq!(
            PolicyId::DoubleAfterMixedPair.rule(),
            PolicyId::DoubleAfterLossThenWin.rule()
        );
    }
}
