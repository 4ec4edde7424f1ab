//! TradeSequence: an ordered run of signed trade outcomes.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Signed monetary result of one trade at unit size.
///
/// Positive values are wins, everything else (including zero) is a loss.
pub type TradeOutcome = f64;

/// Win classification shared by the generators and every sizing rule.
#[inline]
pub fn is_win(outcome: TradeOutcome) -> bool {
    outcome > 0.0
}

/// An ordered, fixed-length collection of trade outcomes.
///
/// The buffer is owned by one Monte Carlo iteration and shuffled in place
/// between policy evaluations; policies only ever see `&TradeSequence`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSequence {
    outcomes: Vec<TradeOutcome>,
}

impl TradeSequence {
    pub fn new(outcomes: Vec<TradeOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn as_slice(&self) -> &[TradeOutcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeOutcome> {
        self.outcomes.iter()
    }

    pub fn push(&mut self, outcome: TradeOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of winning trades.
    pub fn win_count(&self) -> usize {
        self.outcomes.iter().filter(|&&o| is_win(o)).count()
    }

    /// Sum of all outcomes at unit size.
    pub fn total(&self) -> f64 {
        self.outcomes.iter().sum()
    }

    /// Uniform in-place permutation (Fisher–Yates).
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.outcomes.shuffle(rng);
    }
}

impl From<Vec<TradeOutcome>> for TradeSequence {
    fn from(outcomes: Vec<TradeOutcome>) -> Self {
        Self::new(outcomes)
    }
}

impl<'a> IntoIterator for &'a TradeSequence {
    type Item = &'a TradeOutcome;
    type IntoIter = std::slice::Iter<'a, TradeOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_counts_as_loss() {
        assert!(is_win(0.01));
        assert!(!is_win(0.0));
        assert!(!is_win(-5.0));
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut seq = TradeSequence::new(vec![100.0, -50.0, 100.0, -50.0, 100.0]);
        let mut rng = StdRng::seed_from_u64(7);
        seq.shuffle(&mut rng);

        assert_eq!(seq.len(), 5);
        assert_eq!(seq.win_count(), 3);
        assert_eq!(seq.total(), 200.0);
    }

    #[test]
    fn shuffle_is_seed_deterministic() {
        let base: Vec<f64> = (0..50).map(|i| if i % 3 == 0 { 10.0 } else { -4.0 }).collect();
        let mut a = TradeSequence::new(base.clone());
        let mut b = TradeSequence::new(base);
        a.shuffle(&mut StdRng::seed_from_u64(99));
        b.shuffle(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
