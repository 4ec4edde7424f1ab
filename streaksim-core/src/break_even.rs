//! Break-even hit rate.

use crate::domain::{Regime, SequenceModel};
use crate::error::{check_payoff, SimError};

/// Hit rate at which a unit-size strategy breaks even:
/// `avg_loss / (avg_win + avg_loss)`.
pub fn break_even_hit_rate(avg_win: f64, avg_loss: f64) -> Result<f64, SimError> {
    check_payoff("avg_win", avg_win)?;
    check_payoff("avg_loss", avg_loss)?;
    Ok(avg_loss / (avg_win + avg_loss))
}

/// Break-even rate nudged by the model's persistence parameters.
///
/// Markov models scale by how far the win-after-win probability sits from a
/// coin flip; regime switching scales by the mean regime hit rate. The
/// independent and phased models are unadjusted.
pub fn adjusted_break_even(
    avg_win: f64,
    avg_loss: f64,
    model: &SequenceModel,
) -> Result<f64, SimError> {
    let base = break_even_hit_rate(avg_win, avg_loss)?;
    let factor = match model {
        SequenceModel::Independent | SequenceModel::Phased => 1.0,
        SequenceModel::Markov {
            p_win_after_win, ..
        } => 1.0 + (p_win_after_win - 0.5) / 5.0,
        SequenceModel::Markov2 { p_win_ww, .. } => 1.0 + (p_win_ww - 0.5) / 4.0,
        SequenceModel::RegimeSwitch { .. } => {
            // Hit rates of the default schedule do not depend on its length.
            let schedule = model.regimes_for(0).unwrap_or_default();
            1.0 + (mean_hit_rate(&schedule) - 0.5) / 3.0
        }
    };
    Ok(base * factor)
}

fn mean_hit_rate(regimes: &[Regime]) -> f64 {
    if regimes.is_empty() {
        return 0.5;
    }
    regimes.iter().map(|r| r.hit_rate).sum::<f64>() / regimes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn asymmetric_payoff() {
        assert!(close(break_even_hit_rate(300.0, 500.0).unwrap(), 0.625));
    }

    #[test]
    fn symmetric_payoff_is_one_half() {
        assert!(close(break_even_hit_rate(100.0, 100.0).unwrap(), 0.5));
    }

    #[test]
    fn invalid_payoffs_are_errors() {
        assert!(break_even_hit_rate(0.0, 100.0).is_err());
        assert!(break_even_hit_rate(100.0, -1.0).is_err());
    }

    #[test]
    fn phased_is_unadjusted() {
        let v = adjusted_break_even(300.0, 500.0, &SequenceModel::Phased).unwrap();
        assert!(close(v, 0.625));
    }

    #[test]
    fn markov_adjustments() {
        let m1 = adjusted_break_even(100.0, 100.0, &SequenceModel::markov_default()).unwrap();
        assert!(close(m1, 0.5 * 1.04));
        let m2 = adjusted_break_even(100.0, 100.0, &SequenceModel::markov2_default()).unwrap();
        assert!(close(m2, 0.5 * 1.075));
    }

    #[test]
    fn regime_adjustment_uses_mean_hit_rate() {
        // default schedule mean = (0.9 + 0.5 + 0.2) / 3
        let default = adjusted_break_even(100.0, 100.0, &SequenceModel::regime_default()).unwrap();
        let mean = 1.6 / 3.0;
        assert!(close(default, 0.5 * (1.0 + (mean - 0.5) / 3.0)));

        let custom = SequenceModel::RegimeSwitch {
            regimes: Some(vec![Regime::new(5, 0.8, 1.0, 1.0)]),
            fill: Default::default(),
        };
        let v = adjusted_break_even(100.0, 100.0, &custom).unwrap();
        assert!(close(v, 0.5 * 1.1));
    }
}
