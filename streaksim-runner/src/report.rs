//! Plain-text run reports.

use streaksim_core::{AggregateStat, PolicyId, SequenceModel, SimulationReport, SimulationRequest};

use crate::sweep::RunOutcome;

const RULE_WIDTH: usize = 90;

/// How many leaders the comparison block shows by default.
pub const DEFAULT_TOP_N: usize = 4;

/// Settings block, ranked table and top-N comparison against the baseline.
pub fn render_run(request: &SimulationRequest, report: &SimulationReport, top_n: usize) -> String {
    let mut out = render_settings(request, report.break_even);
    out.push_str("\nResults (Monte Carlo, based on input parameters):\n\n");
    out.push_str(&render_table(request, &report.stats));
    out.push_str(&render_comparison(&report.stats, top_n));
    out
}

/// [`render_run`] for a sweep outcome, prefixed with its position in the plan.
pub fn render_outcome(outcome: &RunOutcome, total: usize) -> String {
    let mut out = format!(
        "\n--- Run {}/{}: hit_rate = {:.2} ({}) ---\n",
        outcome.run.index + 1,
        total,
        outcome.run.hit_rate(),
        outcome.run.request.model.label()
    );
    out.push_str(&render_run(&outcome.run.request, &outcome.report, DEFAULT_TOP_N));
    out
}

fn render_settings(request: &SimulationRequest, break_even: f64) -> String {
    let params = &request.params;
    let mut out = format!("\n{}\nCURRENT SIMULATION SETTING:\n", "=".repeat(RULE_WIDTH));
    out.push_str(&format!("Hit rate: {:.2}%\n", params.hit_rate * 100.0));
    out.push_str(&format!("Mode: {}\n", request.model.label()));
    match &request.model {
        SequenceModel::Markov {
            p_win_after_win,
            p_win_after_loss,
        } => out.push_str(&format!(
            "P(win|win): {p_win_after_win}, P(win|loss): {p_win_after_loss}\n"
        )),
        SequenceModel::Markov2 {
            p_win_ww,
            p_win_wl,
            p_win_lw,
            p_win_ll,
        } => out.push_str(&format!(
            "P(win|WW): {p_win_ww}, P(win|WL): {p_win_wl}, P(win|LW): {p_win_lw}, P(win|LL): {p_win_ll}\n"
        )),
        SequenceModel::RegimeSwitch { .. } => {
            for (i, r) in request
                .model
                .regimes_for(params.num_trades)
                .unwrap_or_default()
                .iter()
                .enumerate()
            {
                out.push_str(&format!(
                    "Regime {}: {} trades @ {:.2}% (win {}, loss {})\n",
                    i + 1,
                    r.length,
                    r.hit_rate * 100.0,
                    r.avg_win,
                    r.avg_loss
                ));
            }
        }
        SequenceModel::Independent | SequenceModel::Phased => {}
    }
    out.push_str(&format!("{}\n\n", "=".repeat(RULE_WIDTH)));

    out.push_str(&format!("Average win per trade: {}\n", params.avg_win));
    out.push_str(&format!("Average loss per trade: {}\n", params.avg_loss));
    out.push_str(&format!("Number of simulations: {}\n", request.num_simulations));
    out.push_str(&format!("Number of trades per simulation: {}\n", params.num_trades));
    out.push_str(&format!(
        "Number of shuffles per simulation: {}\n",
        request.num_mc_shuffles
    ));
    out.push_str(&format!("Break-even hit rate: {:.2}%\n", break_even * 100.0));
    out
}

fn header() -> String {
    format!(
        "{:<90} {:>14} {:>16} {:>12} {:>12} {:>12} {:>14} {:>14} {:>12} {:>18}",
        "Strategy",
        "Avg Profit",
        "Avg Drawdown",
        "Ratio",
        "Min",
        "Max",
        "Min DD",
        "Max DD",
        "Avg/Trade",
        "Profit/MaxDD"
    )
}

fn row(stat: &AggregateStat) -> String {
    format!(
        "{:<90} {:14.2} {:16.2} {:12.2} {:12.2} {:12.2} {:14.2} {:14.2} {:12.2} {:18.2}",
        stat.description,
        stat.avg_profit,
        stat.avg_drawdown,
        stat.ratio,
        stat.min_profit,
        stat.max_profit,
        stat.min_drawdown,
        stat.max_drawdown,
        stat.avg_profit_per_trade,
        stat.profit_to_max_drawdown
    )
}

fn render_table(request: &SimulationRequest, stats: &[AggregateStat]) -> String {
    let header = header();
    let rule_len = header.chars().count();
    let mut out = format!("{header}\n{}\n\n", "=".repeat(rule_len));
    out.push_str(&format!(
        "*** Hit rate: {}%  -  {} ***\n\n",
        (request.params.hit_rate * 100.0).round() as i64,
        request.model.label()
    ));
    for (idx, stat) in stats.iter().enumerate() {
        out.push_str(&row(stat));
        out.push('\n');
        // the top three get their own block
        if idx == 2 {
            out.push_str(&"-".repeat(rule_len));
            out.push('\n');
        }
    }
    out
}

fn render_comparison(stats: &[AggregateStat], top_n: usize) -> String {
    let baseline = stats.iter().find(|s| s.policy == PolicyId::Constant);
    let mut out = format!(
        "\n\nTop {top_n} strategies compared to '{}':\n{}\n",
        PolicyId::Constant.description(),
        "-".repeat(62)
    );
    for stat in stats.iter().take(top_n) {
        out.push('\n');
        out.push_str(&row(stat));
        out.push('\n');
        if let Some(base) = baseline {
            out.push_str(&row(base));
            out.push('\n');
        }
    }
    out
}
