//! TOML simulation configuration.
//!
//! One file describes a base trading profile plus the parameters of every
//! sequence model, and which hit-rate offsets and models a sweep should run.
//! Only `[simulation]` with `hit_rate`, `avg_win` and `avg_loss` is required.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use streaksim_core::{
    GenerationParams, Regime, RegimeFill, SequenceModel, SimError, SimulationRequest,
};

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<SimError> for ConfigError {
    fn from(err: SimError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Which sequence model a run uses; parameters come from the config sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Independent,
    Phased,
    Markov,
    Markov2,
    Regime,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        Self::Independent,
        Self::Phased,
        Self::Markov,
        Self::Markov2,
        Self::Regime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Independent => "independent",
            Self::Phased => "phased",
            Self::Markov => "markov",
            Self::Markov2 => "markov2",
            Self::Regime => "regime",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "unknown model '{s}' (expected independent, phased, markov, markov2 or regime)"
                ))
            })
    }
}

/// `[simulation]`: base profile and Monte Carlo sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSection {
    pub hit_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    #[serde(default = "default_num_trades")]
    pub num_trades: usize,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: usize,
    #[serde(default = "default_num_mc_shuffles")]
    pub num_mc_shuffles: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_num_trades() -> usize {
    400
}

fn default_num_simulations() -> usize {
    200
}

fn default_num_mc_shuffles() -> usize {
    200
}

fn default_seed() -> u64 {
    42
}

/// `[markov]`: first-order transition probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkovSection {
    pub p_win_after_win: f64,
    pub p_win_after_loss: f64,
}

impl Default for MarkovSection {
    fn default() -> Self {
        Self {
            p_win_after_win: SequenceModel::DEFAULT_P_WIN_AFTER_WIN,
            p_win_after_loss: SequenceModel::DEFAULT_P_WIN_AFTER_LOSS,
        }
    }
}

/// `[markov2]`: second-order transition probabilities keyed by the last two
/// outcomes (oldest first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markov2Section {
    pub p_win_ww: f64,
    pub p_win_wl: f64,
    pub p_win_lw: f64,
    pub p_win_ll: f64,
}

impl Default for Markov2Section {
    fn default() -> Self {
        Self {
            p_win_ww: 0.8,
            p_win_wl: 0.6,
            p_win_lw: 0.5,
            p_win_ll: 0.3,
        }
    }
}

/// `[regime]`: explicit schedule (empty = built-in default) and fill policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeSection {
    pub fill: RegimeFill,
    pub schedule: Vec<Regime>,
}

/// `[sweep]`: hit-rate offsets applied to the base rate, and models to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    pub hit_rate_offsets: Vec<f64>,
    pub models: Vec<ModelKind>,
    pub parallel: bool,
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            hit_rate_offsets: vec![-0.1, -0.05, 0.0],
            models: vec![
                ModelKind::Phased,
                ModelKind::Markov,
                ModelKind::Markov2,
                ModelKind::Regime,
            ],
            parallel: true,
        }
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub simulation: SimulationSection,
    #[serde(default)]
    pub markov: MarkovSection,
    #[serde(default)]
    pub markov2: Markov2Section,
    #[serde(default)]
    pub regime: RegimeSection,
    #[serde(default)]
    pub sweep: SweepSection,
}

impl SimulationConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section the runs will use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.request(self.simulation.hit_rate, ModelKind::Independent)
            .validate()?;
        for kind in ModelKind::ALL {
            self.model(kind).validate()?;
        }
        if self.sweep.hit_rate_offsets.is_empty() {
            return Err(ConfigError::Invalid(
                "sweep.hit_rate_offsets must not be empty".into(),
            ));
        }
        if let Some(bad) = self.sweep.hit_rate_offsets.iter().find(|o| !o.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "sweep.hit_rate_offsets contains non-finite value {bad}"
            )));
        }
        if self.sweep.models.is_empty() {
            return Err(ConfigError::Invalid("sweep.models must not be empty".into()));
        }
        Ok(())
    }

    /// Sequence model for `kind`, parameterised from this config.
    pub fn model(&self, kind: ModelKind) -> SequenceModel {
        match kind {
            ModelKind::Independent => SequenceModel::Independent,
            ModelKind::Phased => SequenceModel::Phased,
            ModelKind::Markov => SequenceModel::Markov {
                p_win_after_win: self.markov.p_win_after_win,
                p_win_after_loss: self.markov.p_win_after_loss,
            },
            ModelKind::Markov2 => SequenceModel::Markov2 {
                p_win_ww: self.markov2.p_win_ww,
                p_win_wl: self.markov2.p_win_wl,
                p_win_lw: self.markov2.p_win_lw,
                p_win_ll: self.markov2.p_win_ll,
            },
            ModelKind::Regime => SequenceModel::RegimeSwitch {
                regimes: (!self.regime.schedule.is_empty()).then(|| self.regime.schedule.clone()),
                fill: self.regime.fill,
            },
        }
    }

    /// Monte Carlo request at `hit_rate` under `kind`.
    pub fn request(&self, hit_rate: f64, kind: ModelKind) -> SimulationRequest {
        let sim = &self.simulation;
        SimulationRequest::new(
            GenerationParams::new(hit_rate, sim.avg_win, sim.avg_loss, sim.num_trades),
            self.model(kind),
            sim.num_simulations,
            sim.num_mc_shuffles,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[simulation]
hit_rate = 0.81
avg_win = 307.0
avg_loss = 506.0
"#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = SimulationConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.simulation.num_trades, 400);
        assert_eq!(config.simulation.num_simulations, 200);
        assert_eq!(config.simulation.num_mc_shuffles, 200);
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.markov, MarkovSection::default());
        assert_eq!(config.markov2.p_win_ll, 0.3);
        assert_eq!(config.regime.fill, RegimeFill::Truncate);
        assert_eq!(config.sweep.hit_rate_offsets, vec![-0.1, -0.05, 0.0]);
        assert_eq!(config.sweep.models.len(), 4);
        assert!(config.sweep.parallel);
    }

    #[test]
    fn full_config_round_trips_sections() {
        let toml_str = r#"
[simulation]
hit_rate = 0.6
avg_win = 100.0
avg_loss = 80.0
num_trades = 50
seed = 7

[markov2]
p_win_ww = 0.9

[regime]
fill = "backfill"

[[regime.schedule]]
length = 20
hit_rate = 0.9
avg_win = 200.0
avg_loss = 100.0

[sweep]
hit_rate_offsets = [0.0]
models = ["independent", "regime"]
parallel = false
"#;
        let config = SimulationConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.markov2.p_win_ww, 0.9);
        assert_eq!(config.markov2.p_win_wl, 0.6);
        assert_eq!(config.sweep.models, vec![ModelKind::Independent, ModelKind::Regime]);
        match config.model(ModelKind::Regime) {
            SequenceModel::RegimeSwitch { regimes, fill } => {
                assert_eq!(fill, RegimeFill::Backfill);
                assert_eq!(regimes.unwrap().len(), 1);
            }
            other => panic!("unexpected model {other:?}"),
        }
    }

    #[test]
    fn empty_schedule_selects_default_regimes() {
        let config = SimulationConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.model(ModelKind::Regime), SequenceModel::regime_default());
    }

    #[test]
    fn missing_required_field_is_parse_error() {
        let err = SimulationConfig::from_toml("[simulation]\nhit_rate = 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_rate = MINIMAL.replace("0.81", "1.5");
        assert!(matches!(
            SimulationConfig::from_toml(&bad_rate),
            Err(ConfigError::Invalid(_))
        ));

        let bad_markov = format!("{MINIMAL}\n[markov]\np_win_after_win = -0.2\n");
        assert!(matches!(
            SimulationConfig::from_toml(&bad_markov),
            Err(ConfigError::Invalid(_))
        ));

        let no_models = format!("{MINIMAL}\n[sweep]\nmodels = []\n");
        assert!(matches!(
            SimulationConfig::from_toml(&no_models),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn model_kind_parses_case_insensitively() {
        assert_eq!("Markov2".parse::<ModelKind>().unwrap(), ModelKind::Markov2);
        assert!("garch".parse::<ModelKind>().is_err());
    }
}
