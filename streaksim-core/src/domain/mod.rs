//! Domain types: trade outcomes, sequences, generation parameters.

pub mod params;
pub mod sequence;

pub use params::{GenerationParams, Regime, RegimeFill, SequenceModel};
pub use sequence::{is_win, TradeOutcome, TradeSequence};
