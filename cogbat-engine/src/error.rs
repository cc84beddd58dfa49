use std::io;

use cogbat_core::Difficulty;
use thiserror::Error;

/// Invalid battery parameters. Surfaced by [`crate::Session::start`]
/// before any trial is presented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("total trials must be at least 1")]
    NoTrials,
    #[error("sequence length must be at least 1")]
    EmptySequence,
    #[error("sequence length {length} exceeds the {difficulty} alphabet ({alphabet} symbols)")]
    SequenceTooLong {
        difficulty: Difficulty,
        length: usize,
        alphabet: usize,
    },
    #[error("{difficulty} alphabet repeats the symbol '{symbol}'")]
    RepeatedSymbol { difficulty: Difficulty, symbol: char },
    #[error("{difficulty} candidate {value} equals the comparison threshold {threshold}")]
    ValueOnThreshold {
        difficulty: Difficulty,
        value: i64,
        threshold: i64,
    },
}

/// A trial number was recorded twice. A contract violation in the caller,
/// fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("trial {trial_number} is already recorded")]
pub struct DuplicateTrialError {
    pub trial_number: u32,
}

/// The result sink rejected a write. Non-fatal: the session still reaches
/// completion and shows its report.
#[derive(Debug, Error)]
#[error("failed to write results: {0}")]
pub struct ExportError(#[from] pub io::Error);

/// Failures surfaced by the session's event handlers.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Record(#[from] DuplicateTrialError),
}
