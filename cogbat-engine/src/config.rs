use cogbat_core::Difficulty;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters for one battery session. Loadable from JSON; every field
/// falls back to the reference design's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Trials per session.
    pub total_trials: u32,
    /// Delay between a completed trial and the next stimulus.
    pub inter_trial_ms: u64,
    /// Delay between the report and the return to the idle state.
    pub return_to_idle_ms: u64,
    pub design: DesignConfig,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            total_trials: 10,
            inter_trial_ms: 1_000,
            return_to_idle_ms: 3_000,
            design: DesignConfig::Sequence(SequenceConfig::default()),
        }
    }
}

/// Which test the session runs, with its design-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DesignConfig {
    /// Motor response test: retype a symbol sequence.
    Sequence(SequenceConfig),
    /// Numerical distance test: judge a number against a threshold.
    Comparison(ComparisonConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Distinct symbols per target sequence.
    pub length: usize,
    pub easy_alphabet: String,
    pub hard_alphabet: String,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            length: 2,
            easy_alphabet: "SK".into(),
            hard_alphabet: "EYDGLVN".into(),
        }
    }
}

impl SequenceConfig {
    pub fn alphabet(&self, difficulty: Difficulty) -> &str {
        match difficulty {
            Difficulty::Easy => &self.easy_alphabet,
            Difficulty::Hard => &self.hard_alphabet,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub threshold: i64,
    /// The two candidate values for easy trials.
    pub easy_values: (i64, i64),
    /// The two candidate values for hard trials.
    pub hard_values: (i64, i64),
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            easy_values: (1, 9),
            hard_values: (4, 6),
        }
    }
}

impl ComparisonConfig {
    pub fn values(&self, difficulty: Difficulty) -> (i64, i64) {
        match difficulty {
            Difficulty::Easy => self.easy_values,
            Difficulty::Hard => self.hard_values,
        }
    }
}

impl BatteryConfig {
    /// Checks every parameter the generator and session rely on. Runs at
    /// session start, before any trial is presented.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        match &self.design {
            DesignConfig::Sequence(sequence) => {
                if sequence.length == 0 {
                    return Err(ConfigError::EmptySequence);
                }
                for difficulty in [Difficulty::Easy, Difficulty::Hard] {
                    let mut symbols = Vec::new();
                    for symbol in sequence.alphabet(difficulty).chars() {
                        if symbols.contains(&symbol) {
                            return Err(ConfigError::RepeatedSymbol { difficulty, symbol });
                        }
                        symbols.push(symbol);
                    }
                    // Distinct symbols cannot be drawn past the alphabet size.
                    if sequence.length > symbols.len() {
                        return Err(ConfigError::SequenceTooLong {
                            difficulty,
                            length: sequence.length,
                            alphabet: symbols.len(),
                        });
                    }
                }
            }
            DesignConfig::Comparison(comparison) => {
                for difficulty in [Difficulty::Easy, Difficulty::Hard] {
                    let (low, high) = comparison.values(difficulty);
                    for value in [low, high] {
                        if value == comparison.threshold {
                            return Err(ConfigError::ValueOnThreshold {
                                difficulty,
                                value,
                                threshold: comparison.threshold,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
