use cogbat_core::{Difficulty, Stimulus, TrialSpec};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DesignConfig;
use crate::error::ConfigError;

/// Produces the spec for trial `index`. The difficulty class is fixed by
/// index parity; only the stimulus content within the class is random.
/// No side effects beyond consuming the RNG.
pub fn generate<R: Rng>(
    index: usize,
    design: &DesignConfig,
    rng: &mut R,
) -> Result<TrialSpec, ConfigError> {
    let difficulty = Difficulty::for_index(index);
    let stimulus = match design {
        DesignConfig::Sequence(sequence) => {
            let mut pool: Vec<char> = sequence.alphabet(difficulty).chars().collect();
            if sequence.length > pool.len() {
                return Err(ConfigError::SequenceTooLong {
                    difficulty,
                    length: sequence.length,
                    alphabet: pool.len(),
                });
            }
            // Fisher-Yates over the whole alphabet, then a prefix: a
            // uniform draw without replacement.
            pool.shuffle(rng);
            Stimulus::Sequence {
                target: pool[..sequence.length].iter().collect(),
            }
        }
        DesignConfig::Comparison(comparison) => {
            let (low, high) = comparison.values(difficulty);
            let value = if rng.random_bool(0.5) { high } else { low };
            Stimulus::Number {
                value,
                threshold: comparison.threshold,
            }
        }
    };
    Ok(TrialSpec {
        index,
        difficulty,
        stimulus,
    })
}
