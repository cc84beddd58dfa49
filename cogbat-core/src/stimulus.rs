use std::fmt;

use serde::{Deserialize, Serialize};

/// Difficulty class governing which stimulus values may be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    /// Even 0-based trial indices are easy, odd are hard. The split is
    /// fixed by parity, so an N-trial session always holds exactly
    /// ceil(N/2) easy and floor(N/2) hard trials.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Difficulty::Easy
        } else {
            Difficulty::Hard
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Stimulus content presented for one trial.
#[derive(Debug, Clone, PartialEq)]
pub enum Stimulus {
    /// Target symbol sequence the participant must retype.
    Sequence { target: String },
    /// Number to be judged greater or less than the threshold.
    Number { value: i64, threshold: i64 },
}

impl Stimulus {
    /// String form used in prompts and exported rows.
    pub fn description(&self) -> String {
        match self {
            Stimulus::Sequence { target } => target.clone(),
            Stimulus::Number { value, .. } => value.to_string(),
        }
    }
}
