use serde::{Deserialize, Serialize};

use crate::stimulus::{Difficulty, Stimulus};

/// One generated trial: its 0-based index, difficulty class and stimulus
/// content. Immutable once generated.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSpec {
    pub index: usize,
    pub difficulty: Difficulty,
    pub stimulus: Stimulus,
}

impl TrialSpec {
    /// 1-based position used in recorded results and exported rows.
    pub fn trial_number(&self) -> u32 {
        self.index as u32 + 1
    }
}

/// Recorded result of one completed trial. Never mutated after recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial_number: u32,
    pub stimulus: String,
    pub difficulty: Difficulty,
    pub success: bool,
    /// Accepted input events during the trial, resets included.
    pub interactions: u32,
    /// Stimulus presentation to terminal response, milliseconds.
    pub response_time_ms: f64,
    /// Cumulative session time at trial completion, milliseconds.
    pub elapsed_ms: u64,
}
