use cogbat_core::TrialResult;

use crate::error::DuplicateTrialError;

/// Append-only store of completed trial results. Exactly one record per
/// completed trial index; recording order is preserved for export.
#[derive(Debug, Default)]
pub struct TrialRecorder {
    results: Vec<TrialResult>,
}

impl TrialRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `result`. Recording the same trial number twice is a caller
    /// error, not a recoverable condition.
    pub fn record(&mut self, result: TrialResult) -> Result<(), DuplicateTrialError> {
        if self
            .results
            .iter()
            .any(|recorded| recorded.trial_number == result.trial_number)
        {
            return Err(DuplicateTrialError {
                trial_number: result.trial_number,
            });
        }
        self.results.push(result);
        Ok(())
    }

    /// Results in recording order.
    pub fn all(&self) -> &[TrialResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Used only at session start.
    pub fn clear(&mut self) {
        self.results.clear();
    }
}
