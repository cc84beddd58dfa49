use std::fmt;

use cogbat_core::{Difficulty, TrialResult};
use serde::Serialize;

/// Per-difficulty slice of the summary. Averages are `None` when the
/// partition is empty; they render as "N/A", never as NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DifficultySummary {
    pub count: usize,
    pub correct: usize,
    pub accuracy: Option<f64>,
    pub mean_interactions: Option<f64>,
    pub mean_response_ms: Option<f64>,
}

impl DifficultySummary {
    fn from_results(results: &[&TrialResult]) -> Self {
        let count = results.len();
        if count == 0 {
            return Self::default();
        }
        let correct = results.iter().filter(|result| result.success).count();
        let mean_interactions = results
            .iter()
            .map(|result| result.interactions as f64)
            .sum::<f64>()
            / count as f64;
        let mean_response_ms = results
            .iter()
            .map(|result| result.response_time_ms)
            .sum::<f64>()
            / count as f64;
        Self {
            count,
            correct,
            accuracy: Some(correct as f64 / count as f64),
            mean_interactions: Some(mean_interactions),
            mean_response_ms: Some(mean_response_ms),
        }
    }
}

/// Summary statistics over one session's recorded trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_trials: usize,
    pub total_correct: usize,
    pub overall_accuracy: Option<f64>,
    pub easy: DifficultySummary,
    pub hard: DifficultySummary,
}

impl Report {
    pub fn from_results(results: &[TrialResult]) -> Self {
        let easy: Vec<&TrialResult> = results
            .iter()
            .filter(|result| result.difficulty == Difficulty::Easy)
            .collect();
        let hard: Vec<&TrialResult> = results
            .iter()
            .filter(|result| result.difficulty == Difficulty::Hard)
            .collect();

        let total_trials = results.len();
        let total_correct = results.iter().filter(|result| result.success).count();
        let overall_accuracy = if total_trials > 0 {
            Some(total_correct as f64 / total_trials as f64)
        } else {
            None
        };

        Self {
            total_trials,
            total_correct,
            overall_accuracy,
            easy: DifficultySummary::from_results(&easy),
            hard: DifficultySummary::from_results(&hard),
        }
    }
}

fn average(value: Option<f64>) -> String {
    match value {
        Some(mean) => format!("{mean:.2}"),
        None => "N/A".to_string(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Report:")?;
        writeln!(f)?;
        writeln!(f, "Total Trials: {}", self.total_trials)?;
        writeln!(
            f,
            "Easy Trials Correct: {} / {}",
            self.easy.correct, self.easy.count
        )?;
        writeln!(
            f,
            "Hard Trials Correct: {} / {}",
            self.hard.correct, self.hard.count
        )?;
        writeln!(
            f,
            "Easy Trials Avg Key Presses: {}",
            average(self.easy.mean_interactions)
        )?;
        writeln!(
            f,
            "Hard Trials Avg Key Presses: {}",
            average(self.hard.mean_interactions)
        )?;
        writeln!(
            f,
            "Average Easy Trial Time: {} ms",
            average(self.easy.mean_response_ms)
        )?;
        writeln!(
            f,
            "Average Hard Trial Time: {} ms",
            average(self.hard.mean_response_ms)
        )?;
        write!(
            f,
            "Total Accuracy: {} / {}",
            self.total_correct, self.total_trials
        )
    }
}
