use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;

use cogbat_core::{Stimulus, TrialResult, TrialSpec};
use cogbat_engine::{export, ExportError, Frontend, Report};
use time::macros::format_description;
use time::OffsetDateTime;

/// Stdin/stdout front end plus the file sinks for exported results.
pub struct TerminalFrontend {
    out_dir: PathBuf,
    label: &'static str,
    /// The key-press counter is only meaningful for the sequence design.
    show_counts: bool,
}

impl TerminalFrontend {
    pub fn new(out_dir: PathBuf, label: &'static str, show_counts: bool) -> Self {
        Self {
            out_dir,
            label,
            show_counts,
        }
    }

    fn export_path(&self, slug: &str, extension: &str) -> PathBuf {
        self.out_dir
            .join(format!("{}_{}.{}", self.label, slug, extension))
    }
}

fn timestamp_slug() -> String {
    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "results".to_string())
}

impl Frontend for TerminalFrontend {
    fn present_stimulus(&mut self, spec: &TrialSpec) {
        println!();
        match &spec.stimulus {
            Stimulus::Sequence { target } => {
                println!(
                    "Trial {}: type the sequence {target}, then press enter",
                    spec.trial_number()
                );
            }
            Stimulus::Number { value, threshold } => {
                println!(
                    "Trial {}: is {value} greater (g) or less (l) than {threshold}?",
                    spec.trial_number()
                );
            }
        }
    }

    fn show_interaction_count(&mut self, count: u32) {
        if self.show_counts {
            println!("Key presses: {count}");
        }
    }

    fn show_progress(&mut self, typed: &str) {
        if self.show_counts {
            println!("Typed: {typed}");
        }
    }

    fn show_report(&mut self, report: &Report) {
        println!();
        println!("{report}");
    }

    fn session_idle(&mut self) {
        println!();
        println!("Session finished.");
    }

    fn export(&mut self, results: &[TrialResult]) -> Result<(), ExportError> {
        fs::create_dir_all(&self.out_dir)?;
        let slug = timestamp_slug();

        let csv_path = self.export_path(&slug, "csv");
        let csv_file = File::create(&csv_path)?;
        export::write_csv(results, BufWriter::new(csv_file))?;

        // Raw rows alongside the CSV, for downstream analysis scripts.
        let json_path = self.export_path(&slug, "json");
        let json_file = File::create(&json_path)?;
        serde_json::to_writer_pretty(BufWriter::new(json_file), results)
            .map_err(io::Error::from)?;

        println!();
        println!("Results exported to {}", csv_path.display());
        Ok(())
    }
}
