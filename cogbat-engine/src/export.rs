use std::io::Write;

use cogbat_core::TrialResult;

use crate::error::ExportError;

/// Column order matches the recorded field order and is part of the file
/// contract.
pub const CSV_HEADER: [&str; 7] = [
    "Trial Number",
    "Stimulus",
    "Difficulty",
    "Was Successful",
    "Interaction Count",
    "Response Time (ms)",
    "Elapsed (ms)",
];

/// Writes the header plus one row per result, in recording order. The
/// sink is any append-capable writer; its identity is the caller's
/// business.
pub fn write_csv<W: Write>(results: &[TrialResult], mut sink: W) -> Result<(), ExportError> {
    writeln!(sink, "{}", CSV_HEADER.join(","))?;
    for result in results {
        writeln!(
            sink,
            "{},{},{},{},{},{:.2},{}",
            result.trial_number,
            escape(&result.stimulus),
            result.difficulty,
            bool_field(result.success),
            result.interactions,
            result.response_time_ms,
            result.elapsed_ms,
        )?;
    }
    sink.flush()?;
    Ok(())
}

// Booleans keep the capitalised form of the historical export files.
fn bool_field(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
