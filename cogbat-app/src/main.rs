mod terminal;

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cogbat_core::{ResponseEvent, ResponseInput, SessionPhase, Stimulus};
use cogbat_engine::{BatteryConfig, ComparisonConfig, DesignConfig, SequenceConfig, Session};
use cogbat_timing::{precise_sleep, MonoClock};
use rand::rngs::ThreadRng;
use tracing_subscriber::EnvFilter;

use terminal::TerminalFrontend;

#[derive(Debug, Parser)]
#[command(name = "cogbat", about = "Short psychophysical test battery")]
struct Cli {
    /// Which test design to run (ignored when --config is given).
    #[arg(long, value_enum, default_value = "sequence")]
    design: Design,

    /// Trials per session, overriding the configured count.
    #[arg(long)]
    trials: Option<u32>,

    /// JSON battery configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the exported CSV/JSON results.
    #[arg(long, default_value = "exports")]
    out_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Design {
    /// Motor response test: retype letter sequences.
    Sequence,
    /// Numerical distance test: judge numbers against a threshold.
    Comparison,
}

type BatterySession = Session<MonoClock, ThreadRng, TerminalFrontend>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let (label, show_counts) = match &config.design {
        DesignConfig::Sequence(_) => ("sequence", true),
        DesignConfig::Comparison(_) => ("comparison", false),
    };

    let frontend = TerminalFrontend::new(cli.out_dir.clone(), label, show_counts);
    let mut session = Session::new(config, MonoClock::new(), rand::rng(), frontend);

    session.start().context("failed to start the session")?;
    run(&mut session)
}

fn load_config(cli: &Cli) -> Result<BatteryConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => {
            let design = match cli.design {
                Design::Sequence => DesignConfig::Sequence(SequenceConfig::default()),
                Design::Comparison => DesignConfig::Comparison(ComparisonConfig::default()),
            };
            BatteryConfig {
                design,
                ..BatteryConfig::default()
            }
        }
    };
    if let Some(trials) = cli.trials {
        config.total_trials = trials;
    }
    Ok(config)
}

/// Drives the session until it returns to idle: sleeps out pending timers,
/// otherwise reads one line of input and feeds it to the open window.
fn run(session: &mut BatterySession) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if let Some(due) = session.next_deadline() {
            let now = session.now();
            if due > now {
                precise_sleep(Duration::from_nanos(due - now));
            }
            session.tick()?;
            continue;
        }

        if session.phase() != SessionPhase::Running {
            return Ok(());
        }

        let Some(spec) = session.open_trial() else {
            return Ok(());
        };
        let trial_index = spec.index;
        let comparison = matches!(spec.stimulus, Stimulus::Number { .. });

        let Some(line) = lines.next() else {
            tracing::warn!("input closed before the session finished");
            return Ok(());
        };
        let line = line.context("failed to read a response")?;
        let inputs = parse_inputs(&line, comparison);
        if inputs.is_empty() && comparison {
            println!("Answer with g (greater) or l (less).");
        }
        for input in inputs {
            let event = ResponseEvent {
                trial_index,
                input,
                at_ns: session.now(),
            };
            session.handle_response(event)?;
        }
    }
}

fn parse_inputs(line: &str, comparison: bool) -> Vec<ResponseInput> {
    if comparison {
        match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('g') => vec![ResponseInput::Choice { greater: true }],
            Some('l') => vec![ResponseInput::Choice { greater: false }],
            _ => Vec::new(),
        }
    } else {
        line.trim()
            .chars()
            .map(|c| ResponseInput::Keystroke(c.to_ascii_uppercase()))
            .collect()
    }
}
