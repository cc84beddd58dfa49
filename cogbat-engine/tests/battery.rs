use std::io;
use std::time::Duration;

use cogbat_core::{
    Difficulty, ResponseEvent, ResponseInput, SessionPhase, Stimulus, TrialResult, TrialSpec,
};
use cogbat_engine::{
    export, BatteryConfig, ComparisonConfig, DesignConfig, ExportError, Frontend, Report,
    SequenceConfig, Session, SessionError,
};
use cogbat_timing::ManualClock;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct CaptureFrontend {
    presented: Vec<String>,
    reports: Vec<Report>,
    csv: Vec<u8>,
    idle_calls: u32,
    fail_export: bool,
}

impl Frontend for CaptureFrontend {
    fn present_stimulus(&mut self, spec: &TrialSpec) {
        self.presented.push(spec.stimulus.description());
    }

    fn show_interaction_count(&mut self, _count: u32) {}

    fn show_report(&mut self, report: &Report) {
        self.reports.push(report.clone());
    }

    fn session_idle(&mut self) {
        self.idle_calls += 1;
    }

    fn export(&mut self, results: &[TrialResult]) -> Result<(), ExportError> {
        if self.fail_export {
            return Err(io::Error::new(io::ErrorKind::Other, "sink unavailable").into());
        }
        export::write_csv(results, &mut self.csv)
    }
}

type TestSession = Session<ManualClock, StdRng, CaptureFrontend>;

fn sequence_config(total_trials: u32) -> BatteryConfig {
    BatteryConfig {
        total_trials,
        inter_trial_ms: 1_000,
        return_to_idle_ms: 3_000,
        design: DesignConfig::Sequence(SequenceConfig::default()),
    }
}

fn comparison_config(total_trials: u32) -> BatteryConfig {
    BatteryConfig {
        total_trials,
        inter_trial_ms: 1_000,
        return_to_idle_ms: 3_000,
        design: DesignConfig::Comparison(ComparisonConfig::default()),
    }
}

fn make_session(config: BatteryConfig, clock: &ManualClock, seed: u64) -> TestSession {
    Session::new(
        config,
        clock.clone(),
        StdRng::seed_from_u64(seed),
        CaptureFrontend::default(),
    )
}

fn type_target(session: &mut TestSession, clock: &ManualClock, trial: usize, target: &str) {
    for key in target.chars() {
        clock.advance(Duration::from_millis(120));
        let event = ResponseEvent {
            trial_index: trial,
            input: ResponseInput::Keystroke(key),
            at_ns: session.now(),
        };
        session.handle_response(event).unwrap();
    }
}

#[test]
fn sequence_battery_end_to_end() {
    let clock = ManualClock::new();
    let mut session = make_session(sequence_config(4), &clock, 7);
    session.start().unwrap();

    for trial in 0..4 {
        let spec = session.open_trial().expect("a window should be open").clone();
        assert_eq!(spec.index, trial);
        let expected = if trial % 2 == 0 {
            Difficulty::Easy
        } else {
            Difficulty::Hard
        };
        assert_eq!(spec.difficulty, expected);

        let Stimulus::Sequence { target } = spec.stimulus else {
            panic!("expected a sequence stimulus");
        };
        let alphabet = if trial % 2 == 0 { "SK" } else { "EYDGLVN" };
        assert_eq!(target.chars().count(), 2);
        assert!(target.chars().all(|symbol| alphabet.contains(symbol)));

        clock.advance(Duration::from_millis(350));
        type_target(&mut session, &clock, trial, &target);

        clock.advance(Duration::from_millis(1_000));
        session.tick().unwrap();
    }

    assert_eq!(session.phase(), SessionPhase::Complete);
    let numbers: Vec<u32> = session.results().iter().map(|r| r.trial_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert!(session.results().iter().all(|r| r.success));
    assert!(session.results().iter().all(|r| r.interactions == 2));

    let csv = String::from_utf8(session.frontend().csv.clone()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Trial Number,"));
    for (row, line) in lines[1..].iter().enumerate() {
        assert!(line.starts_with(&format!("{},", row + 1)));
    }

    let report = session.report().expect("report after completion");
    assert_eq!(report.easy.count, 2);
    assert_eq!(report.hard.count, 2);
    assert_eq!(report.overall_accuracy, Some(1.0));

    // the post-report delay returns the session to idle
    clock.advance(Duration::from_millis(3_000));
    session.tick().unwrap();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.frontend().idle_calls, 1);
}

#[test]
fn mismatches_retry_until_the_sequence_is_typed() {
    let clock = ManualClock::new();
    let mut session = make_session(sequence_config(1), &clock, 11);
    session.start().unwrap();

    let spec = session.open_trial().unwrap().clone();
    let Stimulus::Sequence { target } = spec.stimulus else {
        panic!("expected a sequence stimulus");
    };

    // the last target symbol is a mismatch at position 0 (symbols are
    // distinct), forcing one full retype
    let wrong = target.chars().last().unwrap();
    clock.advance(Duration::from_millis(100));
    session
        .handle_response(ResponseEvent {
            trial_index: 0,
            input: ResponseInput::Keystroke(wrong),
            at_ns: session.now(),
        })
        .unwrap();
    assert!(session.open_trial().is_some(), "mismatch must not close the window");

    type_target(&mut session, &clock, 0, &target);
    clock.advance(Duration::from_millis(1_000));
    session.tick().unwrap();

    assert_eq!(session.phase(), SessionPhase::Complete);
    let result = &session.results()[0];
    assert!(result.success);
    assert_eq!(result.interactions, target.chars().count() as u32 + 1);
}

#[test]
fn comparison_battery_scores_against_the_threshold() {
    let clock = ManualClock::new();
    let mut session = make_session(comparison_config(4), &clock, 3);
    session.start().unwrap();

    let mut expected: Vec<bool> = Vec::new();
    for trial in 0..4 {
        let spec = session.open_trial().unwrap().clone();
        let Stimulus::Number { value, threshold } = spec.stimulus else {
            panic!("expected a number stimulus");
        };
        assert_eq!(threshold, 5);

        // always answer "greater": correct exactly when the value is
        clock.advance(Duration::from_millis(250));
        expected.push(value > threshold);
        session
            .handle_response(ResponseEvent {
                trial_index: trial,
                input: ResponseInput::Choice { greater: true },
                at_ns: session.now(),
            })
            .unwrap();

        clock.advance(Duration::from_millis(1_000));
        session.tick().unwrap();
    }

    assert_eq!(session.phase(), SessionPhase::Complete);
    let scored: Vec<bool> = session.results().iter().map(|r| r.success).collect();
    assert_eq!(scored, expected);
    for result in session.results() {
        assert_eq!(result.response_time_ms, 250.0);
        assert_eq!(result.interactions, 1);
    }
}

#[test]
fn responses_after_closure_never_mutate_recorded_state() {
    let clock = ManualClock::new();
    let mut session = make_session(comparison_config(1), &clock, 5);
    session.start().unwrap();

    clock.advance(Duration::from_millis(200));
    session
        .handle_response(ResponseEvent {
            trial_index: 0,
            input: ResponseInput::Choice { greater: true },
            at_ns: session.now(),
        })
        .unwrap();
    let recorded = session.results().to_vec();
    assert_eq!(recorded.len(), 1);

    // a duplicate submission lands between trials, with no open window
    clock.advance(Duration::from_millis(50));
    session
        .handle_response(ResponseEvent {
            trial_index: 0,
            input: ResponseInput::Choice { greater: false },
            at_ns: session.now(),
        })
        .unwrap();

    assert_eq!(session.results(), recorded.as_slice());
}

#[test]
fn restart_cancels_the_pending_advance() {
    let clock = ManualClock::new();
    let mut session = make_session(sequence_config(2), &clock, 13);
    session.start().unwrap();

    let target = match &session.open_trial().unwrap().stimulus {
        Stimulus::Sequence { target } => target.clone(),
        Stimulus::Number { .. } => panic!("expected a sequence stimulus"),
    };
    type_target(&mut session, &clock, 0, &target);
    assert!(session.next_deadline().is_some(), "an advance should be pending");

    // a fresh start before the advance fires supersedes the old session
    session.start().unwrap();
    assert_eq!(session.frontend().presented.len(), 2);

    clock.advance(Duration::from_millis(2_000));
    session.tick().unwrap();

    // the stale advance did not fire: still on the new session's trial 0
    assert_eq!(session.open_trial().unwrap().index, 0);
    assert!(session.results().is_empty());
    assert_eq!(session.frontend().presented.len(), 2);
}

#[test]
fn export_failure_is_reported_but_not_fatal() {
    let clock = ManualClock::new();
    let mut session = make_session(comparison_config(1), &clock, 17);
    session.frontend_mut().fail_export = true;
    session.start().unwrap();

    clock.advance(Duration::from_millis(300));
    session
        .handle_response(ResponseEvent {
            trial_index: 0,
            input: ResponseInput::Choice { greater: false },
            at_ns: session.now(),
        })
        .unwrap();
    clock.advance(Duration::from_millis(1_000));
    session.tick().unwrap();

    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.frontend().reports.len(), 1);
    assert!(session.export_error().is_some());
}

#[test]
fn invalid_config_fails_before_any_trial() {
    let clock = ManualClock::new();

    let mut session = make_session(sequence_config(0), &clock, 19);
    assert!(matches!(
        session.start(),
        Err(SessionError::Config(_))
    ));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.frontend().presented.is_empty());

    let config = BatteryConfig {
        design: DesignConfig::Sequence(SequenceConfig {
            length: 9,
            ..SequenceConfig::default()
        }),
        ..sequence_config(4)
    };
    let mut session = make_session(config, &clock, 19);
    assert!(session.start().is_err());
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.frontend().presented.is_empty());
}

#[test]
fn input_between_trials_is_ignored() {
    let clock = ManualClock::new();
    let mut session = make_session(sequence_config(2), &clock, 23);
    session.start().unwrap();

    let target = match &session.open_trial().unwrap().stimulus {
        Stimulus::Sequence { target } => target.clone(),
        Stimulus::Number { .. } => panic!("expected a sequence stimulus"),
    };
    type_target(&mut session, &clock, 0, &target);
    assert!(session.open_trial().is_none());

    // keystrokes during the inter-trial gap do nothing
    session
        .handle_response(ResponseEvent {
            trial_index: 0,
            input: ResponseInput::Keystroke('S'),
            at_ns: session.now(),
        })
        .unwrap();
    assert_eq!(session.results().len(), 1);

    clock.advance(Duration::from_millis(1_000));
    session.tick().unwrap();
    assert_eq!(session.open_trial().unwrap().index, 1);
}
