use cogbat_core::{ResponseEvent, SessionPhase, TrialResult, TrialSpec};
use cogbat_timing::{Clock, Scheduler};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::BatteryConfig;
use crate::error::{ExportError, SessionError};
use crate::generate;
use crate::recorder::TrialRecorder;
use crate::report::Report;
use crate::window::{ResponseWindow, Submission};

/// Collaborators the session calls into at its documented transitions.
///
/// `present_stimulus`, `show_interaction_count`, `show_progress` and
/// `show_report` belong to the presentation layer; `export` is the storage
/// sink. All calls are synchronous.
pub trait Frontend {
    fn present_stimulus(&mut self, spec: &TrialSpec);
    fn show_interaction_count(&mut self, count: u32);
    /// Typed-buffer echo for the sequence design. Optional.
    fn show_progress(&mut self, _typed: &str) {}
    fn show_report(&mut self, report: &Report);
    /// Called when the post-report delay elapses and the session returns
    /// to idle. Optional.
    fn session_idle(&mut self) {}
    /// Writes the recorded rows to the result sink.
    fn export(&mut self, results: &[TrialResult]) -> Result<(), ExportError>;
}

/// Delayed effects the session schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Open the next trial (or complete) once the inter-trial delay ends.
    Advance,
    /// Return to idle once the post-report delay ends.
    ReturnToIdle,
}

/// The session state machine: Idle -> Running -> Complete -> Idle.
///
/// Driven one event at a time: [`Session::handle_response`] for input
/// delivered by the front end, [`Session::tick`] for elapsed timers.
/// Nothing blocks; an open window simply waits for the next event.
pub struct Session<C, R, F>
where
    C: Clock,
    R: Rng,
    F: Frontend,
{
    config: BatteryConfig,
    clock: C,
    rng: R,
    frontend: F,
    phase: SessionPhase,
    /// Bumped by every start; scheduled actions from older generations are
    /// discarded unfired.
    generation: u64,
    next_index: usize,
    window: Option<ResponseWindow>,
    recorder: TrialRecorder,
    scheduler: Scheduler<SessionAction>,
    started_at_ns: u64,
    report: Option<Report>,
    export_error: Option<ExportError>,
}

impl<C, R, F> Session<C, R, F>
where
    C: Clock,
    R: Rng,
    F: Frontend,
{
    pub fn new(config: BatteryConfig, clock: C, rng: R, frontend: F) -> Self {
        Self {
            config,
            clock,
            rng,
            frontend,
            phase: SessionPhase::Idle,
            generation: 0,
            next_index: 0,
            window: None,
            recorder: TrialRecorder::new(),
            scheduler: Scheduler::new(),
            started_at_ns: 0,
            report: None,
            export_error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Recorded results so far, in recording order.
    pub fn results(&self) -> &[TrialResult] {
        self.recorder.all()
    }

    /// Summary of the last completed session, if any.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Export failure from the last completion, if any. Non-fatal by
    /// contract, so it is retained here instead of aborting the session.
    pub fn export_error(&self) -> Option<&ExportError> {
        self.export_error.as_ref()
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// Trial currently awaiting a response, if any.
    pub fn open_trial(&self) -> Option<&TrialSpec> {
        self.window
            .as_ref()
            .filter(|window| window.is_open())
            .map(|window| window.spec())
    }

    /// Earliest pending timer deadline, in clock nanoseconds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_due(self.generation)
    }

    /// Current reading of the session's monotonic clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Begins a fresh session, discarding in-memory results from the
    /// previous one. Fails fast on invalid configuration, leaving every
    /// piece of state untouched.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.config.validate()?;
        self.generation += 1;
        self.phase = SessionPhase::Running;
        self.next_index = 0;
        self.close_window();
        self.report = None;
        self.export_error = None;
        self.recorder.clear();
        self.started_at_ns = self.clock.now();
        info!(
            generation = self.generation,
            trials = self.config.total_trials,
            "session started"
        );
        self.advance()
    }

    /// Fires every timer of the current generation that is due.
    pub fn tick(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        while let Some(action) = self.scheduler.pop_due(now, self.generation) {
            match action {
                SessionAction::Advance => self.advance()?,
                SessionAction::ReturnToIdle => {
                    debug!("returning to idle");
                    self.phase = SessionPhase::Idle;
                    self.frontend.session_idle();
                }
            }
        }
        Ok(())
    }

    /// Routes one input event to the open window. Events with no open
    /// window (late arrivals, inter-trial noise) are safely ignored.
    pub fn handle_response(&mut self, event: ResponseEvent) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Running {
            debug!(?event, "response outside a running session ignored");
            return Ok(());
        }
        let Some(window) = self.window.as_mut() else {
            debug!(?event, "response with no open window ignored");
            return Ok(());
        };
        match window.submit(&event) {
            Submission::Ignored => {
                debug!(?event, "response ignored by the window");
            }
            Submission::Progress { typed } => {
                let count = window.interactions();
                self.frontend.show_interaction_count(count);
                self.frontend.show_progress(&typed);
            }
            Submission::Reset => {
                let count = window.interactions();
                self.frontend.show_interaction_count(count);
                self.frontend.show_progress("");
            }
            Submission::Closed(closure) => {
                let spec = window.spec().clone();
                self.window = None;
                self.frontend.show_interaction_count(closure.interactions);
                let result = TrialResult {
                    trial_number: spec.trial_number(),
                    stimulus: spec.stimulus.description(),
                    difficulty: spec.difficulty,
                    success: closure.success,
                    interactions: closure.interactions,
                    response_time_ms: closure.response_time_ms,
                    elapsed_ms: event.at_ns.saturating_sub(self.started_at_ns) / 1_000_000,
                };
                if let Err(err) = self.recorder.record(result) {
                    // Recording state is inconsistent; abort instead of
                    // running on with it.
                    warn!(%err, "aborting session");
                    self.abort();
                    return Err(err.into());
                }
                let due = self.clock.now() + self.config.inter_trial_ms * 1_000_000;
                self.scheduler
                    .schedule(due, self.generation, SessionAction::Advance);
            }
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<(), SessionError> {
        if self.next_index as u32 >= self.config.total_trials {
            self.complete();
            return Ok(());
        }
        let spec = generate::generate(self.next_index, &self.config.design, &mut self.rng)?;
        debug!(index = spec.index, difficulty = %spec.difficulty, "trial presented");
        self.frontend.present_stimulus(&spec);
        self.frontend.show_interaction_count(0);
        let now = self.clock.now();
        self.window = Some(ResponseWindow::open(spec, now));
        self.next_index += 1;
        Ok(())
    }

    fn complete(&mut self) {
        self.phase = SessionPhase::Complete;
        self.close_window();
        let report = Report::from_results(self.recorder.all());
        info!(trials = report.total_trials, "session complete");
        self.frontend.show_report(&report);
        if let Err(err) = self.frontend.export(self.recorder.all()) {
            warn!(%err, "result export failed; the report is still shown");
            self.export_error = Some(err);
        }
        self.report = Some(report);
        let due = self.clock.now() + self.config.return_to_idle_ms * 1_000_000;
        self.scheduler
            .schedule(due, self.generation, SessionAction::ReturnToIdle);
    }

    fn abort(&mut self) {
        // Stranding the generation kills every pending timer.
        self.generation += 1;
        self.phase = SessionPhase::Idle;
        self.close_window();
    }

    fn close_window(&mut self) {
        if let Some(mut window) = self.window.take() {
            window.force_close();
        }
    }
}
