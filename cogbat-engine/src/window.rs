use cogbat_core::{ResponseEvent, ResponseInput, Stimulus, TrialSpec};

/// What a submitted event did to the window.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Closed window, wrong trial, or wrong input species; nothing changed.
    Ignored,
    /// Keystroke matched the next target symbol; the window stays open.
    Progress { typed: String },
    /// Keystroke mismatched; the typed buffer was cleared, the window
    /// stays open and the whole sequence must be retyped.
    Reset,
    /// Terminal response accepted; the window is now closed.
    Closed(Closure),
}

/// Terminal outcome of one trial's window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Closure {
    pub success: bool,
    pub interactions: u32,
    pub response_time_ms: f64,
}

/// Open interval during which one trial accepts input. Holds the per-trial
/// state (typed buffer, interaction count) that would otherwise leak
/// across trials.
#[derive(Debug)]
pub struct ResponseWindow {
    spec: TrialSpec,
    opened_at_ns: u64,
    typed: String,
    interactions: u32,
    open: bool,
}

impl ResponseWindow {
    pub fn open(spec: TrialSpec, now_ns: u64) -> Self {
        Self {
            spec,
            opened_at_ns: now_ns,
            typed: String::new(),
            interactions: 0,
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn spec(&self) -> &TrialSpec {
        &self.spec
    }

    /// Accepted input events so far, resets included.
    pub fn interactions(&self) -> u32 {
        self.interactions
    }

    /// Abandons the trial without a terminal response.
    pub fn force_close(&mut self) {
        self.open = false;
    }

    /// Feeds one input event through the window's discipline. Events after
    /// closure never mutate state, which keeps accepted terminal responses
    /// at one per trial.
    pub fn submit(&mut self, event: &ResponseEvent) -> Submission {
        if !self.open || event.trial_index != self.spec.index {
            return Submission::Ignored;
        }
        match (&self.spec.stimulus, &event.input) {
            (Stimulus::Sequence { target }, ResponseInput::Keystroke(key)) => {
                self.interactions += 1;
                let expected = target.chars().nth(self.typed.chars().count());
                if expected == Some(*key) {
                    self.typed.push(*key);
                    if self.typed == *target {
                        self.open = false;
                        Submission::Closed(self.closure(true, event.at_ns))
                    } else {
                        Submission::Progress {
                            typed: self.typed.clone(),
                        }
                    }
                } else {
                    self.typed.clear();
                    Submission::Reset
                }
            }
            (Stimulus::Number { value, threshold }, ResponseInput::Choice { greater }) => {
                self.interactions += 1;
                self.open = false;
                let success = (*greater && value > threshold) || (!*greater && value < threshold);
                Submission::Closed(self.closure(success, event.at_ns))
            }
            _ => Submission::Ignored,
        }
    }

    fn closure(&self, success: bool, at_ns: u64) -> Closure {
        Closure {
            success,
            interactions: self.interactions,
            response_time_ms: at_ns.saturating_sub(self.opened_at_ns) as f64 / 1e6,
        }
    }
}
