/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Complete,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}
