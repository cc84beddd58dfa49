pub mod phase;
pub mod response;
pub mod stimulus;
pub mod trial;

pub use phase::SessionPhase;
pub use response::{ResponseEvent, ResponseInput};
pub use stimulus::{Difficulty, Stimulus};
pub use trial::{TrialResult, TrialSpec};
