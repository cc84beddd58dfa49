//! Trial sequencing and response capture for short psychophysical tests.
//!
//! The engine runs a fixed-length session of alternating easy/hard trials,
//! collects one timed result record per completed trial, and produces a
//! summary report plus CSV rows once the last trial closes. Presentation,
//! physical input capture and result storage stay outside: the session
//! calls into a [`Frontend`] collaborator and is driven by discrete
//! response and timer events.

pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod recorder;
pub mod report;
pub mod session;
pub mod window;

pub use config::{BatteryConfig, ComparisonConfig, DesignConfig, SequenceConfig};
pub use error::{ConfigError, DuplicateTrialError, ExportError, SessionError};
pub use recorder::TrialRecorder;
pub use report::{DifficultySummary, Report};
pub use session::{Frontend, Session, SessionAction};
pub use window::{Closure, ResponseWindow, Submission};
