pub mod clock;
pub mod schedule;
pub mod sleep;

pub use clock::{Clock, ManualClock, MonoClock};
pub use schedule::Scheduler;
pub use sleep::precise_sleep;
