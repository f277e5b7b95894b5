mod countdown;
mod progress;
mod service;
mod workflow;

// Public API of the test session subsystem.
pub use crate::error::SessionError;
pub use countdown::{Countdown, TickOutcome, URGENT_THRESHOLD_SECS};
pub use progress::SessionProgress;
pub use service::{Direction, SessionPhase, TestSession};
pub use workflow::TestSessionLoop;
