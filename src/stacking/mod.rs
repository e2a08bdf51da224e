//! Focus-stacking sessions.
//!
//! A session alternates shutter releases and fixed-size rail moves:
//!
//! ```text
//! Idle → MoveToStart → TakePictures ⇄ MoveRail → StopStacking → Idle
//! ```

mod config;
mod session;

pub use config::{SessionConfig, SessionRequest};
pub use session::{Phase, SessionOutcome, SessionState, StackingSession};
