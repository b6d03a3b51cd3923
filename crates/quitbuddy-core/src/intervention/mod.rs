mod breathing;
mod distraction;
mod session;
mod timer;

pub use breathing::{BreathPhase, BreathingState};
pub use distraction::{Bubble, DistractionState};
pub use session::{CravingSession, SessionResult, SosMode, Technique};
pub use timer::{Fired, TimerId, TimerKind, TimerQueue};
