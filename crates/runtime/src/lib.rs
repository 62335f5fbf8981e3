//! Frame loop coordinator: owns the scene state and advances it one frame
//! at a time.
//!
//! # Invariants
//! - Each tick runs waves, sea spin, sky spin, airplane placement,
//!   propeller and hair, in that order, exactly once.
//! - The sea spin is applied in one place only.
//! - A stopped loop renders no further frames.

mod frame_loop;
mod state;
mod timer;

pub use frame_loop::{
    FixedClock, FrameClock, FrameError, FrameLoop, FrameSignal, LoopState, PacedClock, RunReport,
    StopFlag, StopReason, run,
};
pub use state::{AIRPLANE_ALTITUDE, AIRPLANE_SCALE, AppState, HORIZON_DEPTH};
pub use timer::FrameTimer;
