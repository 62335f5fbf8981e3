use crate::state::AppState;
use crate::timer::FrameTimer;
use aviator_kernel::SceneError;
use aviator_render::Renderer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Errors that end the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("scene update failed: {0}")]
    Scene(#[from] SceneError),
    #[error("renderer failed: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("frame loop is stopped")]
    Stopped,
}

/// What the host reports when asked for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSignal {
    /// Time to produce another frame.
    Frame,
    /// The surface being drawn to no longer exists.
    HostGone,
}

/// Source of frame timing. Blocks until the next frame is due.
pub trait FrameClock {
    fn next_frame(&mut self) -> FrameSignal;
}

/// Yields a fixed number of frames back to back, then reports the host gone.
#[derive(Debug, Clone)]
pub struct FixedClock {
    remaining: u64,
}

impl FixedClock {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl FrameClock for FixedClock {
    fn next_frame(&mut self) -> FrameSignal {
        if self.remaining == 0 {
            return FrameSignal::HostGone;
        }
        self.remaining -= 1;
        FrameSignal::Frame
    }
}

/// Sleeps so frames start at most once per `interval`. Never ends on its own.
#[derive(Debug, Clone)]
pub struct PacedClock {
    interval: Duration,
    next: Option<Instant>,
}

impl PacedClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }
}

impl FrameClock for PacedClock {
    fn next_frame(&mut self) -> FrameSignal {
        let now = Instant::now();
        if let Some(due) = self.next.filter(|due| *due > now) {
            std::thread::sleep(due - now);
        }
        // Late frames restart the schedule instead of bursting to catch up.
        let start = Instant::now();
        self.next = Some(start + self.interval);
        FrameSignal::Frame
    }
}

/// Shared request to stop the loop, raised from any thread.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    StopRequested,
    HostGone,
}

/// Outcome of [`run`].
#[derive(Debug, Clone)]
pub struct RunReport<O> {
    pub frames: u64,
    pub reason: StopReason,
    /// Output of the last rendered frame.
    pub last_output: Option<O>,
    pub average_frame: Duration,
    pub min_frame: Duration,
    pub max_frame: Duration,
}

/// Single-frame driver for hosts that own their event loop.
#[derive(Debug)]
pub struct FrameLoop {
    timer: FrameTimer,
    state: LoopState,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            timer: FrameTimer::default(),
            state: LoopState::Running,
        }
    }

    /// Tick the scene once and render it.
    ///
    /// An error moves the loop to [`LoopState::Stopped`]. A stopped loop
    /// neither ticks nor renders and returns [`FrameError::Stopped`] until
    /// [`FrameLoop::resume`] is called.
    pub fn step<R: Renderer>(
        &mut self,
        app: &mut AppState,
        renderer: &mut R,
    ) -> Result<R::Output, FrameError> {
        if self.state == LoopState::Stopped {
            return Err(FrameError::Stopped);
        }
        let _span = tracing::info_span!("frame", frame = app.frame() + 1).entered();
        let start = Instant::now();

        let result = app
            .tick()
            .map_err(FrameError::from)
            .and_then(|()| {
                renderer
                    .render(app.scene(), app.view())
                    .map_err(|e| FrameError::Render(Box::new(e)))
            });

        match result {
            Ok(output) => {
                self.timer.record(start.elapsed());
                Ok(output)
            }
            Err(e) => {
                tracing::error!(error = %e, "frame failed");
                self.state = LoopState::Stopped;
                Err(e)
            }
        }
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Let a stopped loop produce frames again.
    pub fn resume(&mut self) {
        self.state = LoopState::Running;
    }
}

/// Drive `app` until the stop flag is raised, the clock reports the host
/// gone, or a frame fails.
pub fn run<C, R>(
    app: &mut AppState,
    clock: &mut C,
    renderer: &mut R,
    stop: &StopFlag,
) -> Result<RunReport<R::Output>, FrameError>
where
    C: FrameClock,
    R: Renderer,
{
    let mut frame_loop = FrameLoop::new();
    let mut frames = 0;
    let mut last_output = None;

    let reason = loop {
        if stop.is_raised() {
            break StopReason::StopRequested;
        }
        if clock.next_frame() == FrameSignal::HostGone {
            break StopReason::HostGone;
        }
        if stop.is_raised() {
            break StopReason::StopRequested;
        }
        last_output = Some(frame_loop.step(app, renderer)?);
        frames += 1;
    };
    frame_loop.stop();

    let timer = frame_loop.timer();
    tracing::info!(
        frames,
        ?reason,
        avg_ms = timer.average().as_secs_f64() * 1000.0,
        "frame loop stopped"
    );

    Ok(RunReport {
        frames,
        reason,
        last_output,
        average_frame: timer.average(),
        min_frame: timer.min(),
        max_frame: timer.max(),
    })
}
