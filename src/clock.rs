//! Playback clock used to determine which frame should be on screen.
//!
//! The clock accumulates completed play intervals and measures the open one
//! against a wall-clock [`Instant`], so its reading is computed on demand
//! rather than by a ticking thread. Say you have a clock; poll the position
//! with `clock.time()` and the frame to display with `clock.current_frame()`.

use std::time::Instant;

use log::warn;

use crate::constants::MIN_SEEK_SECONDS;
use crate::error::PlayerError;

/// Run state of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
    Stopped,
}

/// Drift-resistant elapsed-time accumulator.
///
/// Elapsed time is the sum of completed interval durations plus the age of
/// the currently open interval. Pausing closes the open interval; resuming
/// opens a new one, so no play time is double-counted or lost across any
/// number of pause/resume toggles.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    previous_intervals: Vec<f64>,
    interval_start: Option<Instant>,
    fps: Option<f64>,
    max_duration: Option<f64>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Paused,
            previous_intervals: Vec::new(),
            interval_start: None,
            fps: None,
            max_duration: None,
        }
    }

    /// Discard all accumulated time.
    pub fn reset(&mut self) {
        self.previous_intervals.clear();
        self.interval_start = None;
    }

    /// Start the clock from zero.
    ///
    /// A no-op with a warning when the clock is already running.
    pub fn start(&mut self) {
        if self.state == ClockState::Running {
            warn!("clock already running");
            return;
        }
        self.reset();
        self.state = ClockState::Running;
        self.interval_start = Some(Instant::now());
    }

    /// Pause or resume the clock.
    ///
    /// This is a toggle: pausing folds the open interval into the completed
    /// list, resuming opens a new interval. Callers decide direction by the
    /// state they observe. Ignored when the clock is stopped.
    pub fn pause(&mut self) {
        match self.state {
            ClockState::Running => {
                if let Some(start) = self.interval_start.take() {
                    self.previous_intervals.push(start.elapsed().as_secs_f64());
                }
                self.state = ClockState::Paused;
            }
            ClockState::Paused => {
                self.interval_start = Some(Instant::now());
                self.state = ClockState::Running;
            }
            ClockState::Stopped => {}
        }
    }

    /// Stop the clock and reset the internal timers.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.reset();
    }

    /// Current position of the clock in seconds.
    pub fn time(&self) -> f64 {
        let open = self
            .interval_start
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        self.previous_intervals.iter().sum::<f64>() + open
    }

    /// Set the position of the clock. Used for seeking.
    ///
    /// All accumulated state is replaced by a single completed interval of
    /// `max(0.5, seconds)`, so subsequent `time()` reads return exactly that
    /// value until playback advances it. The floor exists because sampling
    /// frame 0 exactly is unreliable in the underlying decode path.
    pub fn set_time(&mut self, seconds: f64) {
        let seconds = seconds.max(MIN_SEEK_SECONDS);
        self.previous_intervals.clear();
        self.previous_intervals.push(seconds);
        if self.interval_start.is_some() {
            self.interval_start = Some(Instant::now());
        }
    }

    /// The frame number that should currently be displayed.
    pub fn current_frame(&self) -> Result<u64, PlayerError> {
        match self.fps {
            Some(fps) => Ok((fps * self.time()).floor() as u64),
            None => Err(PlayerError::FpsUnset),
        }
    }

    /// Duration of a single frame in seconds.
    pub fn frame_interval(&self) -> Result<f64, PlayerError> {
        match self.fps {
            Some(fps) => Ok(1.0 / fps),
            None => Err(PlayerError::FpsUnset),
        }
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// Set the frame rate of the stream this clock paces.
    pub fn set_fps(&mut self, value: f64) -> Result<(), PlayerError> {
        if !value.is_finite() || value < 1.0 {
            return Err(PlayerError::InvalidFps(value));
        }
        self.fps = Some(value);
        Ok(())
    }

    /// Duration the clock is expected to run for (usually the clip length).
    ///
    /// The clock never cuts itself off at this value; end-of-stream handling
    /// belongs to the playback controller.
    pub fn max_duration(&self) -> Option<f64> {
        self.max_duration
    }

    pub fn set_max_duration(&mut self, value: f64) -> Result<(), PlayerError> {
        if !value.is_finite() || value < 1.0 {
            return Err(PlayerError::InvalidDuration(value));
        }
        self.max_duration = Some(value);
        Ok(())
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
