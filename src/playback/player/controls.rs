//! Transport and lifecycle operations for `Player`.
//!
//! Methods here move the playback state machine and expose the observable
//! properties. The render loops themselves live in [`super::runtime`].

use std::sync::atomic::Ordering;

use log::{debug, warn};

use crate::audio::AudioFormat;
use crate::error::PlayerError;
use crate::source::VideoFrame;
use crate::timecode::SeekTarget;

use super::{PlaybackStatus, Player};

impl Player {
    /// Start playback.
    ///
    /// The render loops run on their own threads, so this returns
    /// immediately. Calling `play` while already playing or paused is an
    /// idempotent no-op with a warning; at end-of-stream a seek or rewind is
    /// required first.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        let status = self.status();
        if status == PlaybackStatus::Uninitialized || self.info.lock().unwrap().is_none() {
            return Err(PlayerError::Uninitialized);
        }
        if status == PlaybackStatus::EndOfStream {
            warn!("end of stream has already been reached; seek or rewind first");
            return Ok(());
        }
        if matches!(status, PlaybackStatus::Playing | PlaybackStatus::Paused) {
            warn!("playback already started");
            return Ok(());
        }
        // Liveness check: loops from a previous run may still be winding
        // down; never spawn duplicates.
        if self.video_thread_exists.load(Ordering::SeqCst)
            || self.audio_thread_exists.load(Ordering::SeqCst)
        {
            warn!("render loops already running");
            return Ok(());
        }

        *self.status.lock().unwrap() = PlaybackStatus::Playing;
        self.last_frame_no.store(0, Ordering::SeqCst);

        if self.audio_format.lock().unwrap().is_some() {
            // Chop the stream into frame-length chunks so chunk indices line
            // up with video frame numbers.
            self.calculate_audio_timeline();
            if let Some(renderer) = self.renderer.lock().unwrap().as_mut() {
                renderer.start()?;
            }
            self.spawn_audio_thread();
        }
        self.spawn_video_thread();
        Ok(())
    }

    /// Pause or resume playback.
    ///
    /// This is a toggle, mirroring the clock's own pause duality: resuming
    /// from pause first realigns the audio timeline with the (possibly
    /// drifted) video frame position.
    pub fn pause(&mut self) {
        let status = self.status();
        match status {
            PlaybackStatus::Paused => {
                debug!("resuming playback");
                self.calculate_audio_timeline();
                *self.status.lock().unwrap() = PlaybackStatus::Playing;
                self.clock.lock().unwrap().pause();
            }
            PlaybackStatus::Playing => {
                debug!("pausing playback");
                *self.status.lock().unwrap() = PlaybackStatus::Paused;
                self.clock.lock().unwrap().pause();
            }
            _ => warn!("pause ignored; nothing is playing"),
        }
    }

    /// Stop playback and reset the clock.
    ///
    /// The render loops observe the status change and exit on their own;
    /// there is no forced interruption.
    pub fn stop(&mut self) {
        debug!("stopping playback");
        self.clock.lock().unwrap().stop();
        *self.status.lock().unwrap() = PlaybackStatus::Ready;
        if let Some(renderer) = self.renderer.lock().unwrap().as_mut() {
            renderer.close_stream();
        }
    }

    /// Seek to the given position.
    ///
    /// Accepts seconds, `(min, sec)` / `(hr, min, sec)` tuples, or a parsed
    /// timestamp string (see [`SeekTarget`]). The position is floored at
    /// 0.5 seconds. Seeking from end-of-stream returns the player to
    /// [`PlaybackStatus::Ready`].
    pub fn seek(&mut self, target: impl Into<SeekTarget>) {
        let seconds = target.into().as_seconds();
        // Toggle out of (and later back into) the current run state.
        self.pause();
        {
            let mut clock = self.clock.lock().unwrap();
            clock.set_time(seconds);
            debug!(
                "seeking to {} seconds; frame {}",
                clock.time(),
                clock.current_frame().unwrap_or(0)
            );
        }
        if self.audio_format.lock().unwrap().is_some() {
            self.calculate_audio_timeline();
        }
        self.pause();

        let mut status = self.status.lock().unwrap();
        if *status == PlaybackStatus::EndOfStream {
            *status = PlaybackStatus::Ready;
        }
    }

    /// Rewind to the beginning.
    ///
    /// Convenience for `seek(0.5)`; frame 0 cannot be sampled reliably.
    pub fn rewind(&mut self) {
        self.seek(0.5);
    }

    /// Current playback state.
    pub fn status(&self) -> PlaybackStatus {
        *self.status.lock().unwrap()
    }

    /// The clock's current runtime in seconds.
    pub fn current_playtime(&self) -> f64 {
        self.clock.lock().unwrap().time()
    }

    /// Current video frame number.
    pub fn current_frame_no(&self) -> Result<u64, PlayerError> {
        self.clock.lock().unwrap().current_frame()
    }

    /// Duration of a single video frame in seconds.
    pub fn frame_interval(&self) -> Result<f64, PlayerError> {
        self.clock.lock().unwrap().frame_interval()
    }

    /// How many times playback wrapped around at end-of-stream.
    pub fn loop_count(&self) -> u64 {
        self.loop_count.load(Ordering::SeqCst)
    }

    /// Whether playback restarts at end-of-stream.
    pub fn looping(&self) -> bool {
        self.loop_playback.load(Ordering::SeqCst)
    }

    pub fn set_loop(&mut self, value: bool) {
        self.loop_playback.store(value, Ordering::SeqCst);
    }

    /// Clip duration in seconds, once a file is loaded.
    pub fn duration(&self) -> Option<f64> {
        self.info.lock().unwrap().as_ref().map(|info| info.duration)
    }

    /// Frame rate of the loaded clip.
    pub fn fps(&self) -> Option<f64> {
        self.info.lock().unwrap().as_ref().map(|info| info.fps)
    }

    /// Pixel size of decoded frames.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.info.lock().unwrap().as_ref().map(|info| info.resolution)
    }

    /// Audio stream format; `None` when no track was detected or audio was
    /// disabled on load.
    pub fn audio_format(&self) -> Option<AudioFormat> {
        *self.audio_format.lock().unwrap()
    }

    /// File name (without directory) of the loaded media file.
    pub fn loaded_file_name(&self) -> Option<String> {
        self.loaded_file.lock().unwrap().clone()
    }

    /// Snapshot of the most recently delivered video frame.
    pub fn current_videoframe(&self) -> Option<VideoFrame> {
        self.current_videoframe.lock().unwrap().clone()
    }
}
