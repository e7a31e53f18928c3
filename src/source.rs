//! External media-source collaborator contract.
//!
//! The engine never decodes anything itself. A [`MediaSource`] opens a file,
//! reports its static metadata, and serves video frames by timestamp and
//! audio samples by index range.

use std::path::Path;

use crate::error::SourceError;
use crate::settings::PlaybackSettings;

/// A decoded video frame (interleaved RGB24).
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Audio stream properties reported by the source at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStreamInfo {
    /// Sampling rate in Hz.
    pub sample_rate: u32,
    /// Channel count (1 mono, 2 stereo).
    pub nchannels: u16,
}

/// Static metadata captured when a file is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Frames per second of the video stream.
    pub fps: f64,
    /// Clip duration in seconds.
    pub duration: f64,
    /// Pixel size of decoded frames `(width, height)`.
    pub resolution: (u32, u32),
    /// Audio stream parameters, `None` when the clip carries no audio track.
    pub audio: Option<AudioStreamInfo>,
}

/// Decoding collaborator the playback engine drives.
///
/// `frame_at` and `samples_in_range` may fail transiently (bad streams with
/// missing frames do exist); the engine logs and skips rather than aborting
/// playback.
pub trait MediaSource: Send {
    /// Open `path` with the requested decode parameters.
    fn open(&mut self, path: &Path, settings: &PlaybackSettings)
        -> Result<MediaInfo, SourceError>;

    /// Decode the video frame covering `seconds`.
    fn frame_at(&mut self, seconds: f64) -> Result<VideoFrame, SourceError>;

    /// Extract interleaved samples for the index range `start..end`.
    ///
    /// `nbytes` selects the extraction width (2 for 16-bit); `quantized`
    /// requests integer-range output. The engine always passes an effective
    /// width of 2 when the 8-bit workaround is active and re-quantizes the
    /// result itself.
    fn samples_in_range(
        &mut self,
        start: u64,
        end: u64,
        quantized: bool,
        nbytes: u16,
    ) -> Result<Vec<i16>, SourceError>;
}
