//! Load-time playback configuration.

use serde::{Deserialize, Serialize};

/// Settings controlling how a media file is opened and played back.
///
/// All fields have defaults so embedders can deserialize partial JSON
/// documents, e.g. `{"audio_sample_width": 1, "loop_playback": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether the audio track (if any) should be played.
    pub play_audio: bool,
    /// Whether playback restarts from the beginning at end-of-stream.
    pub loop_playback: bool,
    /// Optional decode resolution hint `(width, height)` passed to the source.
    pub target_resolution: Option<(u32, u32)>,
    /// Requested audio sample rate in Hz; source default when `None`.
    pub audio_sample_rate: Option<u32>,
    /// Requested bytes per audio sample (1 or 2); source default when `None`.
    ///
    /// Requesting 1 byte engages the 8-bit workaround: samples are extracted
    /// as 16-bit internally and re-quantized on the way to the renderer.
    pub audio_sample_width: Option<u16>,
    /// Requested channel count; source default when `None`.
    pub audio_channels: Option<u16>,
    /// Preferred sound backend name for [`crate::create_backend`].
    pub sound_backend: Option<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            play_audio: true,
            loop_playback: false,
            target_resolution: None,
            audio_sample_rate: None,
            audio_sample_width: None,
            audio_channels: None,
            sound_backend: None,
        }
    }
}

impl PlaybackSettings {
    /// Parse settings from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
