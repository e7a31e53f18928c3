//! # Mediasync
//!
//! Playback-synchronization engine for frame-accurate, audio/video-synced
//! presentation of an already-decoded media stream. Decoding itself is
//! delegated to a [`MediaSource`] collaborator; this crate keeps a
//! wall-clock playback position consistent across the logical clock, the
//! video polling loop, and the audio chunk pipeline.

pub mod audio;
pub mod clock;
mod constants;
pub mod error;
pub mod playback;
pub mod settings;
pub mod source;
pub mod timecode;

pub use audio::{
    available_backends, create_backend, AudioChunk, AudioChunkQueue, AudioFormat, AudioTimeline,
    SoundRenderer,
};
pub use clock::{ClockState, PlaybackClock};
pub use error::{PlayerError, SourceError};
pub use playback::player::{PlaybackStatus, Player, VideoFrameCallback};
pub use settings::PlaybackSettings;
pub use source::{AudioStreamInfo, MediaInfo, MediaSource, VideoFrame};
pub use timecode::SeekTarget;
