use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Error type for media source collaborators.
#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    Decode(String),
    Unsupported(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Decode(err) => write!(f, "decode error: {}", err),
            Self::Unsupported(what) => write!(f, "unsupported stream: {}", what),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Error type for playback control operations.
///
/// These are precondition and resource errors surfaced synchronously to the
/// caller; none of them leaves the player in a partially mutated state.
#[derive(Debug)]
pub enum PlayerError {
    /// Operation requires a loaded file.
    Uninitialized,
    /// The requested media file does not exist.
    FileNotFound(PathBuf),
    /// No audio track was detected, or audio playback was disabled on load.
    NoAudioTrack,
    /// A renderer was started before a queue was bound to it.
    NoQueueBound,
    /// Frame rate must be a finite value of at least 1.0.
    InvalidFps(f64),
    /// Stream duration must be a finite value of at least 1.0 seconds.
    InvalidDuration(f64),
    /// Frame arithmetic was requested before a frame rate was set.
    FpsUnset,
    /// The named sound backend is not registered on this system.
    UnknownBackend(String),
    /// A timestamp string could not be parsed.
    InvalidTimecode(String),
    /// The media source collaborator failed.
    Source(SourceError),
}

impl Display for PlayerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "player uninitialized or no file loaded"),
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::NoAudioTrack => write!(
                f,
                "no file has been loaded, no audio track was detected, or audio was disabled"
            ),
            Self::NoQueueBound => write!(f, "audio queue is not initialized"),
            Self::InvalidFps(fps) => {
                write!(f, "fps needs to be a finite value of at least 1.0, got {}", fps)
            }
            Self::InvalidDuration(duration) => write!(
                f,
                "duration needs to be a finite value of at least 1.0 seconds, got {}",
                duration
            ),
            Self::FpsUnset => write!(f, "fps not set so frame arithmetic is unavailable"),
            Self::UnknownBackend(name) => write!(f, "unknown or unavailable sound backend: {}", name),
            Self::InvalidTimecode(raw) => write!(f, "invalid timecode: {:?}", raw),
            Self::Source(err) => write!(f, "media source error: {}", err),
        }
    }
}

impl std::error::Error for PlayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SourceError> for PlayerError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}
