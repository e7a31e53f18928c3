//! Shared constants for playback timing and buffering defaults.

/// Capacity of the shared audio chunk queue.
///
/// One producer (the audio loop) and one consumer (the sound renderer)
/// share the queue; three frame-length chunks of headroom is enough to
/// absorb scheduling jitter without adding audible latency.
pub const AUDIO_QUEUE_CAPACITY: usize = 3;

/// Sleep between video-loop iterations, in milliseconds.
pub const VIDEO_POLL_MS: u64 = 5;

/// Sleep between audio-loop iterations, in milliseconds.
pub const AUDIO_POLL_MS: u64 = 5;

/// Backoff when the audio timeline is momentarily exhausted, in milliseconds.
pub const TIMELINE_RETRY_MS: u64 = 20;

/// How long the audio loop waits for queue space before retrying, in
/// milliseconds. Keeps the loop responsive to status changes while the
/// queue is full.
pub const QUEUE_PUT_TIMEOUT_MS: u64 = 50;

/// How long renderers wait for the next chunk before treating the queue as
/// momentarily empty, in milliseconds.
pub const QUEUE_GET_TIMEOUT_MS: u64 = 10;

/// Lowest timestamp a seek may land on, in seconds.
///
/// Sampling frame 0 exactly is unreliable in the underlying decode path,
/// so seeks are floored here.
pub const MIN_SEEK_SECONDS: f64 = 0.5;
