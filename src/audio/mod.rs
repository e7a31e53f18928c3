//! Audio chunking, queueing, and sound-output contracts.

pub mod backends;
mod format;
mod queue;
mod renderer;
mod timeline;

pub use format::AudioFormat;
pub use queue::{AudioChunk, AudioChunkQueue};
pub use renderer::{available_backends, create_backend, SoundRenderer};
pub use timeline::AudioTimeline;
