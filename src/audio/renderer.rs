//! Pluggable sound-output contract and the backend registry.

use std::sync::OnceLock;

use log::warn;

use crate::audio::backends::null::NullRenderer;
use crate::audio::backends::rodio::RodioRenderer;
use crate::audio::{AudioChunkQueue, AudioFormat};
use crate::error::PlayerError;

/// Capability every concrete sound backend must satisfy.
///
/// A renderer is constructed against an [`AudioFormat`] and (optionally) the
/// shared chunk queue; the player binds its own queue when the renderer is
/// attached. Draining contract: repeatedly take the next chunk with a
/// bounded wait and play it; a momentary underrun means emit silence or wait,
/// never a crash of the run loop.
pub trait SoundRenderer: Send {
    /// Bind the queue the renderer drains.
    fn bind_queue(&mut self, queue: AudioChunkQueue);

    /// Begin consuming chunks. Fails if no queue was bound.
    fn start(&mut self) -> Result<(), PlayerError>;

    /// Request graceful shutdown; subsequent playback attempts stop without
    /// panicking out of the renderer's own run loop.
    fn close_stream(&mut self);
}

static AVAILABLE_BACKENDS: OnceLock<Vec<&'static str>> = OnceLock::new();

/// Names of sound backends whose availability probe succeeded.
///
/// Probing happens once per process; a backend that fails its probe is
/// logged as a warning and simply absent from the registry.
pub fn available_backends() -> &'static [&'static str] {
    AVAILABLE_BACKENDS.get_or_init(|| {
        let mut found = Vec::new();
        if RodioRenderer::probe() {
            found.push("rodio");
        } else {
            warn!("rodio sound backend unavailable: no default output stream");
        }
        // The discard backend has no device requirements.
        found.push("null");
        found
    })
}

/// Construct a registered backend bound to `format` and `queue`.
pub fn create_backend(
    name: &str,
    format: AudioFormat,
    queue: AudioChunkQueue,
) -> Result<Box<dyn SoundRenderer>, PlayerError> {
    if !available_backends().contains(&name) {
        return Err(PlayerError::UnknownBackend(name.to_string()));
    }
    match name {
        "rodio" => Ok(Box::new(RodioRenderer::new(format, Some(queue)))),
        "null" => Ok(Box::new(NullRenderer::new(format, Some(queue)))),
        other => Err(PlayerError::UnknownBackend(other.to_string())),
    }
}
