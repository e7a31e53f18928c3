//! Drain-and-discard backend for tests and headless runs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use crate::audio::renderer::SoundRenderer;
use crate::audio::{AudioChunkQueue, AudioFormat};
use crate::constants::QUEUE_GET_TIMEOUT_MS;
use crate::error::PlayerError;

/// Sound backend that consumes chunks at queue pace and discards them.
///
/// Always available; used when no output device exists and by tests that
/// need a live consumer on the queue.
pub struct NullRenderer {
    #[allow(dead_code)]
    format: AudioFormat,
    queue: Option<AudioChunkQueue>,
    keep_listening: Arc<AtomicBool>,
    consumed: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl NullRenderer {
    pub fn new(format: AudioFormat, queue: Option<AudioChunkQueue>) -> Self {
        Self {
            format,
            queue,
            keep_listening: Arc::new(AtomicBool::new(false)),
            consumed: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Shared counter of chunks taken off the queue so far.
    pub fn consumed_handle(&self) -> Arc<AtomicU64> {
        self.consumed.clone()
    }
}

impl SoundRenderer for NullRenderer {
    fn bind_queue(&mut self, queue: AudioChunkQueue) {
        self.queue = Some(queue);
    }

    fn start(&mut self) -> Result<(), PlayerError> {
        let queue = self.queue.clone().ok_or(PlayerError::NoQueueBound)?;
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("null renderer already running");
            return Ok(());
        }

        self.keep_listening.store(true, Ordering::SeqCst);
        let keep_listening = self.keep_listening.clone();
        let consumed = self.consumed.clone();
        self.handle = Some(thread::spawn(move || {
            while keep_listening.load(Ordering::SeqCst) {
                if queue
                    .pop_timeout(Duration::from_millis(QUEUE_GET_TIMEOUT_MS))
                    .is_some()
                {
                    consumed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
        Ok(())
    }

    fn close_stream(&mut self) {
        self.keep_listening.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for NullRenderer {
    fn drop(&mut self) {
        self.close_stream();
    }
}
