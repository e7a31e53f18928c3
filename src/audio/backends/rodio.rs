//! Thread-driven sound backend built on rodio.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamBuilder, Sink};

use crate::audio::renderer::SoundRenderer;
use crate::audio::{AudioChunkQueue, AudioFormat};
use crate::constants::QUEUE_GET_TIMEOUT_MS;
use crate::error::PlayerError;

/// Chunks the sink may hold before the drain thread stops appending.
///
/// The shared queue already bounds decode-ahead; this bounds the sink's own
/// backlog so pause and shutdown stay responsive.
const MAX_SINK_CHUNKS: usize = 3;

/// Sound backend that drains the chunk queue from its own background thread
/// into a `rodio::Sink`.
pub struct RodioRenderer {
    format: AudioFormat,
    queue: Option<AudioChunkQueue>,
    keep_listening: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RodioRenderer {
    pub fn new(format: AudioFormat, queue: Option<AudioChunkQueue>) -> Self {
        Self {
            format,
            queue,
            keep_listening: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Availability probe used by the backend registry.
    pub(crate) fn probe() -> bool {
        OutputStreamBuilder::open_default_stream().is_ok()
    }
}

impl SoundRenderer for RodioRenderer {
    fn bind_queue(&mut self, queue: AudioChunkQueue) {
        self.queue = Some(queue);
    }

    fn start(&mut self) -> Result<(), PlayerError> {
        let queue = self.queue.clone().ok_or(PlayerError::NoQueueBound)?;
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("rodio renderer already running");
            return Ok(());
        }

        self.keep_listening.store(true, Ordering::SeqCst);
        let keep_listening = self.keep_listening.clone();
        let format = self.format;
        self.handle = Some(thread::spawn(move || {
            run_drain_loop(format, queue, keep_listening)
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

impl Drop for RodioRenderer {
    fn drop(&mut self) {
        self.close_stream();
    }
}

/// Drain the queue into a freshly opened output sink until told to stop.
fn run_drain_loop(format: AudioFormat, queue: AudioChunkQueue, keep_listening: Arc<AtomicBool>) {
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(stream) => stream,
        Err(err) => {
            error!("failed to open default output stream: {}", err);
            return;
        }
    };
    let sink = Sink::connect_new(stream.mixer());
    debug!("rodio drain loop started");

    // Scale back to [-1, 1] from whichever integer range the chunks carry.
    let scale: f32 = if format.nbytes == 1 { 1.0 / 128.0 } else { 1.0 / 32768.0 };

    while keep_listening.load(Ordering::SeqCst) {
        if sink.len() >= MAX_SINK_CHUNKS {
            // Let queued audio play out before appending more.
            thread::sleep(Duration::from_millis(QUEUE_GET_TIMEOUT_MS));
            continue;
        }

        let chunk = match queue.pop_timeout(Duration::from_millis(QUEUE_GET_TIMEOUT_MS)) {
            Some(chunk) => chunk,
            // Momentary underrun; the sink keeps playing what it has.
            None => continue,
        };

        let samples: Vec<f32> = chunk.samples.iter().map(|s| *s as f32 * scale).collect();
        sink.append(SamplesBuffer::new(
            format.nchannels,
            format.sample_rate,
            samples,
        ));
    }

    sink.stop();
    debug!("rodio drain loop stopped");
}
