use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, Sender, SendTimeoutError};

use crate::constants::AUDIO_QUEUE_CAPACITY;

/// One frame-aligned slice of interleaved audio samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    /// Interleaved samples, already quantized to the reported width.
    pub samples: Vec<i16>,
    /// Audio frames in this chunk (`samples.len() / nchannels`).
    pub frames: u64,
}

/// Bounded buffer between the audio loop and the sound renderer.
///
/// Fixed capacity of [`AUDIO_QUEUE_CAPACITY`] chunks, exactly one producer
/// and one consumer. Both sides use timeouts so a full or empty queue never
/// deadlocks the pipeline: the producer re-checks playback status on a full
/// queue, the consumer treats an empty queue as a momentary underrun.
#[derive(Debug, Clone)]
pub struct AudioChunkQueue {
    tx: Sender<AudioChunk>,
    rx: Receiver<AudioChunk>,
}

impl AudioChunkQueue {
    pub fn new() -> Self {
        let (tx, rx) = bounded(AUDIO_QUEUE_CAPACITY);
        Self { tx, rx }
    }

    /// Enqueue a chunk, waiting at most `timeout` for space.
    ///
    /// A full queue hands the chunk back so the producer can retry on its
    /// next iteration.
    pub fn push_timeout(&self, chunk: AudioChunk, timeout: Duration) -> Result<(), AudioChunk> {
        match self.tx.send_timeout(chunk, timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(chunk)) | Err(SendTimeoutError::Disconnected(chunk)) => {
                Err(chunk)
            }
        }
    }

    /// Dequeue the next chunk, waiting at most `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<AudioChunk> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        AUDIO_QUEUE_CAPACITY
    }
}

impl Default for AudioChunkQueue {
    fn default() -> Self {
        Self::new()
    }
}
