//! Audio chunk production loop.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::audio::{AudioChunk, AudioFormat};
use crate::constants::{AUDIO_POLL_MS, QUEUE_PUT_TIMEOUT_MS, TIMELINE_RETRY_MS};
use crate::playback::player::{PlaybackStatus, Player};

use super::guard::RenderThreadGuard;

impl Player {
    /// Spawn the audio loop on its own thread.
    pub(in crate::playback::player) fn spawn_audio_thread(&self) {
        self.audio_thread_exists.store(true, Ordering::SeqCst);
        let player = self.clone();
        thread::spawn(move || run_audio_loop(player));
    }
}

/// Producer side of the audio pipeline.
///
/// Extracts frame-aligned chunks while the player is Playing and feeds the
/// bounded queue. At most one chunk is held pending an enqueue; a full queue
/// means try again next iteration, which also re-checks the status.
fn run_audio_loop(player: Player) {
    let _guard = RenderThreadGuard::new(player.audio_thread_exists.clone());
    debug!("started audio rendering thread");

    let (format, queue) = match (player.audio_format(), player.audio_queue()) {
        (Some(format), Some(queue)) => (format, queue),
        _ => return,
    };

    let mut pending: Option<AudioChunk> = None;

    while matches!(
        player.status(),
        PlaybackStatus::Playing | PlaybackStatus::Paused
    ) {
        if player.status() == PlaybackStatus::Playing {
            if pending.is_none() {
                pending = produce_chunk(&player, &format);
                if pending.is_none() {
                    // Expected near end-of-stream or right after a seek;
                    // back off and retry.
                    thread::sleep(Duration::from_millis(TIMELINE_RETRY_MS));
                    continue;
                }
            }

            if let Some(chunk) = pending.take() {
                if let Err(chunk) =
                    queue.push_timeout(chunk, Duration::from_millis(QUEUE_PUT_TIMEOUT_MS))
                {
                    // Queue full; keep the chunk for the next pass.
                    pending = Some(chunk);
                }
            }
        }

        thread::sleep(Duration::from_millis(AUDIO_POLL_MS));
    }

    debug!("stopped audio rendering thread");
}

/// Extract the next frame-aligned chunk from the media source.
///
/// Returns `None` when the timeline is exhausted or the source failed
/// transiently; a decode failure skips that chunk rather than aborting the
/// pipeline.
fn produce_chunk(player: &Player, format: &AudioFormat) -> Option<AudioChunk> {
    let span = player.audio_timeline.lock().unwrap().next_span();
    let (start, end) = match span {
        Some(span) => span,
        None => {
            debug!("audio times could not be obtained");
            return None;
        }
    };

    let extracted = {
        let mut source = player.source.lock().unwrap();
        source.samples_in_range(start, end, true, format.extraction_nbytes())
    };
    match extracted {
        Ok(mut samples) => {
            format.quantize_for_output(&mut samples);
            Some(AudioChunk {
                samples,
                frames: end - start,
            })
        }
        Err(err) => {
            warn!("sound decoding error: {}", err);
            None
        }
    }
}
