//! Video render loop.

use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::constants::VIDEO_POLL_MS;
use crate::playback::player::{PlaybackStatus, Player};

use super::guard::RenderThreadGuard;

impl Player {
    /// Spawn the video loop on its own thread.
    pub(in crate::playback::player) fn spawn_video_thread(&self) {
        self.video_thread_exists.store(true, Ordering::SeqCst);
        let player = self.clone();
        thread::spawn(move || run_video_loop(player));
    }

    /// Fetch the frame at the current clock time and hand it to the
    /// registered callback, updating the observable snapshot.
    fn render_videoframe(&mut self) {
        let time = self.clock.lock().unwrap().time();
        let frame = {
            let mut source = self.source.lock().unwrap();
            source.frame_at(time)
        };
        match frame {
            Ok(frame) => {
                if let Some(callback) = self.frame_callback.lock().unwrap().as_mut() {
                    callback(&frame);
                }
                *self.current_videoframe.lock().unwrap() = Some(frame);
            }
            // Transient; the next due frame will be tried as usual.
            Err(err) => warn!("video decoding error at {:.3}s: {}", time, err),
        }
    }
}

/// Main video polling loop.
///
/// Renders the frame at time zero, starts the clock, then keeps checking
/// whether a new frame has become due. Owns the end-of-stream decision:
/// rewind-and-count when looping, terminal [`PlaybackStatus::EndOfStream`]
/// otherwise.
fn run_video_loop(mut player: Player) {
    let _guard = RenderThreadGuard::new(player.video_thread_exists.clone());

    // First frame goes out before the clock starts ticking.
    player.render_videoframe();
    player.clock.lock().unwrap().start();
    debug!("started rendering loop");

    let duration = player.duration().unwrap_or(0.0);

    while matches!(
        player.status(),
        PlaybackStatus::Playing | PlaybackStatus::Paused
    ) {
        let (time, current_frame_no) = {
            let clock = player.clock.lock().unwrap();
            (clock.time(), clock.current_frame().unwrap_or(0))
        };

        if time >= duration {
            debug!("end of stream reached at {}", time);
            if player.looping() {
                debug!("looping: restarting stream");
                player.rewind();
                player.loop_count.fetch_add(1, Ordering::SeqCst);
            } else {
                *player.status.lock().unwrap() = PlaybackStatus::EndOfStream;
                break;
            }
        }

        if player.last_frame_no.load(Ordering::SeqCst) != current_frame_no {
            // A new frame is due; get it from the stream.
            player.render_videoframe();
        }
        player.last_frame_no.store(current_frame_no, Ordering::SeqCst);

        // Give the other loops some breathing space.
        thread::sleep(Duration::from_millis(VIDEO_POLL_MS));
    }

    player.clock.lock().unwrap().stop();
    debug!("rendering stopped");
}
