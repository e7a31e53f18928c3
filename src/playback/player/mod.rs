//! High-level playback controller.

mod controls;
mod runtime;

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;

use crate::audio::{create_backend, AudioChunkQueue, AudioFormat, AudioTimeline, SoundRenderer};
use crate::clock::PlaybackClock;
use crate::error::PlayerError;
use crate::settings::PlaybackSettings;
use crate::source::{MediaInfo, MediaSource, VideoFrame};

/// High-level playback state of the player.
///
/// Written by the controller (and, for the end-of-stream transition, by the
/// video loop); read by both render loops, which tolerate values one
/// iteration stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No media file loaded.
    Uninitialized,
    /// File loaded and ready to start.
    Ready,
    Playing,
    Paused,
    /// Clock time passed the clip duration with looping disabled. Terminal
    /// until a seek or rewind.
    EndOfStream,
}

/// Receiver invoked from the video loop for each newly decoded frame.
///
/// Runs on the video loop's own thread; it must be fast or hand the frame
/// off explicitly.
pub type VideoFrameCallback = Box<dyn FnMut(&VideoFrame) + Send>;

/// Primary playback controller.
///
/// `Player` owns the playback clock and orchestrates the video polling loop
/// and the audio chunk pipeline as independent threads. Cloning yields a
/// handle onto the same shared playback state.
#[derive(Clone)]
pub struct Player {
    source: Arc<Mutex<Box<dyn MediaSource>>>,
    status: Arc<Mutex<PlaybackStatus>>,
    clock: Arc<Mutex<PlaybackClock>>,
    info: Arc<Mutex<Option<MediaInfo>>>,
    loaded_file: Arc<Mutex<Option<String>>>,
    settings: Arc<Mutex<PlaybackSettings>>,
    audio_format: Arc<Mutex<Option<AudioFormat>>>,
    audio_queue: Arc<Mutex<Option<AudioChunkQueue>>>,
    audio_timeline: Arc<Mutex<AudioTimeline>>,
    renderer: Arc<Mutex<Option<Box<dyn SoundRenderer>>>>,
    frame_callback: Arc<Mutex<Option<VideoFrameCallback>>>,
    current_videoframe: Arc<Mutex<Option<VideoFrame>>>,
    last_frame_no: Arc<AtomicU64>,
    loop_playback: Arc<AtomicBool>,
    loop_count: Arc<AtomicU64>,
    video_thread_exists: Arc<AtomicBool>,
    audio_thread_exists: Arc<AtomicBool>,
}

impl Player {
    /// Create an uninitialized player around a decoding collaborator.
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            status: Arc::new(Mutex::new(PlaybackStatus::Uninitialized)),
            clock: Arc::new(Mutex::new(PlaybackClock::new())),
            info: Arc::new(Mutex::new(None)),
            loaded_file: Arc::new(Mutex::new(None)),
            settings: Arc::new(Mutex::new(PlaybackSettings::default())),
            audio_format: Arc::new(Mutex::new(None)),
            audio_queue: Arc::new(Mutex::new(None)),
            audio_timeline: Arc::new(Mutex::new(AudioTimeline::empty())),
            renderer: Arc::new(Mutex::new(None)),
            frame_callback: Arc::new(Mutex::new(None)),
            current_videoframe: Arc::new(Mutex::new(None)),
            last_frame_no: Arc::new(AtomicU64::new(0)),
            loop_playback: Arc::new(AtomicBool::new(false)),
            loop_count: Arc::new(AtomicU64::new(0)),
            video_thread_exists: Arc::new(AtomicBool::new(false)),
            audio_thread_exists: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load a media file and transition to [`PlaybackStatus::Ready`].
    ///
    /// Validates that the file exists, asks the media source to open it with
    /// the requested parameters, and captures fps, duration, resolution, and
    /// the audio format. On any error the player is left in its pre-call
    /// state.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        settings: PlaybackSettings,
    ) -> Result<(), PlayerError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PlayerError::FileNotFound(path.to_path_buf()));
        }

        let info = {
            let mut source = self.source.lock().unwrap();
            source.open(path, &settings)?
        };

        // Validate before touching any state so a bad source report cannot
        // leave a half-loaded player behind.
        if !info.fps.is_finite() || info.fps < 1.0 {
            return Err(PlayerError::InvalidFps(info.fps));
        }
        if !info.duration.is_finite() || info.duration < 1.0 {
            return Err(PlayerError::InvalidDuration(info.duration));
        }

        {
            let mut clock = self.clock.lock().unwrap();
            clock.stop();
            clock.set_fps(info.fps)?;
            clock.set_max_duration(info.duration)?;
        }
        debug!("video clip duration: {}s", info.duration);
        debug!("video clip fps: {}", info.fps);

        let audio_format = if settings.play_audio {
            info.audio
                .map(|stream| AudioFormat::from_stream(stream, info.fps, settings.audio_sample_width))
        } else {
            None
        };
        if let Some(format) = audio_format {
            debug!("audio loaded: {:?}", format);
            *self.audio_queue.lock().unwrap() = Some(AudioChunkQueue::new());
        } else {
            *self.audio_queue.lock().unwrap() = None;
        }
        *self.audio_format.lock().unwrap() = audio_format;
        *self.audio_timeline.lock().unwrap() = AudioTimeline::empty();

        *self.loaded_file.lock().unwrap() = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        *self.info.lock().unwrap() = Some(info);
        self.loop_playback
            .store(settings.loop_playback, Ordering::SeqCst);
        *self.settings.lock().unwrap() = settings;
        self.loop_count.store(0, Ordering::SeqCst);
        self.last_frame_no.store(0, Ordering::SeqCst);
        *self.current_videoframe.lock().unwrap() = None;
        *self.status.lock().unwrap() = PlaybackStatus::Ready;
        debug!("loaded {}", path.display());
        Ok(())
    }

    /// Register the receiver for newly decoded video frames.
    ///
    /// Pass `None` to drop the current receiver; frames then only update the
    /// [`Self::current_videoframe`] snapshot.
    pub fn set_video_frame_callback(&mut self, callback: Option<VideoFrameCallback>) {
        *self.frame_callback.lock().unwrap() = callback;
    }

    /// Attach a sound backend and bind the shared chunk queue to it.
    ///
    /// Fails when no audio track was detected or audio was disabled on load.
    /// The backend is started together with playback in
    /// [`Self::play`](Player::play) and closed by [`Self::stop`].
    pub fn set_audio_renderer(
        &mut self,
        mut renderer: Box<dyn SoundRenderer>,
    ) -> Result<(), PlayerError> {
        let queue = self.audio_queue.lock().unwrap().clone();
        match queue {
            Some(queue) => {
                renderer.bind_queue(queue);
                *self.renderer.lock().unwrap() = Some(renderer);
                Ok(())
            }
            None => Err(PlayerError::NoAudioTrack),
        }
    }

    /// Construct the configured sound backend bound to this player's queue.
    ///
    /// Uses the `sound_backend` name from the load settings, defaulting to
    /// `"rodio"`.
    pub fn create_renderer(&self) -> Result<Box<dyn SoundRenderer>, PlayerError> {
        let format = self.audio_format().ok_or(PlayerError::NoAudioTrack)?;
        let queue = self
            .audio_queue()
            .ok_or(PlayerError::NoAudioTrack)?;
        let name = self
            .settings
            .lock()
            .unwrap()
            .sound_backend
            .clone()
            .unwrap_or_else(|| "rodio".to_string());
        create_backend(&name, format, queue)
    }

    /// Handle onto the shared chunk queue, for externally driven renderers.
    pub fn audio_queue(&self) -> Option<AudioChunkQueue> {
        self.audio_queue.lock().unwrap().clone()
    }

    /// Align the audio chunk boundaries with the current video frame.
    ///
    /// Called before playback starts, on resume from pause, and after every
    /// seek, so the next chunk extracted matches what is on screen.
    pub(in crate::playback::player) fn calculate_audio_timeline(&self) {
        let format = match *self.audio_format.lock().unwrap() {
            Some(format) => format,
            None => return,
        };
        let total_samples = {
            let info = self.info.lock().unwrap();
            match info.as_ref().and_then(|info| info.audio.map(|a| (a, info.duration))) {
                Some((stream, duration)) => (stream.sample_rate as f64 * duration) as u64,
                None => return,
            }
        };
        let start_frame = self
            .clock
            .lock()
            .unwrap()
            .current_frame()
            .unwrap_or(0);

        let mut timeline = AudioTimeline::new(total_samples, format.chunk_frames);
        timeline.realign(start_frame);
        *self.audio_timeline.lock().unwrap() = timeline;
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("file", &*self.loaded_file.lock().unwrap())
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backends::NullRenderer;
    use crate::error::SourceError;
    use crate::source::{AudioStreamInfo, VideoFrame};
    use crate::timecode::SeekTarget;

    use std::path::Path;
    use std::sync::atomic::AtomicU64;
    use std::thread;
    use std::time::{Duration, Instant};

    /// Scripted media source: frames are tiny stamped buffers, samples are a
    /// constant 16-bit value, and the first `decode_failures` sample reads
    /// fail transiently.
    struct FakeSource {
        fps: f64,
        duration: f64,
        with_audio: bool,
        decode_failures: u64,
        frames_served: Arc<AtomicU64>,
    }

    impl FakeSource {
        fn new(fps: f64, duration: f64, with_audio: bool) -> Self {
            Self {
                fps,
                duration,
                with_audio,
                decode_failures: 0,
                frames_served: Arc::new(AtomicU64::new(0)),
            }
        }
    }

    impl MediaSource for FakeSource {
        fn open(
            &mut self,
            _path: &Path,
            settings: &PlaybackSettings,
        ) -> Result<MediaInfo, SourceError> {
            Ok(MediaInfo {
                fps: self.fps,
                duration: self.duration,
                resolution: settings.target_resolution.unwrap_or((320, 240)),
                audio: self.with_audio.then_some(AudioStreamInfo {
                    sample_rate: 44100,
                    nchannels: 2,
                }),
            })
        }

        fn frame_at(&mut self, seconds: f64) -> Result<VideoFrame, SourceError> {
            self.frames_served.fetch_add(1, Ordering::SeqCst);
            Ok(VideoFrame {
                width: 320,
                height: 240,
                data: vec![(seconds * 10.0) as u8; 4],
            })
        }

        fn samples_in_range(
            &mut self,
            start: u64,
            end: u64,
            _quantized: bool,
            nbytes: u16,
        ) -> Result<Vec<i16>, SourceError> {
            assert_eq!(nbytes, 2, "extraction is always 16-bit");
            if self.decode_failures > 0 {
                self.decode_failures -= 1;
                return Err(SourceError::Decode("missing frames".to_string()));
            }
            Ok(vec![1000; ((end - start) * 2) as usize])
        }
    }

    fn loaded_player(source: FakeSource, settings: PlaybackSettings) -> Player {
        let mut player = Player::new(Box::new(source));
        let file = tempfile::NamedTempFile::new().unwrap();
        player.load(file.path(), settings).unwrap();
        player
    }

    fn wait_for(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn load_rejects_missing_files() {
        let mut player = Player::new(Box::new(FakeSource::new(25.0, 10.0, true)));
        let result = player.load("/no/such/clip.mp4", PlaybackSettings::default());
        assert!(matches!(result, Err(PlayerError::FileNotFound(_))));
        assert_eq!(player.status(), PlaybackStatus::Uninitialized);
    }

    #[test]
    fn play_requires_a_loaded_file() {
        let mut player = Player::new(Box::new(FakeSource::new(25.0, 10.0, true)));
        assert!(matches!(player.play(), Err(PlayerError::Uninitialized)));
    }

    #[test]
    fn load_captures_stream_metadata() {
        let player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings::default(),
        );
        assert_eq!(player.status(), PlaybackStatus::Ready);
        assert_eq!(player.fps(), Some(25.0));
        assert_eq!(player.duration(), Some(10.0));
        assert_eq!(player.resolution(), Some((320, 240)));
        assert!(player.loaded_file_name().is_some());

        let format = player.audio_format().unwrap();
        assert_eq!(format.nbytes, 2);
        assert_eq!(format.chunk_frames, 1764); // 44100 / 25
        assert!(player.audio_queue().is_some());
    }

    #[test]
    fn disabling_audio_leaves_no_format_or_queue() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings {
                play_audio: false,
                ..PlaybackSettings::default()
            },
        );
        assert!(player.audio_format().is_none());
        assert!(player.audio_queue().is_none());

        let renderer = NullRenderer::new(
            AudioFormat::from_stream(
                crate::source::AudioStreamInfo {
                    sample_rate: 44100,
                    nchannels: 2,
                },
                25.0,
                None,
            ),
            None,
        );
        assert!(matches!(
            player.set_audio_renderer(Box::new(renderer)),
            Err(PlayerError::NoAudioTrack)
        ));
    }

    #[test]
    fn pause_toggles_and_freezes_the_clock() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, false),
            PlaybackSettings::default(),
        );
        player.play().unwrap();
        assert!(wait_for(|| player.current_playtime() > 0.05, Duration::from_secs(2)));
        assert_eq!(player.status(), PlaybackStatus::Playing);

        player.pause();
        assert_eq!(player.status(), PlaybackStatus::Paused);
        let frozen = player.current_playtime();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(player.current_playtime(), frozen);

        player.pause();
        assert_eq!(player.status(), PlaybackStatus::Playing);
        assert!(wait_for(
            || player.current_playtime() > frozen,
            Duration::from_secs(2)
        ));

        player.stop();
        assert_eq!(player.status(), PlaybackStatus::Ready);
        assert_eq!(player.current_playtime(), 0.0);
        assert!(wait_for(
            || !player.video_thread_exists.load(Ordering::SeqCst),
            Duration::from_secs(2)
        ));
    }

    #[test]
    fn replaying_while_playing_is_a_no_op() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, false),
            PlaybackSettings::default(),
        );
        player.play().unwrap();
        assert!(wait_for(|| player.current_playtime() > 0.05, Duration::from_secs(2)));

        let before = player.current_playtime();
        player.play().unwrap();
        assert_eq!(player.status(), PlaybackStatus::Playing);
        // The clock was not reset by the second call.
        assert!(player.current_playtime() >= before);
        player.stop();
    }

    #[test]
    fn seek_aligns_frame_and_audio_timeline() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings::default(),
        );
        player.play().unwrap();
        assert!(wait_for(|| player.current_playtime() > 0.1, Duration::from_secs(2)));
        player.pause();

        player.seek(5.0);
        assert_eq!(player.status(), PlaybackStatus::Paused);
        assert_eq!(player.current_frame_no().unwrap(), 125);
        assert!((player.current_playtime() - 5.0).abs() < 0.05);

        let chunk_frames = player.audio_format().unwrap().chunk_frames;
        let first_boundary = player.audio_timeline.lock().unwrap().first_boundary();
        assert!(first_boundary.unwrap() >= 125 * chunk_frames);

        player.stop();
    }

    #[test]
    fn seek_accepts_all_timestamp_forms() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 7200.0, false),
            PlaybackSettings::default(),
        );
        player.seek(15.4);
        assert_eq!(player.current_playtime(), 15.4);

        player.seek((1, 21.5));
        assert_eq!(player.current_playtime(), 81.5);

        player.seek("01:01:33.5".parse::<SeekTarget>().unwrap());
        assert_eq!(player.current_playtime(), 3693.5);

        // Values below the floor clamp to 0.5.
        player.seek(0.0);
        assert_eq!(player.current_playtime(), 0.5);
    }

    #[test]
    fn looping_wraps_once_per_end_of_stream() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 1.0, false),
            PlaybackSettings {
                loop_playback: true,
                ..PlaybackSettings::default()
            },
        );
        player.play().unwrap();

        assert!(wait_for(|| player.loop_count() == 1, Duration::from_secs(5)));
        assert!(wait_for(
            || player.status() == PlaybackStatus::Playing,
            Duration::from_secs(2)
        ));
        // Clock restarted from the rewind position, not from the old time.
        let time = player.current_playtime();
        assert!((0.5..1.0).contains(&time), "clock at {}", time);

        player.stop();
    }

    #[test]
    fn end_of_stream_is_terminal_until_a_seek() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 1.0, false),
            PlaybackSettings::default(),
        );
        player.play().unwrap();
        assert!(wait_for(
            || player.status() == PlaybackStatus::EndOfStream,
            Duration::from_secs(5)
        ));
        assert!(wait_for(
            || !player.video_thread_exists.load(Ordering::SeqCst),
            Duration::from_secs(2)
        ));

        // Still terminal: play is a warning no-op.
        player.play().unwrap();
        assert_eq!(player.status(), PlaybackStatus::EndOfStream);

        player.rewind();
        assert_eq!(player.status(), PlaybackStatus::Ready);
        player.play().unwrap();
        assert!(wait_for(
            || player.status() == PlaybackStatus::Playing,
            Duration::from_secs(2)
        ));
        player.stop();
    }

    #[test]
    fn queue_stays_within_capacity_without_a_consumer() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings::default(),
        );
        player.play().unwrap();
        let queue = player.audio_queue().unwrap();

        assert!(wait_for(|| queue.len() == queue.capacity(), Duration::from_secs(2)));
        thread::sleep(Duration::from_millis(100));
        assert!(queue.len() <= queue.capacity());

        player.stop();
    }

    #[test]
    fn eight_bit_chunks_are_requantized() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings {
                audio_sample_width: Some(1),
                ..PlaybackSettings::default()
            },
        );
        let format = player.audio_format().unwrap();
        assert_eq!(format.nbytes, 1);
        assert!(format.widened);

        player.play().unwrap();
        let queue = player.audio_queue().unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut chunk = None;
        while chunk.is_none() && Instant::now() < deadline {
            chunk = queue.pop_timeout(Duration::from_millis(20));
        }
        let chunk = chunk.expect("no chunk produced");
        // The source returned 1000; scaled into the 8-bit range that is 3.
        assert!(chunk.samples.iter().all(|s| *s == 3));
        assert_eq!(chunk.samples.len() as u64, chunk.frames * 2);

        player.stop();
    }

    #[test]
    fn transient_decode_errors_skip_chunks() {
        let mut source = FakeSource::new(25.0, 10.0, true);
        source.decode_failures = 2;
        let mut player = loaded_player(source, PlaybackSettings::default());
        player.play().unwrap();

        let queue = player.audio_queue().unwrap();
        // Chunks still arrive once the bad reads are skipped.
        assert!(wait_for(|| !queue.is_empty(), Duration::from_secs(2)));

        player.stop();
    }

    #[test]
    fn attached_renderer_drains_during_playback() {
        let mut player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings::default(),
        );
        let renderer = NullRenderer::new(player.audio_format().unwrap(), None);
        let consumed = renderer.consumed_handle();
        player.set_audio_renderer(Box::new(renderer)).unwrap();

        player.play().unwrap();
        assert!(wait_for(
            || consumed.load(Ordering::Relaxed) >= 3,
            Duration::from_secs(2)
        ));
        player.stop();
    }

    #[test]
    fn configured_backend_is_constructed_from_the_registry() {
        let player = loaded_player(
            FakeSource::new(25.0, 10.0, true),
            PlaybackSettings {
                sound_backend: Some("null".to_string()),
                ..PlaybackSettings::default()
            },
        );
        let mut renderer = player.create_renderer().unwrap();
        renderer.start().unwrap();
        renderer.close_stream();
    }

    #[test]
    fn frame_callback_receives_frames() {
        let source = FakeSource::new(25.0, 10.0, false);
        let frames_served = source.frames_served.clone();
        let mut player = loaded_player(source, PlaybackSettings::default());

        let delivered = Arc::new(AtomicU64::new(0));
        let counter = delivered.clone();
        player.set_video_frame_callback(Some(Box::new(move |frame| {
            assert_eq!((frame.width, frame.height), (320, 240));
            counter.fetch_add(1, Ordering::SeqCst);
        })));

        player.play().unwrap();
        assert!(wait_for(
            || delivered.load(Ordering::SeqCst) >= 2,
            Duration::from_secs(2)
        ));
        assert!(frames_served.load(Ordering::SeqCst) >= 2);
        assert!(player.current_videoframe().is_some());
        player.stop();
    }
}
