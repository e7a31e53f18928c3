use crate::source::AudioStreamInfo;

/// Immutable description of the audio stream being played back.
///
/// Derived once from the media source at load time and recomputed on every
/// load. `chunk_frames` is the number of audio frames covering exactly one
/// video frame, so chunk *i* of the stream lines up with video frame *i*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Bytes per sample as reported to consumers (1 or 2).
    pub nbytes: u16,
    /// Channel count (2 for stereo, 1 for mono).
    pub nchannels: u16,
    /// Sampling rate of the stream in Hz.
    pub sample_rate: u32,
    /// Audio frames per chunk.
    pub chunk_frames: u64,
    /// True when 8-bit output was requested.
    ///
    /// The decode path cannot extract 8-bit samples reliably, so extraction
    /// uses 16-bit internally and chunks are re-quantized to the 8-bit value
    /// range at production time. Consumers still see `nbytes == 1`.
    pub widened: bool,
}

impl AudioFormat {
    /// Build the format for a detected audio stream.
    pub fn from_stream(stream: AudioStreamInfo, fps: f64, requested_nbytes: Option<u16>) -> Self {
        let nbytes = requested_nbytes.unwrap_or(2);
        let widened = nbytes == 1;
        let chunk_frames = ((stream.sample_rate as f64 / fps).floor() as u64).max(1);
        Self {
            nbytes,
            nchannels: stream.nchannels,
            sample_rate: stream.sample_rate,
            chunk_frames,
            widened,
        }
    }

    /// Sample width actually requested from the media source.
    pub fn extraction_nbytes(&self) -> u16 {
        if self.widened {
            2
        } else {
            self.nbytes
        }
    }

    /// Re-quantize extracted samples to the reported width.
    ///
    /// Only does work when the 8-bit workaround is active: 16-bit values are
    /// scaled down into the signed 8-bit range.
    pub fn quantize_for_output(&self, samples: &mut [i16]) {
        if !self.widened {
            return;
        }
        for sample in samples.iter_mut() {
            *sample >>= 8;
        }
    }
}
