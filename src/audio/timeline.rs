use std::collections::VecDeque;

/// Frame-aligned sample boundaries for the audio stream.
///
/// Boundaries are consumed front to back: chunk *i* spans boundary *i* to
/// boundary *i+1* and corresponds to video frame *i*. The timeline is
/// regenerated on seek and on resume from pause so audio extraction realigns
/// with the current video frame.
#[derive(Debug, Clone, Default)]
pub struct AudioTimeline {
    boundaries: VecDeque<u64>,
}

impl AudioTimeline {
    /// Slice `total_samples` into chunks of `chunk_frames` frames.
    pub fn new(total_samples: u64, chunk_frames: u64) -> Self {
        let mut boundaries: VecDeque<u64> = (0..total_samples)
            .step_by(chunk_frames.max(1) as usize)
            .collect();
        boundaries.push_back(total_samples);
        Self { boundaries }
    }

    /// An exhausted timeline, the state before any file is loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Drop the leading `start_frame` boundaries so the next chunk produced
    /// lines up with video frame `start_frame`.
    pub fn realign(&mut self, start_frame: u64) {
        for _ in 0..start_frame {
            if self.boundaries.pop_front().is_none() {
                break;
            }
        }
    }

    /// Pop the next chunk's sample range.
    ///
    /// Returns `None` on exhaustion, which is an expected transient near
    /// end-of-stream or immediately after a seek.
    pub fn next_span(&mut self) -> Option<(u64, u64)> {
        let start = self.boundaries.pop_front()?;
        let end = *self.boundaries.front()?;
        Some((start, end))
    }

    /// First unconsumed boundary, if any.
    pub fn first_boundary(&self) -> Option<u64> {
        self.boundaries.front().copied()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}
