//! Render-loop plumbing for `Player`.
//!
//! The two loops are independent threads that poll the shared status flag
//! and exit voluntarily; status transitions are the only cancellation
//! mechanism:
//! - [`video`] polls the clock and delivers newly due frames.
//! - [`audio`] slices the audio stream into frame-aligned chunks and feeds
//!   the bounded queue.

mod audio;
mod guard;
mod video;
