//! Playback control: the public state machine and its render loops.

pub mod player;

pub use player::{PlaybackStatus, Player};
