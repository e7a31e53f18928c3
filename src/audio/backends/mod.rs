//! Concrete sound backends.
//!
//! Backends differ in threading model: [`rodio::RodioRenderer`] drives its
//! own drain thread into an output sink, while [`null::NullRenderer`]
//! discards chunks for tests and headless runs. Both satisfy the
//! [`SoundRenderer`](super::SoundRenderer) contract.

pub mod null;
pub mod rodio;

pub use null::NullRenderer;
pub use rodio::RodioRenderer;
