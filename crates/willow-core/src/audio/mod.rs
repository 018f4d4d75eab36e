pub(crate) mod buffer;
pub(crate) mod capture;
mod engine;
mod resampler;

pub(crate) use {engine::SttEngine, resampler::Resampler};

pub use {buffer::AudioBuffer, capture::AudioCapturer};
