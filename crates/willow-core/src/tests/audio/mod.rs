mod buffer;
mod capture;
mod engine;
mod resampler;
mod transcriber;
