//! Willow Core Library
//!
//! Audio capture, resampling, Whisper transcription, and transcript
//! formatting for the willow dictation daemon. Built on CPAL, Rubato,
//! and whisper-rs.
//!
//! # Example
//!
//! ```no_run
//! use willow_core::{AudioCapturer, CoreResult, Transcriber};
//!
//! use std::{path::PathBuf, thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let model_path = PathBuf::from("models/ggml-base.en.bin");
//!     let transcriber = Transcriber::new(&model_path, true, None)?;
//!
//!     let mut capturer = AudioCapturer::new(None)?;
//!     capturer.start()?;
//!     sleep(Duration::from_secs(3));
//!     let recording = capturer.stop()?;
//!
//!     println!("Transcribed: {}", transcriber.transcribe(recording)?);
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod text;
mod transcriber;

pub use {
    audio::{AudioBuffer, AudioCapturer},
    error::{AudioError, Result as CoreResult},
    text::{
        DEFAULT_MAX_PARAGRAPH_SENTENCES, FormattingRules, TextFormatter, default_filler_words,
        default_spoken_commands,
    },
    transcriber::Transcriber,
};

#[cfg(test)]
mod tests;
