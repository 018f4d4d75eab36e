use crate::{
    AudioError, CoreResult,
    audio::{AudioBuffer, Resampler, SttEngine},
};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Sample rate Whisper models expect.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// The speech-to-text boundary: takes one sealed [`AudioBuffer`] and
/// returns the raw transcript.
///
/// Downmixes to mono and resamples to 16kHz before handing the samples
/// to Whisper. `transcribe` takes `&self`, so one `Transcriber` behind an
/// `Arc` can serve several blocking workers at once; each call gets its
/// own decoding state.
pub struct Transcriber {
    engine: SttEngine,
}

impl Transcriber {
    /// Loads the Whisper model at `model_path`.
    ///
    /// `language` is a two-letter code; `None` lets the engine
    /// auto-detect.
    #[track_caller]
    #[instrument(skip(model_path))]
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        use_gpu: bool,
        language: Option<String>,
    ) -> CoreResult<Self> {
        let engine = SttEngine::new(model_path, use_gpu, language)?;

        info!("Transcriber initialized");

        Ok(Self { engine })
    }

    /// Transcribes one sealed recording.
    ///
    /// This blocks for the full Whisper inference (seconds) and must run
    /// off any event loop.
    #[track_caller]
    #[instrument(skip(self, recording))]
    pub fn transcribe(&self, recording: AudioBuffer) -> CoreResult<String> {
        let input_rate = recording.sample_rate();
        let mono = recording.into_mono();

        if mono.is_empty() {
            return Err(AudioError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let samples = if input_rate == WHISPER_SAMPLE_RATE {
            mono
        } else {
            let resampled = Resampler::new(input_rate, WHISPER_SAMPLE_RATE)?.resample(&mono)?;
            debug!(
                input_rate = input_rate,
                original_len = mono.len(),
                resampled_len = resampled.len(),
                "Audio resampled"
            );
            resampled
        };

        let start = std::time::Instant::now();
        let transcript = self.engine.transcribe(&samples)?;

        info!(
            duration_ms = start.elapsed().as_millis(),
            text_len = transcript.len(),
            "Transcription complete"
        );

        Ok(transcript)
    }
}
