use crate::{AudioBuffer, AudioError, Transcriber};

/// WHAT: Transcriber rejects non-existent model path
/// WHY: Startup must fail fast before any recording can happen
#[test]
fn given_invalid_model_path_when_creating_transcriber_then_model_not_found_error() {
    // Given: Path to non-existent Whisper model
    let invalid_path = std::path::PathBuf::from("/nonexistent/model.bin");

    // When: Attempting to create Transcriber
    let result = Transcriber::new(&invalid_path, false, None);

    // Then: Returns ModelNotFound error
    assert!(matches!(result, Err(AudioError::ModelNotFound { .. })));
}

/// WHAT: A recording with no frames is rejected before inference
/// WHY: Whisper must never be invoked on empty input
#[test]
#[allow(clippy::unwrap_used)]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn given_empty_recording_when_transcribing_then_no_audio_captured_error() {
    // Given: Transcriber with valid model and an empty sealed recording
    let model_path = std::env::var("TEST_WHISPER_MODEL_PATH")
        .unwrap_or_else(|_| "models/ggml-base.en.bin".to_string());
    let transcriber = Transcriber::new(&model_path, false, None).unwrap();
    let recording = AudioBuffer::new(48_000, 2, "test-mic");

    // When: Attempting to transcribe it
    let result = transcriber.transcribe(recording);

    // Then: Returns NoAudioCaptured error
    assert!(matches!(
        result,
        Err(AudioError::NoAudioCaptured { .. })
    ));
}
