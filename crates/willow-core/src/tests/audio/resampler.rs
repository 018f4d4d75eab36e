use crate::audio::Resampler;

const INPUT_RATE: u32 = 48_000;
const OUTPUT_RATE: u32 = 16_000;
const LENGTH_TOLERANCE: usize = 100;

/// WHAT: Resampler converts 48kHz to 16kHz with the expected length
/// WHY: Whisper requires 16kHz input; the 3:1 ratio must hold
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_audio_when_resampling_to_16khz_then_output_length_matches_ratio() {
    // Given: One second of 48kHz audio
    let mut resampler = Resampler::new(INPUT_RATE, OUTPUT_RATE).unwrap();
    let input = vec![0.5f32; INPUT_RATE as usize];

    // When: Resampling
    let output = resampler.resample(&input).unwrap();

    // Then: Output is approximately one second at 16kHz, all finite
    let expected = OUTPUT_RATE as usize;
    assert!(
        output.len().abs_diff(expected) < LENGTH_TOLERANCE,
        "expected ~{expected} samples, got {}",
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite()));
}

/// WHAT: Empty input yields empty output
/// WHY: Edge case handling for zero-length recordings
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_samples_when_resampling_then_empty_output() {
    let mut resampler = Resampler::new(INPUT_RATE, OUTPUT_RATE).unwrap();

    let output = resampler.resample(&[]).unwrap();

    assert!(output.is_empty());
}

/// WHAT: Matching input and output rates short-circuit to a copy
/// WHY: Devices already capturing at 16kHz need no conversion pass
#[test]
#[allow(clippy::unwrap_used)]
fn given_equal_rates_when_resampling_then_samples_copied_unchanged() {
    let mut resampler = Resampler::new(OUTPUT_RATE, OUTPUT_RATE).unwrap();
    let input = vec![0.25f32; 1000];

    let output = resampler.resample(&input).unwrap();

    assert_eq!(output, input);
}

/// WHAT: A tone survives resampling without blowing up in amplitude
/// WHY: Validates that signal content is preserved, not just length
#[test]
#[allow(clippy::unwrap_used)]
fn given_tone_signal_when_resampling_then_amplitude_bounded() {
    // Given: A short sine tone at 48kHz, including a partial final chunk
    let mut resampler = Resampler::new(INPUT_RATE, OUTPUT_RATE).unwrap();
    let input: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.1).sin()).collect();

    // When: Resampling the tone
    let output = resampler.resample(&input).unwrap();

    // Then: Length tracks the 3:1 ratio and no sample exceeds 1.5
    assert!(
        output.len().abs_diff(1600) < LENGTH_TOLERANCE,
        "expected ~1600 samples, got {}",
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite() && s.abs() <= 1.5));
}
