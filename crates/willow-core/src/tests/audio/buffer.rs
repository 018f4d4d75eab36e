use crate::audio::buffer::{AudioBuffer, MAX_BUFFER_SAMPLES};

use std::time::Duration;

/// WHAT: Buffer drops oldest samples once the ring bound is reached
/// WHY: Prevents unbounded memory growth during long recordings
#[test]
fn given_buffer_at_max_capacity_when_pushing_frames_then_oldest_discarded() {
    // Given: A mono buffer filled to the ring bound with 0.0
    let mut buffer = AudioBuffer::new(48_000, 1, "test-mic");
    buffer.push_frames(&vec![0.0f32; MAX_BUFFER_SAMPLES]);
    assert_eq!(buffer.len(), MAX_BUFFER_SAMPLES);

    // When: Pushing 1024 new samples (value 1.0) beyond the bound
    buffer.push_frames(&vec![1.0f32; 1024]);

    // Then: Length is unchanged and the newest samples survive
    assert_eq!(buffer.len(), MAX_BUFFER_SAMPLES);
    let mono = buffer.into_mono();
    assert!((mono[MAX_BUFFER_SAMPLES - 1] - 1.0).abs() < f32::EPSILON);
    assert!((mono[MAX_BUFFER_SAMPLES - 1024] - 1.0).abs() < f32::EPSILON);
}

/// WHAT: Duration accounts for sample rate and channel interleaving
/// WHY: The minimum-audio gate compares captured duration against a threshold
#[test]
fn given_interleaved_stereo_when_computing_duration_then_frames_counted_once() {
    // Given: One second of interleaved stereo at 16kHz
    let mut buffer = AudioBuffer::new(16_000, 2, "test-mic");
    buffer.push_frames(&vec![0.1f32; 32_000]);

    // Then: Duration is one second, not two
    assert_eq!(buffer.duration(), Duration::from_secs(1));
}

/// WHAT: Empty buffer reports zero duration and is_empty
/// WHY: Sessions with no captured frames must be detectable downstream
#[test]
fn given_empty_buffer_when_inspected_then_zero_duration() {
    let buffer = AudioBuffer::new(48_000, 2, "test-mic");

    assert!(buffer.is_empty());
    assert_eq!(buffer.duration(), Duration::ZERO);
    assert!(buffer.into_mono().is_empty());
}

/// WHAT: Downmix averages interleaved channels frame by frame
/// WHY: Whisper consumes mono; both channels must contribute equally
#[test]
fn given_stereo_frames_when_downmixing_then_channels_averaged() {
    // Given: Stereo frames with left = 1.0, right = 0.0
    let mut buffer = AudioBuffer::new(48_000, 2, "test-mic");
    buffer.push_frames(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);

    // When: Downmixing to mono
    let mono = buffer.into_mono();

    // Then: Every frame averages to 0.5
    assert_eq!(mono.len(), 3);
    assert!(mono.iter().all(|&s| (s - 0.5).abs() < f32::EPSILON));
}

/// WHAT: The buffer carries the identifier of its capturing device
/// WHY: A sealed recording must stay attributable to the device that
///      produced it, independent of the session that captured it
#[test]
fn given_device_tag_when_buffer_sealed_then_tag_preserved() {
    let mut buffer = AudioBuffer::new(48_000, 1, "USB Microphone");
    buffer.push_frames(&[0.1, 0.2]);

    let sealed = std::mem::replace(&mut buffer, AudioBuffer::new(48_000, 1, "USB Microphone"));

    assert_eq!(sealed.device(), "USB Microphone");
    assert_eq!(buffer.device(), "USB Microphone");
}

/// WHAT: Mono buffers pass through the downmix unchanged
/// WHY: The common single-channel path must not reorder or scale samples
#[test]
fn given_mono_frames_when_downmixing_then_samples_unchanged() {
    let mut buffer = AudioBuffer::new(16_000, 1, "test-mic");
    buffer.push_frames(&[0.25, -0.5, 0.75]);

    assert_eq!(buffer.into_mono(), vec![0.25, -0.5, 0.75]);
}
