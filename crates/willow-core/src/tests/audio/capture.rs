use crate::{
    AudioError,
    audio::{
        buffer::{AudioBuffer, MAX_BUFFER_SAMPLES},
        capture::StreamFault,
    },
};

use std::sync::{Arc, Mutex};

/// WHAT: Lock poison recovery preserves captured audio
/// WHY: Ensures audio data is never silently lost on mutex poison
#[test]
#[allow(clippy::unwrap_used)]
fn given_poisoned_mutex_when_recovering_then_data_preserved() {
    // Given: A shared buffer poisoned by a panic while holding the lock
    let mut buffer = AudioBuffer::new(48_000, 1, "test-mic");
    buffer.push_frames(&vec![0.5f32; 100]);
    let shared = Arc::new(Mutex::new(buffer));
    let shared_clone = Arc::clone(&shared);

    let _ = std::thread::spawn(move || {
        let _guard = shared_clone.lock().unwrap();
        panic!("intentional panic to poison mutex");
    })
    .join();

    // When: Recovering from the poisoned lock as the capture callback does
    let recovered = shared.lock().unwrap_or_else(|e| e.into_inner());

    // Then: Captured samples are fully preserved
    assert_eq!(recovered.len(), 100);
}

/// WHAT: Concurrent callback writes keep the buffer within its ring bound
/// WHY: Validates the Arc<Mutex<AudioBuffer>> sharing under contention
#[test]
#[allow(clippy::unwrap_used)]
fn given_concurrent_writers_when_pushing_frames_then_no_corruption() {
    // Given: A shared buffer simulating audio callback contention
    let shared = Arc::new(Mutex::new(AudioBuffer::new(48_000, 1, "test-mic")));
    let mut handles = vec![];

    // When: 4 threads push 1000 batches of 48 samples each concurrently
    for i in 0..4u8 {
        let shared_clone = Arc::clone(&shared);
        handles.push(std::thread::spawn(move || {
            for _ in 0..1000 {
                let mut buf = shared_clone.lock().unwrap_or_else(|e| e.into_inner());
                buf.push_frames(&[f32::from(i); 48]);
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    // Then: Every batch landed and the ring bound holds
    let guard = shared.lock().unwrap();
    assert!(guard.len() <= MAX_BUFFER_SAMPLES);
    // Total: 4 threads x 1000 batches x 48 = 192,000 (well under max)
    assert_eq!(guard.len(), 4 * 1000 * 48);
}

/// WHAT: Sealing via ownership transfer leaves a fresh buffer behind
/// WHY: A sealed recording must never grow after stop()
#[test]
#[allow(clippy::unwrap_used)]
fn given_open_buffer_when_sealed_then_replacement_is_empty() {
    // Given: A shared buffer with captured frames, as stop() sees it
    let shared = Arc::new(Mutex::new(AudioBuffer::new(48_000, 2, "test-mic")));
    shared.lock().unwrap().push_frames(&vec![0.25f32; 4800]);

    // When: Swapping in a fresh buffer, taking the sealed one by value
    let sealed = {
        let mut guard = shared.lock().unwrap();
        std::mem::replace(&mut *guard, AudioBuffer::new(48_000, 2, "test-mic"))
    };

    // Then: The sealed recording holds the frames; the open one is empty
    assert_eq!(sealed.len(), 4800);
    assert!(shared.lock().unwrap().is_empty());
}

/// WHAT: A tripped stream fault turns stop() into a DeviceError
/// WHY: A device disconnect mid-session must abort the recording, not
///      seal and transcribe whatever partial audio was captured
#[test]
fn given_tripped_fault_when_checked_then_device_error() {
    // Given: The fault latch as shared with the stream error callback
    let fault = Arc::new(StreamFault::default());
    assert!(fault.check().is_ok());

    // When: The error callback reports a failure (from any thread)
    let callback_side = Arc::clone(&fault);
    std::thread::spawn(move || callback_side.trip())
        .join()
        .unwrap_or(());

    // Then: The seal path fails with a DeviceError
    assert!(matches!(
        fault.check(),
        Err(AudioError::DeviceError { .. })
    ));
}

/// WHAT: Resetting the fault latch re-arms it for the next session
/// WHY: One dead stream must not poison every later recording
#[test]
fn given_tripped_fault_when_reset_then_next_session_clean() {
    let fault = StreamFault::default();
    fault.trip();
    assert!(fault.check().is_err());

    fault.reset();

    assert!(fault.check().is_ok());
}
