use crate::{AudioError, CoreResult, audio::buffer::AudioBuffer};

use std::{
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Failure latch shared with the cpal stream error callback.
///
/// cpal reports device disconnects and backend failures through a
/// callback with no return channel; the latch carries that signal to
/// [`AudioCapturer::stop`], which refuses to seal a recording captured
/// by a failed stream.
#[derive(Debug, Default)]
pub(crate) struct StreamFault {
    tripped: AtomicBool,
}

impl StreamFault {
    /// Record a stream failure. Sticky until [`reset`](Self::reset).
    pub(crate) fn trip(&self) {
        self.tripped.store(true, Ordering::Release);
    }

    /// Clear the latch for a new recording session.
    pub(crate) fn reset(&self) {
        self.tripped.store(false, Ordering::Release);
    }

    /// Error out if a stream failure was recorded.
    #[track_caller]
    pub(crate) fn check(&self) -> CoreResult<()> {
        if self.tripped.load(Ordering::Acquire) {
            return Err(AudioError::DeviceError {
                reason: "Input stream failed during capture".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

pub struct AudioCapturer {
    device: Device,
    device_name: String,
    config: StreamConfig,
    stream: Option<Stream>,
    buffer: Arc<Mutex<AudioBuffer>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream to ensure no in-flight callback writes after
    /// the lock is acquired in `stop()`.
    shutdown: Arc<AtomicBool>,
    /// Set by the stream error callback; a tripped fault fails `stop()`.
    fault: Arc<StreamFault>,
}

impl AudioCapturer {
    /// Opens the named input device, or the host default when `preferred`
    /// is `None`.
    #[track_caller]
    #[instrument]
    pub fn new(preferred: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = match preferred {
            Some(name) => host
                .input_devices()
                .map_err(|e| AudioError::DeviceError {
                    reason: format!("Failed to enumerate input devices: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?
                .find(|d| d.name().is_ok_and(|n| n == name))
                .ok_or_else(|| AudioError::DeviceNotFound {
                    name: name.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?,
            None => host
                .default_input_device()
                .ok_or(AudioError::NoMicrophoneFound {
                    location: ErrorLocation::from(Location::caller()),
                })?,
        };

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| String::from("<unknown input device>"));

        info!(
            device = %device_name,
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        let config: StreamConfig = config.into();
        let buffer = AudioBuffer::new(config.sample_rate, config.channels, &device_name);

        Ok(Self {
            device,
            device_name,
            config,
            stream: None,
            buffer: Arc::new(Mutex::new(buffer)),
            shutdown: Arc::new(AtomicBool::new(false)),
            fault: Arc::new(StreamFault::default()),
        })
    }

    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        let buffer = Arc::clone(&self.buffer);
        let shutdown = Arc::clone(&self.shutdown);
        let fault = Arc::clone(&self.fault);

        // Reset flags for new recording session
        self.shutdown.store(false, Ordering::Release);
        self.fault.reset();

        // Discard anything left over from the previous session
        *buffer.lock().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to lock buffer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })? = AudioBuffer::new(
            self.config.sample_rate,
            self.config.channels,
            &self.device_name,
        );

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Check shutdown flag before acquiring lock. This provides
                    // explicit synchronization: once stop() sets this flag,
                    // no new samples will be written even if CPAL fires one
                    // more callback before the stream is dropped.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently dropping audio.
                    // A poisoned mutex means a previous holder panicked, but the
                    // buffer data is still valid and usable.
                    let mut buf = buffer.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.push_frames(data);
                },
                move |err| {
                    // No return channel from this callback; trip the
                    // latch so stop() fails instead of sealing a
                    // recording cut short by a dead device.
                    error!("Audio stream error: {}", err);
                    fault.trip();
                },
                None,
            )
            .map_err(|e| AudioError::DeviceError {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    /// Stops the stream and takes the sealed recording. The returned buffer
    /// can no longer grow; a fresh buffer replaces it for the next session.
    ///
    /// Fails with [`AudioError::DeviceError`] if the stream reported a
    /// failure mid-session (e.g. the device disconnected); partial audio
    /// from a failed stream is discarded, never transcribed.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<AudioBuffer> {
        // Signal callback to stop writing BEFORE dropping the stream.
        // This provides defense-in-depth: even if CPAL's Stream::drop()
        // is asynchronous on some backend, the callback will observe this
        // flag and return early, preventing writes after we acquire the lock.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield to ensure any in-flight callback observes the
            // shutdown flag and completes. On most CPAL backends, drop()
            // is synchronous and joins the audio thread, making this
            // redundant — but it costs <5ms and guarantees correctness
            // even if a backend's drop() returns before the final callback.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        // A tripped fault invalidates whatever partial audio the callback
        // managed to write before the stream died.
        self.fault.check()?;

        let mut guard = self.buffer.lock().map_err(|e| AudioError::DeviceError {
            reason: format!("Failed to lock buffer: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let sealed = std::mem::replace(
            &mut *guard,
            AudioBuffer::new(
                self.config.sample_rate,
                self.config.channels,
                &self.device_name,
            ),
        );
        drop(guard);

        debug!(
            sample_count = sealed.len(),
            duration_ms = sealed.duration().as_millis(),
            "Captured audio samples"
        );

        Ok(sealed)
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }
}
