//! Start/stop indicator tones.
//!
//! Short synthesized sine tones played fire-and-forget through rodio.
//! Playback only appends to the output mixer, so it never blocks the
//! event loop or audio capture; any output failure downgrades to silence.

use crate::config::SoundConfig;

use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};
use tracing::{debug, warn};

const TONE_SAMPLE_RATE: u32 = 44_100;
const TONE_MS: u64 = 90;
const FADE_MS: u64 = 10;
const TONE_AMPLITUDE: f32 = 0.2;
const START_HZ: f32 = 880.0;
const STOP_HZ: f32 = 587.0;

/// Indicator sound player. Holds the output stream open for the process
/// lifetime; a `None` stream means sounds are disabled or unavailable.
pub struct IndicatorSounds {
    output: Option<OutputStream>,
}

impl IndicatorSounds {
    pub fn new(config: &SoundConfig) -> Self {
        if !config.enabled {
            return Self { output: None };
        }

        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                debug!("Indicator sound output opened");
                Self {
                    output: Some(stream),
                }
            }
            Err(e) => {
                warn!(error = %e, "No sound output available, indicators disabled");
                Self { output: None }
            }
        }
    }

    /// Recording started.
    pub fn play_start(&self) {
        self.play_tone(START_HZ);
    }

    /// Recording stopped.
    pub fn play_stop(&self) {
        self.play_tone(STOP_HZ);
    }

    fn play_tone(&self, freq: f32) {
        let Some(output) = &self.output else {
            return;
        };

        let sink = Sink::connect_new(output.mixer());
        sink.append(SamplesBuffer::new(1, TONE_SAMPLE_RATE, synth_tone(freq)));
        sink.detach();
    }
}

/// A short sine burst with linear fade-in/out to avoid clicks.
fn synth_tone(freq: f32) -> Vec<f32> {
    let total = (TONE_SAMPLE_RATE as u64 * TONE_MS / 1000) as usize;
    let fade = (TONE_SAMPLE_RATE as u64 * FADE_MS / 1000) as usize;

    (0..total)
        .map(|i| {
            let t = i as f32 / TONE_SAMPLE_RATE as f32;
            let envelope = if i < fade {
                i as f32 / fade as f32
            } else if i >= total - fade {
                (total - i) as f32 / fade as f32
            } else {
                1.0
            };
            (t * freq * std::f32::consts::TAU).sin() * TONE_AMPLITUDE * envelope
        })
        .collect()
}
