use crate::{AudioError, CoreResult};

use std::panic::Location;

use audioadapter_buffers::direct::InterleavedSlice;
use error_location::ErrorLocation;
use rubato::{Fft, FixedSync, Resampler as RubatoResampler};
use tracing::{debug, instrument};

/// Mono samples processed per resampler pass.
const CHUNK_SIZE: usize = 1024;

pub struct Resampler {
    resampler: Fft<f32>,
    input_rate: u32,
    output_rate: u32,
    /// Reused output scratch, sized to the resampler's max output frames.
    scratch: Vec<f32>,
}

impl Resampler {
    #[track_caller]
    #[instrument]
    pub fn new(input_rate: u32, output_rate: u32) -> CoreResult<Self> {
        let sub_chunks = 2; // Sub-chunks for processing

        let resampler = Fft::<f32>::new(
            input_rate as usize,  // sample_rate_input
            output_rate as usize, // sample_rate_output
            CHUNK_SIZE,           // chunk_size
            sub_chunks,           // sub_chunks
            1,                    // nbr_channels (mono)
            FixedSync::Input,     // fixed
        )
        .map_err(|e| AudioError::ResamplingError {
            reason: format!("Failed to create resampler: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let scratch = vec![0.0f32; resampler.output_frames_max()];

        debug!(
            input_rate = input_rate,
            output_rate = output_rate,
            chunk_size = CHUNK_SIZE,
            "Resampler initialized"
        );

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
            scratch,
        })
    }

    /// Resamples mono audio from the input rate to the output rate.
    ///
    /// The final partial chunk is zero-padded up to the chunk size, and the
    /// output is truncated back to the length the rate ratio predicts, so
    /// the padding never leaks trailing silence into the result.
    #[track_caller]
    #[instrument(skip(self, samples))]
    pub fn resample(&mut self, samples: &[f32]) -> CoreResult<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        if self.input_rate == self.output_rate {
            return Ok(samples.to_vec());
        }

        let estimated_len =
            (samples.len() as f64 * self.output_rate as f64 / self.input_rate as f64) as usize;
        let mut output = Vec::with_capacity(estimated_len);

        let mut chunks = samples.chunks_exact(CHUNK_SIZE);
        for chunk in chunks.by_ref() {
            self.process_chunk(chunk, &mut output)?;
        }

        let remainder = chunks.remainder();
        if !remainder.is_empty() {
            let mut padded = remainder.to_vec();
            padded.resize(CHUNK_SIZE, 0.0);
            self.process_chunk(&padded, &mut output)?;
        }

        output.truncate(estimated_len);

        debug!(
            input_len = samples.len(),
            output_len = output.len(),
            input_rate = self.input_rate,
            output_rate = self.output_rate,
            "Resampled audio"
        );

        Ok(output)
    }

    #[track_caller]
    fn process_chunk(&mut self, chunk: &[f32], output: &mut Vec<f32>) -> CoreResult<()> {
        // Create adapter for input (frames, channels)
        let input_adapter =
            InterleavedSlice::new(chunk, 1, CHUNK_SIZE).map_err(|e| AudioError::ResamplingError {
                reason: format!("Failed to create input adapter: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let scratch_frames = self.scratch.len();
        let mut output_adapter = InterleavedSlice::new_mut(&mut self.scratch, 1, scratch_frames)
            .map_err(|e| AudioError::ResamplingError {
                reason: format!("Failed to create output adapter: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let (_input_frames, output_frames_written) = self
            .resampler
            .process_into_buffer(&input_adapter, &mut output_adapter, None)
            .map_err(|e| AudioError::ResamplingError {
                reason: format!("Resampling failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        output.extend_from_slice(&self.scratch[..output_frames_written]);
        Ok(())
    }
}
