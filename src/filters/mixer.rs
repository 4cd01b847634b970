// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fan-in audio mixer.
//!
//! Sums interleaved signed 16-bit little-endian samples from every reader
//! that has a frame available this pass into one output frame. This is
//! deliberately simple (no resampling, no alignment window); it exists so
//! multi-input topologies can be driven end to end.

use crate::frame::Frame;
use crate::traits::{Filter, FilterCore, FilterType, Step, DEFAULT_PORT};

pub struct AudioMixer {
    core: FilterCore,
}

impl AudioMixer {
    pub fn new() -> Self {
        Self {
            // Any number of inputs, a single mixed output.
            core: FilterCore::new(None, Some(1)),
        }
    }
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for AudioMixer {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn filter_type(&self) -> FilterType {
        FilterType::AudioMixer
    }

    fn process(&self) -> Step {
        let tx = match self.core.writer(DEFAULT_PORT) {
            Some(tx) => tx,
            None => return Step::Idle,
        };
        if tx.is_full() {
            return Step::Blocked;
        }

        let mut inputs = Vec::new();
        for reader in self.core.reader_ports() {
            if let Some(frame) = self.core.try_recv(reader) {
                inputs.push(frame);
            }
        }
        if inputs.is_empty() {
            return Step::Idle;
        }

        let pts = inputs.iter().find_map(|f| f.pts);
        let mut mixed = Frame::new(mix_s16le(&inputs));
        mixed.pts = pts;

        if tx.try_send(mixed).is_err() {
            return Step::Blocked;
        }
        Step::Processed
    }
}

/// Saturating sample-wise sum; the output is as long as the longest input.
fn mix_s16le(inputs: &[Frame]) -> Vec<u8> {
    let longest = inputs.iter().map(|f| f.len()).max().unwrap_or(0);
    let samples = longest / 2;
    let mut out = Vec::with_capacity(samples * 2);

    for i in 0..samples {
        let mut acc: i32 = 0;
        for frame in inputs {
            let offset = i * 2;
            if offset + 2 <= frame.payload.len() {
                let sample =
                    i16::from_le_bytes([frame.payload[offset], frame.payload[offset + 1]]);
                acc += i32::from(sample);
            }
        }
        let clamped = acc.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        out.extend_from_slice(&clamped.to_le_bytes());
    }
    out
}
