// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::frame::Frame;
use crate::traits::{Filter, FilterCore, FilterType, Step, DEFAULT_PORT};

/// One-in, one-out scaling stage for interleaved s16le audio.
///
/// Stands in for whatever per-stream transform a pipeline needs between the
/// mixer and the egress endpoint.
pub struct Gain {
    core: FilterCore,
    factor: f32,
}

impl Gain {
    pub fn new(factor: f32) -> Self {
        Self {
            core: FilterCore::single(),
            factor,
        }
    }

    pub fn unity() -> Self {
        Self::new(1.0)
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl Filter for Gain {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn filter_type(&self) -> FilterType {
        FilterType::Gain
    }

    fn process(&self) -> Step {
        let tx = match self.core.writer(DEFAULT_PORT) {
            Some(tx) => tx,
            None => return Step::Idle,
        };
        if tx.is_full() {
            return Step::Blocked;
        }
        let frame = match self.core.try_recv(DEFAULT_PORT) {
            Some(frame) => frame,
            None => return Step::Idle,
        };

        let mut scaled = Frame::new(scale_s16le(&frame.payload, self.factor));
        scaled.pts = frame.pts;
        if tx.try_send(scaled).is_err() {
            return Step::Blocked;
        }
        Step::Processed
    }
}

fn scale_s16le(payload: &[u8], factor: f32) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len());
    for chunk in payload.chunks_exact(2) {
        let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
        let scaled = (f32::from(sample) * factor)
            .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
        out.extend_from_slice(&scaled.to_le_bytes());
    }
    // A trailing odd byte is carried through untouched.
    if payload.len() % 2 == 1 {
        out.push(payload[payload.len() - 1]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::wire;
    use std::time::Duration;

    fn frame_of(samples: &[i16]) -> Frame {
        let mut payload = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            payload.extend_from_slice(&s.to_le_bytes());
        }
        Frame::new(payload)
    }

    fn samples_of(frame: &Frame) -> Vec<i16> {
        frame
            .payload
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect()
    }

    #[test]
    fn scales_samples_and_preserves_pts() {
        let gain = Gain::new(0.5);
        let upstream = FilterCore::multiplexed();
        let sink = FilterCore::multiplexed();
        wire(&upstream, gain.core(), 0, DEFAULT_PORT).unwrap();
        wire(gain.core(), &sink, DEFAULT_PORT, 0).unwrap();

        let mut frame = frame_of(&[200, -400]);
        frame.pts = Some(Duration::from_millis(20));
        upstream.writer(0).unwrap().try_send(frame).unwrap();

        assert_eq!(gain.process(), Step::Processed);
        let out = sink.try_recv(0).unwrap();
        assert_eq!(samples_of(&out), vec![100, -200]);
        assert_eq!(out.pts, Some(Duration::from_millis(20)));
    }

    #[test]
    fn amplification_saturates() {
        let scaled = scale_s16le(&frame_of(&[30000, -30000]).payload, 2.0);
        assert_eq!(samples_of(&Frame::new(scaled)), vec![i16::MAX, i16::MIN]);
    }

    #[test]
    fn idle_without_downstream_or_input() {
        let gain = Gain::unity();
        assert_eq!(gain.process(), Step::Idle);

        let sink = FilterCore::multiplexed();
        wire(gain.core(), &sink, DEFAULT_PORT, 0).unwrap();
        assert_eq!(gain.process(), Step::Idle);
    }

    #[test]
    fn full_downstream_blocks_without_consuming() {
        let gain = Gain::unity();
        let upstream = FilterCore::multiplexed();
        let sink = FilterCore::multiplexed();
        wire(&upstream, gain.core(), 0, DEFAULT_PORT).unwrap();
        wire(gain.core(), &sink, DEFAULT_PORT, 0).unwrap();

        let tx = gain.core().writer(DEFAULT_PORT).unwrap();
        while tx.try_send(Frame::new(vec![0, 0])).is_ok() {}

        upstream.writer(0).unwrap().try_send(frame_of(&[1])).unwrap();
        assert_eq!(gain.process(), Step::Blocked);
        // The input is still queued for the next pass.
        assert!(gain.core().try_recv(DEFAULT_PORT).is_some());
    }
}
