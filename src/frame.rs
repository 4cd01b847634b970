// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Inter-filter frame transport.
//!
//! Filters exchange [`Frame`]s over bounded channels. The channels are the
//! physical links created by the connection operations on the filter
//! contract; a full channel is backpressure, never a blocked sender.

use std::time::Duration;

/// Depth of the bounded queue backing each filter-to-filter link.
pub const FRAME_QUEUE_DEPTH: usize = 64;

/// One unit of media data travelling between filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub payload: Vec<u8>,
    /// Presentation timestamp, when the producing filter knows one.
    pub pts: Option<Duration>,
}

impl Frame {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload, pts: None }
    }

    pub fn with_pts(payload: Vec<u8>, pts: Duration) -> Self {
        Self {
            payload,
            pts: Some(pts),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Sending half of a filter-to-filter link.
pub type FrameSender = crossbeam_channel::Sender<Frame>;

/// Receiving half of a filter-to-filter link.
pub type FrameReceiver = crossbeam_channel::Receiver<Frame>;

/// Creates one bounded filter-to-filter link.
pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    crossbeam_channel::bounded(FRAME_QUEUE_DEPTH)
}
