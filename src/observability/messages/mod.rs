// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `pipeline` - registry and path-wiring events
//! * `session` - ingestion/egress endpoint session events
//! * `worker` - worker thread lifecycle events

pub mod pipeline;
pub mod session;
pub mod worker;

/// Emits the message through `tracing` with structured fields at the
/// severity appropriate for the event.
pub trait StructuredLog {
    fn log(&self);
}
