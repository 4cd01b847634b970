// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Egress endpoint filter.
//!
//! Accepts publish connections over reader slots that paths have already
//! wired into it, and drains those readers as its unit of work. Actual
//! packet emission is the concern of the transport glue; the filter accounts
//! for what each publish connection would have sent.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::errors::SessionError;
use crate::observability::messages::session::PublishAdded;
use crate::observability::messages::StructuredLog;
use crate::traits::{Filter, FilterCore, FilterType, Packaging, PortId, Step, TransmitterEndpoint};

struct PublishConnection {
    readers: Vec<PortId>,
    stream_index: u32,
    packaging: Packaging,
    session_name: String,
    frames_out: u64,
}

/// The egress front-end: multiplexed readers, no outputs.
pub struct RtpTransmitter {
    core: FilterCore,
    connections: Mutex<Vec<PublishConnection>>,
    cursor: AtomicUsize,
}

impl RtpTransmitter {
    pub fn new() -> Self {
        Self {
            core: FilterCore::new(None, Some(0)),
            connections: Mutex::new(Vec::new()),
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Frames accounted to a publish session so far.
    pub fn frames_delivered(&self, session_name: &str) -> Option<u64> {
        self.connections
            .lock()
            .iter()
            .find(|c| c.session_name == session_name)
            .map(|c| c.frames_out)
    }
}

impl Default for RtpTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for RtpTransmitter {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn filter_type(&self) -> FilterType {
        FilterType::Transmitter
    }

    fn process(&self) -> Step {
        // One frame per pass, starting from a rotating reader, so a
        // saturated low-numbered reader cannot starve the others on a
        // shared endpoint worker.
        let ports = self.core.reader_ports();
        if ports.is_empty() {
            return Step::Idle;
        }
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % ports.len();
        for offset in 0..ports.len() {
            let reader = ports[(start + offset) % ports.len()];
            if let Some(frame) = self.core.try_recv(reader) {
                let mut connections = self.connections.lock();
                for connection in connections.iter_mut() {
                    if connection.readers.contains(&reader) {
                        connection.frames_out += 1;
                        tracing::trace!(
                            reader,
                            session = %connection.session_name,
                            stream_index = connection.stream_index,
                            bytes = frame.len(),
                            "frame delivered"
                        );
                    }
                }
                return Step::Processed;
            }
        }
        Step::Idle
    }

    fn as_transmitter(&self) -> Option<&dyn TransmitterEndpoint> {
        Some(self)
    }
}

impl TransmitterEndpoint for RtpTransmitter {
    fn add_connection(
        &self,
        readers: &[PortId],
        stream_index: u32,
        packaging: Packaging,
        session_name: &str,
    ) -> Result<(), SessionError> {
        if readers.is_empty() {
            return Err(SessionError::InvalidDescriptor(
                "publish connection names no readers".to_string(),
            ));
        }
        for reader in readers {
            if self.core.reader(*reader).is_none() {
                return Err(SessionError::UnknownReader(*reader));
            }
        }

        PublishAdded {
            session_name,
            packaging,
            readers: readers.len(),
        }
        .log();
        self.connections.lock().push(PublishConnection {
            readers: readers.to_vec(),
            stream_index,
            packaging,
            session_name: session_name.to_string(),
            frames_out: 0,
        });
        Ok(())
    }
}
