// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ingestion endpoint filter.
//!
//! Tracks receive sessions keyed by client port (which doubles as the reader
//! id downstream paths select with `org_writer`) and forwards arriving
//! frames to whichever writer slot was wired for that port. The actual
//! network receive path lives outside this crate; [`RtpReceiver::push`] is
//! the hand-off point for it.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;

use crate::errors::SessionError;
use crate::frame::Frame;
use crate::observability::messages::session::{SessionRegistered, SessionTimedOut};
use crate::observability::messages::StructuredLog;
use crate::traits::{
    Filter, FilterCore, FilterType, PortId, ReceiverEndpoint, SessionDescriptor, Step,
};
use crate::utils::poll_until;

struct Session {
    descriptor: SessionDescriptor,
    ready: bool,
}

/// The ingestion front-end: no inputs, one multiplexed writer per session.
pub struct RtpReceiver {
    core: FilterCore,
    sessions: Mutex<HashMap<PortId, Session>>,
    inbound: Mutex<VecDeque<(PortId, Frame)>>,
}

impl RtpReceiver {
    pub fn new() -> Self {
        Self {
            core: FilterCore::new(Some(0), None),
            sessions: Mutex::new(HashMap::new()),
            inbound: Mutex::new(VecDeque::new()),
        }
    }

    /// Hands a received frame to the endpoint for the given session reader.
    /// Fails when no session is registered for `reader`.
    pub fn push(&self, reader: PortId, frame: Frame) -> Result<(), SessionError> {
        if !self.sessions.lock().contains_key(&reader) {
            return Err(SessionError::UnknownReader(reader));
        }
        self.inbound.lock().push_back((reader, frame));
        Ok(())
    }

    /// Marks a session's negotiation as complete. Called by the transport
    /// glue once the external handshake finishes.
    pub fn mark_ready(&self, reader: PortId) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&reader)
            .ok_or(SessionError::UnknownReader(reader))?;
        session.ready = true;
        Ok(())
    }

    /// Waits for a session to become ready with a bounded polling loop.
    /// Exceeding the retry ceiling releases the session and reports
    /// [`SessionError::HandshakeTimeout`].
    pub fn await_ready(
        &self,
        reader: PortId,
        retries: u32,
        interval: Duration,
    ) -> Result<(), SessionError> {
        let name = {
            let sessions = self.sessions.lock();
            let session = sessions
                .get(&reader)
                .ok_or(SessionError::UnknownReader(reader))?;
            session.descriptor.name.clone()
        };

        if poll_until(retries, interval, || self.session_ready(reader)) {
            return Ok(());
        }

        SessionTimedOut {
            name: &name,
            reader,
            retries,
        }
        .log();
        self.sessions.lock().remove(&reader);
        Err(SessionError::HandshakeTimeout(name))
    }
}

impl Default for RtpReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for RtpReceiver {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn filter_type(&self) -> FilterType {
        FilterType::Receiver
    }

    fn process(&self) -> Step {
        let (reader, frame) = match self.inbound.lock().pop_front() {
            Some(entry) => entry,
            None => return Step::Idle,
        };

        match self.core.writer(reader) {
            Some(tx) => {
                if tx.is_full() {
                    // Keep the frame for the next pass.
                    self.inbound.lock().push_front((reader, frame));
                    return Step::Blocked;
                }
                if tx.try_send(frame).is_err() {
                    tracing::debug!(reader, "dropping frame for disconnected output");
                }
                Step::Processed
            }
            None => {
                // Session exists but no path consumes it yet.
                tracing::debug!(reader, "dropping frame with no connected path");
                Step::Processed
            }
        }
    }

    fn as_receiver(&self) -> Option<&dyn ReceiverEndpoint> {
        Some(self)
    }
}

impl ReceiverEndpoint for RtpReceiver {
    fn add_session(&self, descriptor: SessionDescriptor) -> Result<PortId, SessionError> {
        if descriptor.clock_rate == 0 {
            return Err(SessionError::InvalidDescriptor(
                "clock rate must be non-zero".to_string(),
            ));
        }
        if descriptor.channels == 0 {
            return Err(SessionError::InvalidDescriptor(
                "channel count must be non-zero".to_string(),
            ));
        }

        let reader = descriptor.port;
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(&reader) {
            return Err(SessionError::DuplicateSession(reader));
        }

        SessionRegistered {
            descriptor: &descriptor,
        }
        .log();
        sessions.insert(
            reader,
            Session {
                descriptor,
                ready: false,
            },
        );
        Ok(reader)
    }

    fn session_ready(&self, reader: PortId) -> bool {
        self.sessions
            .lock()
            .get(&reader)
            .map(|s| s.ready)
            .unwrap_or(false)
    }

    fn active_readers(&self) -> Vec<PortId> {
        let mut readers: Vec<PortId> = self.sessions.lock().keys().copied().collect();
        readers.sort_unstable();
        readers
    }
}
