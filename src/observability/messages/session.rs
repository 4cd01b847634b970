// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for endpoint session events.

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;
use crate::traits::{Packaging, PortId, SessionDescriptor};

/// A receive session was registered with the ingestion endpoint.
///
/// # Log Level
/// `info!` - important operational event
pub struct SessionRegistered<'a> {
    pub descriptor: &'a SessionDescriptor,
}

impl Display for SessionRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registered receive session {}", self.descriptor)
    }
}

impl StructuredLog for SessionRegistered<'_> {
    fn log(&self) {
        tracing::info!(
            session = %self.descriptor.name,
            reader = self.descriptor.port,
            codec = %self.descriptor.codec,
            "{}", self
        );
    }
}

/// A receive session did not become ready within the retry ceiling and was
/// released.
///
/// # Log Level
/// `error!` - failure requiring attention
pub struct SessionTimedOut<'a> {
    pub name: &'a str,
    pub reader: PortId,
    pub retries: u32,
}

impl Display for SessionTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Session '{}' (reader {}) not ready after {} retries; releasing it",
            self.name, self.reader, self.retries
        )
    }
}

impl StructuredLog for SessionTimedOut<'_> {
    fn log(&self) {
        tracing::error!(
            session = self.name,
            reader = self.reader,
            retries = self.retries,
            "{}", self
        );
    }
}

/// A publish connection was registered with the egress endpoint.
///
/// # Log Level
/// `info!` - important operational event
pub struct PublishAdded<'a> {
    pub session_name: &'a str,
    pub packaging: Packaging,
    pub readers: usize,
}

impl Display for PublishAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Added {} publish session '{}' over {} reader{}",
            self.packaging,
            self.session_name,
            self.readers,
            if self.readers == 1 { "" } else { "s" }
        )
    }
}

impl StructuredLog for PublishAdded<'_> {
    fn log(&self) {
        tracing::info!(
            session = self.session_name,
            packaging = %self.packaging,
            readers = self.readers,
            "{}", self
        );
    }
}
