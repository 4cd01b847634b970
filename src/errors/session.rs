// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::traits::PortId;

/// Failures at the ingestion/egress endpoint boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a session is already registered for reader {0}")]
    DuplicateSession(PortId),
    #[error("reader {0} is not wired into this endpoint")]
    UnknownReader(PortId),
    #[error("session '{0}' did not become ready within the retry ceiling")]
    HandshakeTimeout(String),
    #[error("invalid session descriptor: {0}")]
    InvalidDescriptor(String),
}
