// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Contracts for the two distinguished endpoint filters.
//!
//! The ingestion endpoint accepts receive-session registrations and exposes
//! the reader ids it will populate as data arrives; the egress endpoint
//! accepts publish requests over readers already wired into it. Transport
//! framing (RTSP/RTP, SDP syntax) is entirely the concern of the concrete
//! endpoint implementations and stays outside this crate's scope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SessionError;
use crate::traits::filter::PortId;

/// Minimal session-description document for a receive session.
///
/// Carries the fields a session announcement names: media type, transport
/// protocol, payload type, codec, bandwidth, clock rate, client port and
/// channel count. The client port doubles as the reader id the ingestion
/// endpoint will populate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub name: String,
    pub medium: String,
    pub protocol: String,
    pub payload_type: u8,
    pub codec: String,
    /// Bandwidth in kbps.
    pub bandwidth: u32,
    pub clock_rate: u32,
    pub port: PortId,
    pub channels: u8,
}

impl fmt::Display for SessionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}': {}/{} pt={} {}Hz {}ch @{}",
            self.medium,
            self.name,
            self.protocol,
            self.codec,
            self.payload_type,
            self.clock_rate,
            self.channels,
            self.port
        )
    }
}

/// Output packaging mode for a publish connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Packaging {
    /// Raw RTP, one stream per session.
    Rtp,
    /// Transport-stream multiplexed.
    MpegTs,
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packaging::Rtp => write!(f, "rtp"),
            Packaging::MpegTs => write!(f, "mpegts"),
        }
    }
}

/// Ingestion-side capability of the receiver endpoint.
pub trait ReceiverEndpoint {
    /// Registers a receive session; returns the reader id the endpoint will
    /// populate as data for this session arrives.
    fn add_session(&self, descriptor: SessionDescriptor) -> Result<PortId, SessionError>;

    /// Whether the session behind `reader` has completed negotiation.
    fn session_ready(&self, reader: PortId) -> bool;

    /// Reader ids of all registered sessions, in ascending order.
    fn active_readers(&self) -> Vec<PortId>;
}

/// Egress-side capability of the transmitter endpoint.
pub trait TransmitterEndpoint {
    /// Registers a publish connection over readers already wired into the
    /// endpoint. Fails without mutation when any reader id is unknown.
    fn add_connection(
        &self,
        readers: &[PortId],
        stream_index: u32,
        packaging: Packaging,
        session_name: &str,
    ) -> Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_renders_a_summary_line() {
        let descriptor = SessionDescriptor {
            name: "cam-1".to_string(),
            medium: "audio".to_string(),
            protocol: "RTP".to_string(),
            payload_type: 97,
            codec: "OPUS".to_string(),
            bandwidth: 128,
            clock_rate: 48000,
            port: 5004,
            channels: 2,
        };
        let line = descriptor.to_string();
        assert!(line.contains("OPUS"));
        assert!(line.contains("48000Hz"));
        assert!(line.contains("@5004"));
    }
}
