// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BANDWIDTH, DEFAULT_CHANNELS, DEFAULT_CLOCK_RATE, DEFAULT_CODEC,
    DEFAULT_HANDSHAKE_INTERVAL_MS, DEFAULT_HANDSHAKE_RETRIES, DEFAULT_PAYLOAD_TYPE,
};
use crate::errors::ConfigError;
use crate::traits::{Packaging, PortId, SessionDescriptor};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the streaming engine.
///
/// Describes the ingest side (local ports and remote source uris), the
/// publish side (named output sessions), and a handful of engine knobs.
/// It is typically loaded from a YAML configuration file.
///
/// # Example
/// ```yaml
/// engine:
///   log_filter: info
///   handshake_retries: 60
/// inputs:
///   - port: 5004
///   - port: 5006
///     channels: 1
/// sources:
///   - rtsp://cam.example:8554/feed
/// outputs:
///   - name: plainrtp
///     stream_index: 1
///     packaging: rtp
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// Engine-level knobs.
///
/// # Fields
/// * `log_filter` - Tracing filter directive applied at startup (optional)
/// * `handshake_retries` - Retry ceiling for session handshake waits
/// * `handshake_interval_ms` - Interval between handshake polls
#[derive(Debug, Deserialize)]
pub struct EngineOptions {
    pub log_filter: Option<String>,
    #[serde(default = "default_handshake_retries")]
    pub handshake_retries: u32,
    #[serde(default = "default_handshake_interval_ms")]
    pub handshake_interval_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            log_filter: None,
            handshake_retries: DEFAULT_HANDSHAKE_RETRIES,
            handshake_interval_ms: DEFAULT_HANDSHAKE_INTERVAL_MS,
        }
    }
}

impl EngineOptions {
    pub fn handshake_interval(&self) -> Duration {
        Duration::from_millis(self.handshake_interval_ms)
    }
}

fn default_handshake_retries() -> u32 {
    DEFAULT_HANDSHAKE_RETRIES
}

fn default_handshake_interval_ms() -> u64 {
    DEFAULT_HANDSHAKE_INTERVAL_MS
}

/// Configuration for a single local input stream.
///
/// Only the port is required; everything else defaults to the parameters of
/// a stereo Opus stream.
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    pub port: PortId,
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default = "default_channels")]
    pub channels: u8,
    #[serde(default = "default_clock_rate")]
    pub clock_rate: u32,
    #[serde(default = "default_payload_type")]
    pub payload_type: u8,
    #[serde(default = "default_bandwidth")]
    pub bandwidth: u32,
}

impl InputConfig {
    /// An input on `port` with the default stream parameters.
    pub fn for_port(port: PortId) -> Self {
        Self {
            port,
            codec: default_codec(),
            channels: DEFAULT_CHANNELS,
            clock_rate: DEFAULT_CLOCK_RATE,
            payload_type: DEFAULT_PAYLOAD_TYPE,
            bandwidth: DEFAULT_BANDWIDTH,
        }
    }

    /// Builds the session descriptor the ingest endpoint expects for this
    /// input.
    pub fn descriptor(&self) -> SessionDescriptor {
        SessionDescriptor {
            name: format!("stream-{}", self.port),
            medium: "audio".to_string(),
            protocol: "RTP".to_string(),
            payload_type: self.payload_type,
            codec: self.codec.clone(),
            bandwidth: self.bandwidth,
            clock_rate: self.clock_rate,
            port: self.port,
            channels: self.channels,
        }
    }
}

fn default_codec() -> String {
    DEFAULT_CODEC.to_string()
}

fn default_channels() -> u8 {
    DEFAULT_CHANNELS
}

fn default_clock_rate() -> u32 {
    DEFAULT_CLOCK_RATE
}

fn default_payload_type() -> u8 {
    DEFAULT_PAYLOAD_TYPE
}

fn default_bandwidth() -> u32 {
    DEFAULT_BANDWIDTH
}

/// Configuration for a single publish output.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub name: String,
    pub stream_index: u32,
    pub packaging: Packaging,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let display = path.as_ref().display().to_string();
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    let cfg: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Validation failures are logged in full; the first one is returned.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(errors) = crate::config::validate_config(&cfg) {
        for error in &errors {
            tracing::error!(%error, "configuration validation failed");
        }
        if let Some(first) = errors.into_iter().next() {
            return Err(ConfigError::Validation(first));
        }
    }

    Ok(cfg)
}
