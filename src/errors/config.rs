// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors that can occur while validating a loaded pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither local input ports nor remote source uris were configured
    NoInputs,
    /// Two input stream entries claim the same port
    DuplicateInputPort {
        port: i32,
    },
    /// An input port is outside the valid UDP port range
    InvalidPort {
        port: i32,
    },
    /// Two publish outputs share the same session name
    DuplicateOutputName {
        name: String,
    },
    /// An input stream declares zero channels or a zero clock rate
    InvalidStreamParameters {
        port: i32,
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoInputs => {
                write!(f, "configuration declares no input ports and no source uris")
            }
            ValidationError::DuplicateInputPort { port } => {
                write!(f, "input port {} is declared more than once", port)
            }
            ValidationError::InvalidPort { port } => {
                write!(f, "input port {} is outside the valid range 1-65535", port)
            }
            ValidationError::DuplicateOutputName { name } => {
                write!(f, "output session name '{}' is declared more than once", name)
            }
            ValidationError::InvalidStreamParameters { port, reason } => {
                write!(f, "input stream on port {} is invalid: {}", port, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors surfaced by the configuration loader.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
}
