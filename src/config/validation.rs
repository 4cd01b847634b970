// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Checks a loaded [`Config`] for the problems that would otherwise surface
//! later as confusing session or wiring failures: an ingest side with
//! nothing to ingest, colliding input ports, ports outside the UDP range,
//! unusable stream parameters, and publish outputs that shadow each other by
//! name. All findings are collected so the operator sees the whole list at
//! once rather than fixing the file one error at a time.

use std::collections::HashSet;

use crate::config::Config;
use crate::errors::ValidationError;

/// Validates a configuration. Returns every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.inputs.is_empty() && config.sources.is_empty() {
        errors.push(ValidationError::NoInputs);
    }

    let mut seen_ports = HashSet::new();
    for input in &config.inputs {
        if !(1..=65535).contains(&input.port) {
            errors.push(ValidationError::InvalidPort { port: input.port });
        }
        if !seen_ports.insert(input.port) {
            errors.push(ValidationError::DuplicateInputPort { port: input.port });
        }
        if input.channels == 0 {
            errors.push(ValidationError::InvalidStreamParameters {
                port: input.port,
                reason: "channel count must be non-zero".to_string(),
            });
        }
        if input.clock_rate == 0 {
            errors.push(ValidationError::InvalidStreamParameters {
                port: input.port,
                reason: "clock rate must be non-zero".to_string(),
            });
        }
    }

    let mut seen_names = HashSet::new();
    for output in &config.outputs {
        if !seen_names.insert(output.name.as_str()) {
            errors.push(ValidationError::DuplicateOutputName {
                name: output.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
