// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for registry and path-wiring events.

use std::fmt::{Display, Formatter};

use crate::errors::{ConnectError, ConnectStage};
use crate::observability::messages::StructuredLog;
use crate::pipeline::PathId;
use crate::traits::FilterId;
use crate::workers::WorkerId;

/// A filter was added to the pipeline registry.
///
/// # Log Level
/// `debug!` - routine registry traffic
pub struct FilterRegistered<'a> {
    pub filter_id: FilterId,
    pub filter_type: &'a str,
}

impl Display for FilterRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered {} filter with id {}",
            self.filter_type, self.filter_id
        )
    }
}

impl StructuredLog for FilterRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            filter_id = self.filter_id,
            filter_type = self.filter_type,
            "{}", self
        );
    }
}

/// All hops of a path were wired successfully.
///
/// # Log Level
/// `info!` - important operational event
pub struct PathConnected {
    pub origin: FilterId,
    pub destination: FilterId,
    pub hops: usize,
}

impl Display for PathConnected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connected path {} -> {} ({} connection{})",
            self.origin,
            self.destination,
            self.hops,
            if self.hops == 1 { "" } else { "s" }
        )
    }
}

impl StructuredLog for PathConnected {
    fn log(&self) {
        tracing::info!(
            origin = self.origin,
            destination = self.destination,
            hops = self.hops,
            "{}", self
        );
    }
}

/// A filter refused a connection while wiring a path; the remaining steps
/// were abandoned.
///
/// # Log Level
/// `error!` - failure requiring attention
pub struct ConnectionFailed {
    pub stage: ConnectStage,
    pub from: FilterId,
    pub to: FilterId,
    pub error: ConnectError,
}

impl Display for ConnectionFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Error connecting {} ({} -> {}): {}",
            self.stage, self.from, self.to, self.error
        )
    }
}

impl StructuredLog for ConnectionFailed {
    fn log(&self) {
        tracing::error!(
            stage = %self.stage,
            from = self.from,
            to = self.to,
            error = %self.error,
            "{}", self
        );
    }
}

/// A worker was bound to a filter entry.
///
/// # Log Level
/// `debug!` - routine registry traffic
pub struct WorkerBound {
    pub worker_id: WorkerId,
    pub filter_id: FilterId,
}

impl Display for WorkerBound {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} now drives filter {}",
            self.worker_id, self.filter_id
        )
    }
}

impl StructuredLog for WorkerBound {
    fn log(&self) {
        tracing::debug!(
            worker_id = self.worker_id,
            filter_id = self.filter_id,
            "{}", self
        );
    }
}

/// A path value was added to the paths registry.
///
/// # Log Level
/// `debug!` - routine registry traffic
pub struct PathRegistered {
    pub path_id: PathId,
    pub hop_count: usize,
}

impl Display for PathRegistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registered path {} with {} intermediate filter{}",
            self.path_id,
            self.hop_count,
            if self.hop_count == 1 { "" } else { "s" }
        )
    }
}

impl StructuredLog for PathRegistered {
    fn log(&self) {
        tracing::debug!(
            path_id = self.path_id,
            hop_count = self.hop_count,
            "{}", self
        );
    }
}
