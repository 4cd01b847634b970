// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker thread lifecycle events.

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;
use crate::workers::WorkerId;

/// A worker's execution thread started its processing loop.
///
/// # Log Level
/// `info!` - important operational event
pub struct WorkerStarted {
    pub worker_id: WorkerId,
    pub assigned: usize,
}

impl Display for WorkerStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} started with {} assigned filter{}",
            self.worker_id,
            self.assigned,
            if self.assigned == 1 { "" } else { "s" }
        )
    }
}

impl StructuredLog for WorkerStarted {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            assigned = self.assigned,
            "{}", self
        );
    }
}

/// A worker's execution thread observed the stop signal and exited.
///
/// # Log Level
/// `info!` - important operational event
pub struct WorkerStopped {
    pub worker_id: WorkerId,
    pub passes: u64,
}

impl Display for WorkerStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} stopped after {} passes",
            self.worker_id, self.passes
        )
    }
}

impl StructuredLog for WorkerStopped {
    fn log(&self) {
        tracing::info!(
            worker_id = self.worker_id,
            passes = self.passes,
            "{}", self
        );
    }
}

/// A worker thread could not be spawned.
///
/// # Log Level
/// `error!` - failure requiring attention
pub struct WorkerSpawnFailed<'a> {
    pub worker_id: WorkerId,
    pub error: &'a std::io::Error,
}

impl Display for WorkerSpawnFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to spawn thread for worker {}: {}",
            self.worker_id, self.error
        )
    }
}

impl StructuredLog for WorkerSpawnFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker_id = self.worker_id,
            error = %self.error,
            "{}", self
        );
    }
}
