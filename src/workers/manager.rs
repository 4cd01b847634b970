// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::PipelineError;
use crate::observability::messages::worker::WorkerSpawnFailed;
use crate::observability::messages::StructuredLog;
use crate::workers::{Worker, WorkerId};

/// Registry of workers and owner of their aggregate lifecycle.
///
/// `stop_all` guarantees that no worker thread is still running once it
/// returns: every worker is signalled first, then every thread is joined.
#[derive(Default)]
pub struct WorkerManager {
    workers: Mutex<HashMap<WorkerId, Arc<Worker>>>,
}

impl WorkerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a worker. A duplicate id fails without mutating the
    /// registry.
    pub fn add_worker(&self, id: WorkerId, worker: Arc<Worker>) -> Result<(), PipelineError> {
        let mut workers = self.workers.lock();
        if workers.contains_key(&id) {
            return Err(PipelineError::DuplicateWorker(id));
        }
        workers.insert(id, worker);
        Ok(())
    }

    pub fn get_worker(&self, id: WorkerId) -> Option<Arc<Worker>> {
        self.workers.lock().get(&id).cloned()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.lock().len()
    }

    /// Starts every registered worker's execution thread. Workers that are
    /// already running are left alone; a spawn failure is reported and the
    /// remaining workers are still started.
    pub fn start_all(&self) {
        let snapshot: Vec<Arc<Worker>> = self.workers.lock().values().cloned().collect();
        for worker in snapshot {
            if let Err(e) = worker.start() {
                WorkerSpawnFailed {
                    worker_id: worker.id(),
                    error: &e,
                }
                .log();
            }
        }
    }

    /// Signals every worker to exit at its next pass boundary, then joins
    /// every thread before returning.
    pub fn stop_all(&self) {
        let snapshot: Vec<Arc<Worker>> = self.workers.lock().values().cloned().collect();
        for worker in &snapshot {
            worker.signal_stop();
        }
        for worker in &snapshot {
            worker.join();
        }
    }
}
