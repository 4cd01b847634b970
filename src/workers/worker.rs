// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Thread-owning worker that drives assigned filters.
//!
//! Each worker owns exactly one native thread. The loop makes one pass over
//! the assignment set per iteration, attempting one unit of work per filter;
//! a filter with no input or with downstream backpressure is skipped for the
//! pass, never waited on. A pass that makes no progress sleeps briefly so a
//! worker servicing only low-rate filters does not spin.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use crate::observability::messages::worker::{WorkerStarted, WorkerStopped};
use crate::observability::messages::StructuredLog;
use crate::traits::{Filter, FilterId, Step};

/// Opaque integer handle for a registered worker, chosen by the caller.
pub type WorkerId = i32;

/// Sleep between passes when no assigned filter made progress.
const IDLE_WAIT: Duration = Duration::from_millis(1);

/// A thread-owning scheduler driving one or more filters.
pub struct Worker {
    id: WorkerId,
    assignments: Arc<Mutex<HashMap<FilterId, Arc<dyn Filter>>>>,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            assignments: Arc::new(Mutex::new(HashMap::new())),
            running: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Replaces the entire assignment set with a single filter
    /// (dedicated mode).
    pub fn set_processor(&self, filter_id: FilterId, filter: Arc<dyn Filter>) {
        let mut assignments = self.assignments.lock();
        assignments.clear();
        assignments.insert(filter_id, filter);
    }

    /// Adds a filter to the assignment set without removing existing
    /// entries (shared mode).
    pub fn add_processor(&self, filter_id: FilterId, filter: Arc<dyn Filter>) {
        self.assignments.lock().insert(filter_id, filter);
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.lock().len()
    }

    /// Ids of the currently assigned filters, in ascending order.
    pub fn assigned_filters(&self) -> Vec<FilterId> {
        let mut ids: Vec<FilterId> = self.assignments.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawns the execution thread. A worker that is already running keeps
    /// its current thread.
    pub fn start(&self) -> std::io::Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let id = self.id;
        let assignments = Arc::clone(&self.assignments);
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name(format!("worker-{}", id))
            .spawn(move || run_loop(id, assignments, running));

        match spawned {
            Ok(handle) => {
                *self.handle.lock() = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Requests the loop to exit at the next pass boundary. Safe to call
    /// from any thread; does not wait for the exit.
    pub fn signal_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Joins the execution thread, if one was started.
    pub fn join(&self) {
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(
    id: WorkerId,
    assignments: Arc<Mutex<HashMap<FilterId, Arc<dyn Filter>>>>,
    running: Arc<AtomicBool>,
) {
    WorkerStarted {
        worker_id: id,
        assigned: assignments.lock().len(),
    }
    .log();

    let mut passes: u64 = 0;
    while running.load(Ordering::SeqCst) {
        // Snapshot under the lock, process outside it, so registry and
        // assignment mutation never waits on a filter's work.
        let snapshot: Vec<Arc<dyn Filter>> = assignments.lock().values().cloned().collect();

        let mut progressed = false;
        for filter in &snapshot {
            match filter.process() {
                Step::Processed => progressed = true,
                // Skipped for this pass; the next pass retries.
                Step::Idle | Step::Blocked => {}
            }
        }
        passes += 1;

        if progressed {
            thread::yield_now();
        } else {
            thread::sleep(IDLE_WAIT);
        }
    }

    WorkerStopped {
        worker_id: id,
        passes,
    }
    .log();
}
