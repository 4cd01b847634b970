// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Application context owning the pipeline and worker managers.
//!
//! Construction and teardown are explicit: the context is built once by the
//! controlling logic and passed by reference to whatever needs the managers.
//! Teardown stops and joins every worker before the registries can go away,
//! so no worker thread ever observes a released registry. An interrupt
//! handler must only request shutdown (set a flag); the actual
//! [`Context::shutdown`] call belongs on the main control thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::pipeline::PipelineManager;
use crate::traits::Filter;
use crate::workers::WorkerManager;

pub struct Context {
    pipeline: Arc<PipelineManager>,
    workers: Arc<WorkerManager>,
    stopped: AtomicBool,
}

impl Context {
    /// Builds the worker manager and a pipeline manager seeded with the two
    /// endpoint filters.
    pub fn new(receiver: Arc<dyn Filter>, transmitter: Arc<dyn Filter>) -> Self {
        let workers = Arc::new(WorkerManager::new());
        let pipeline = Arc::new(PipelineManager::new(
            receiver,
            transmitter,
            Arc::clone(&workers),
        ));
        Self {
            pipeline,
            workers,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn pipeline(&self) -> &Arc<PipelineManager> {
        &self.pipeline
    }

    pub fn workers(&self) -> &Arc<WorkerManager> {
        &self.workers
    }

    /// Stops and joins every worker thread. Idempotent; later calls are
    /// no-ops.
    pub fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.workers.stop_all();
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.shutdown();
    }
}
