// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Central registry of filters and paths, and the path-wiring algorithm.
//!
//! The manager owns two registries (filters by id, paths by id) plus the two
//! distinguished endpoint filters fixed at construction: the ingestion
//! front-end and the egress front-end. Registries are mutated during setup
//! and at runtime (new paths arrive while other paths are streaming), so
//! each sits behind its own lock; the critical sections are reference
//! lookups only, and path wiring happens outside the locks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::{ConnectError, ConnectStage, PipelineError};
use crate::observability::messages::pipeline::{
    ConnectionFailed, FilterRegistered, PathConnected, PathRegistered, WorkerBound,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{Path, PathId};
use crate::traits::{Filter, FilterId, FilterType, PortId};
use crate::workers::{Worker, WorkerManager};

/// Fixed id of the ingestion endpoint filter.
pub const RECEIVER_ID: FilterId = 0;

/// Fixed id of the egress endpoint filter.
pub const TRANSMITTER_ID: FilterId = 1;

/// One registry slot: the filter and the worker currently driving it.
/// The worker reference is replaced on reassignment, never merged.
struct FilterEntry {
    filter: Arc<dyn Filter>,
    worker: Option<Arc<Worker>>,
}

/// The pipeline registry and orchestrator.
pub struct PipelineManager {
    filters: Mutex<HashMap<FilterId, FilterEntry>>,
    paths: Mutex<HashMap<PathId, Path>>,
    workers: Arc<WorkerManager>,
}

impl PipelineManager {
    /// Builds a manager with the two endpoint filters pre-registered at
    /// [`RECEIVER_ID`] and [`TRANSMITTER_ID`].
    pub fn new(
        receiver: Arc<dyn Filter>,
        transmitter: Arc<dyn Filter>,
        workers: Arc<WorkerManager>,
    ) -> Self {
        let mut filters = HashMap::new();
        filters.insert(
            RECEIVER_ID,
            FilterEntry {
                filter: receiver,
                worker: None,
            },
        );
        filters.insert(
            TRANSMITTER_ID,
            FilterEntry {
                filter: transmitter,
                worker: None,
            },
        );

        Self {
            filters: Mutex::new(filters),
            paths: Mutex::new(HashMap::new()),
            workers,
        }
    }

    /// Registers a filter under a caller-chosen id. A duplicate id fails
    /// without mutating the registry.
    pub fn add_filter(&self, id: FilterId, filter: Arc<dyn Filter>) -> Result<(), PipelineError> {
        let mut filters = self.filters.lock();
        if filters.contains_key(&id) {
            return Err(PipelineError::DuplicateFilter(id));
        }
        FilterRegistered {
            filter_id: id,
            filter_type: filter_type_name(filter.filter_type()),
        }
        .log();
        filters.insert(
            id,
            FilterEntry {
                filter,
                worker: None,
            },
        );
        Ok(())
    }

    /// Registers a path value. A duplicate id fails without mutation.
    pub fn add_path(&self, id: PathId, path: Path) -> Result<(), PipelineError> {
        let mut paths = self.paths.lock();
        if paths.contains_key(&id) {
            return Err(PipelineError::DuplicatePath(id));
        }
        PathRegistered {
            path_id: id,
            hop_count: path.intermediates().len(),
        }
        .log();
        paths.insert(id, path);
        Ok(())
    }

    /// Registers `worker` and gives it `filter_id` to drive as a dedicated
    /// assignment. Fails when the filter id is unknown (the worker's
    /// assignment set stays empty) or when the worker id is already taken.
    pub fn add_worker(&self, filter_id: FilterId, worker: Arc<Worker>) -> Result<(), PipelineError> {
        let mut filters = self.filters.lock();
        let entry = filters
            .get_mut(&filter_id)
            .ok_or(PipelineError::UnknownFilter(filter_id))?;

        self.workers.add_worker(worker.id(), Arc::clone(&worker))?;

        worker.set_processor(filter_id, Arc::clone(&entry.filter));
        WorkerBound {
            worker_id: worker.id(),
            filter_id,
        }
        .log();
        entry.worker = Some(worker);
        Ok(())
    }

    pub fn get_filter(&self, id: FilterId) -> Option<Arc<dyn Filter>> {
        self.filters.lock().get(&id).map(|e| Arc::clone(&e.filter))
    }

    pub fn get_path(&self, id: PathId) -> Option<Path> {
        self.paths.lock().get(&id).cloned()
    }

    /// All registered paths with their ids.
    pub fn paths(&self) -> Vec<(PathId, Path)> {
        let mut all: Vec<(PathId, Path)> = self
            .paths
            .lock()
            .iter()
            .map(|(id, p)| (*id, p.clone()))
            .collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Linear scan for a registered filter of the given kind.
    pub fn find_filter_by_type(&self, filter_type: FilterType) -> Option<FilterId> {
        self.filters
            .lock()
            .iter()
            .find(|(_, entry)| entry.filter.filter_type() == filter_type)
            .map(|(id, _)| *id)
    }

    /// Pure factory for a path value; does not touch the registries.
    pub fn create_path(
        &self,
        origin: FilterId,
        destination: FilterId,
        org_writer: PortId,
        dst_reader: PortId,
        intermediates: Vec<FilterId>,
    ) -> Path {
        Path::new(origin, destination, org_writer, dst_reader, intermediates)
    }

    /// Wires a path's filters together, in path order.
    ///
    /// A path without intermediates gets a single many-to-many link from
    /// origin to destination. Otherwise the origin's selected output is
    /// collapsed many-to-one onto the first intermediate, consecutive
    /// intermediates are chained one-to-one, and the last intermediate feeds
    /// the destination's selected reader one-to-many.
    ///
    /// The first refused connection aborts the remaining steps and is
    /// returned as [`PipelineError::ConnectionRefused`]; connections already
    /// established are left in place for the caller to deal with.
    pub fn connect_path(&self, path: &Path) -> Result<(), PipelineError> {
        // Resolve every referenced filter up front, then wire outside the
        // registry lock. Filters are never removed, so the references stay
        // valid.
        let (origin, destination, intermediates) = {
            let filters = self.filters.lock();
            let origin = resolve(&filters, path.origin())?;
            let destination = resolve(&filters, path.destination())?;
            let intermediates = path
                .intermediates()
                .iter()
                .map(|id| resolve(&filters, *id).map(|f| (*id, f)))
                .collect::<Result<Vec<_>, _>>()?;
            (origin, destination, intermediates)
        };

        if intermediates.is_empty() {
            origin
                .connect_many_to_many(destination.as_ref(), path.dst_reader(), path.org_writer())
                .map_err(|source| {
                    refused(
                        ConnectStage::HeadToTail,
                        path.origin(),
                        path.destination(),
                        source,
                    )
                })?;
            PathConnected {
                origin: path.origin(),
                destination: path.destination(),
                hops: 1,
            }
            .log();
            return Ok(());
        }

        let (first_id, first) = &intermediates[0];
        origin
            .connect_many_to_one(first.as_ref(), path.org_writer())
            .map_err(|source| {
                refused(ConnectStage::HeadToFirst, path.origin(), *first_id, source)
            })?;

        for pair in intermediates.windows(2) {
            let (from_id, from) = &pair[0];
            let (to_id, to) = &pair[1];
            from.connect_one_to_one(to.as_ref())
                .map_err(|source| refused(ConnectStage::Intermediate, *from_id, *to_id, source))?;
        }

        let (last_id, last) = &intermediates[intermediates.len() - 1];
        last.connect_one_to_many(destination.as_ref(), path.dst_reader())
            .map_err(|source| {
                refused(ConnectStage::LastToTail, *last_id, path.destination(), source)
            })?;

        PathConnected {
            origin: path.origin(),
            destination: path.destination(),
            hops: intermediates.len() + 1,
        }
        .log();
        Ok(())
    }

    /// Gives one worker every intermediate filter of a path as a shared
    /// assignment, overwriting each entry's previous worker binding. The
    /// endpoints keep their own workers.
    pub fn add_worker_to_path(&self, path: &Path, worker: Arc<Worker>) -> Result<(), PipelineError> {
        if path.intermediates().is_empty() {
            return Err(PipelineError::EmptyPath);
        }

        let mut filters = self.filters.lock();
        // Validate every id before mutating anything.
        for id in path.intermediates() {
            if !filters.contains_key(id) {
                return Err(PipelineError::UnknownFilter(*id));
            }
        }
        for id in path.intermediates() {
            if let Some(entry) = filters.get_mut(id) {
                worker.add_processor(*id, Arc::clone(&entry.filter));
                WorkerBound {
                    worker_id: worker.id(),
                    filter_id: *id,
                }
                .log();
                entry.worker = Some(Arc::clone(&worker));
            }
        }
        Ok(())
    }

    /// The ingestion endpoint, when it exposes the receiver capability.
    pub fn get_receiver(&self) -> Option<Arc<dyn Filter>> {
        let filter = self.get_filter(RECEIVER_ID)?;
        filter.as_receiver().is_some().then_some(filter)
    }

    /// The egress endpoint, when it exposes the transmitter capability.
    pub fn get_transmitter(&self) -> Option<Arc<dyn Filter>> {
        let filter = self.get_filter(TRANSMITTER_ID)?;
        filter.as_transmitter().is_some().then_some(filter)
    }

    /// Starts every registered worker's execution thread.
    pub fn start_workers(&self) {
        self.workers.start_all();
    }

    /// Stops and joins every registered worker's execution thread.
    pub fn stop(&self) {
        self.workers.stop_all();
    }
}

fn resolve(
    filters: &HashMap<FilterId, FilterEntry>,
    id: FilterId,
) -> Result<Arc<dyn Filter>, PipelineError> {
    filters
        .get(&id)
        .map(|e| Arc::clone(&e.filter))
        .ok_or(PipelineError::UnknownFilter(id))
}

fn refused(
    stage: ConnectStage,
    from: FilterId,
    to: FilterId,
    source: ConnectError,
) -> PipelineError {
    ConnectionFailed {
        stage,
        from,
        to,
        error: source,
    }
    .log();
    PipelineError::ConnectionRefused { stage, source }
}

fn filter_type_name(filter_type: FilterType) -> &'static str {
    match filter_type {
        FilterType::Receiver => "receiver",
        FilterType::Transmitter => "transmitter",
        FilterType::AudioDecoder => "audio_decoder",
        FilterType::AudioEncoder => "audio_encoder",
        FilterType::AudioMixer => "audio_mixer",
        FilterType::Gain => "gain",
    }
}
