// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Manager-level tests exercising the registries, the path-wiring algorithm
//! and the worker bindings together.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::{ConnectError, ConnectStage, PipelineError};
use crate::filters::{AudioMixer, Gain, RtpReceiver, RtpTransmitter};
use crate::pipeline::{PipelineManager, RECEIVER_ID, TRANSMITTER_ID};
use crate::traits::{wire, Filter, FilterCore, FilterType, PortId, Step, DEFAULT_PORT};
use crate::workers::{Worker, WorkerManager};

fn manager() -> PipelineManager {
    PipelineManager::new(
        Arc::new(RtpReceiver::new()),
        Arc::new(RtpTransmitter::new()),
        Arc::new(WorkerManager::new()),
    )
}

/// Test double that records which connection operation ran on it, in a log
/// shared across the whole scenario, while keeping the stock semantics.
struct Recording {
    core: FilterCore,
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    fn new(label: &'static str, single: bool, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            core: if single {
                FilterCore::single()
            } else {
                FilterCore::multiplexed()
            },
            label,
            log: Arc::clone(log),
        }
    }

    fn record(&self, op: &str) {
        self.log.lock().push(format!("{}:{}", self.label, op));
    }
}

impl Filter for Recording {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn filter_type(&self) -> FilterType {
        FilterType::AudioEncoder
    }

    fn process(&self) -> Step {
        Step::Idle
    }

    fn connect_many_to_many(
        &self,
        dst: &dyn Filter,
        dst_reader: PortId,
        org_writer: PortId,
    ) -> Result<(), ConnectError> {
        self.record("many_to_many");
        wire(self.core(), dst.core(), org_writer, dst_reader)
    }

    fn connect_many_to_one(&self, dst: &dyn Filter, org_writer: PortId) -> Result<(), ConnectError> {
        self.record("many_to_one");
        if dst.core().has_readers() {
            return Err(ConnectError::ReaderCapacity(1));
        }
        wire(self.core(), dst.core(), org_writer, DEFAULT_PORT)
    }

    fn connect_one_to_one(&self, dst: &dyn Filter) -> Result<(), ConnectError> {
        self.record("one_to_one");
        if self.core().has_writers() {
            return Err(ConnectError::WriterCapacity(1));
        }
        if dst.core().has_readers() {
            return Err(ConnectError::ReaderCapacity(1));
        }
        wire(self.core(), dst.core(), DEFAULT_PORT, DEFAULT_PORT)
    }

    fn connect_one_to_many(&self, dst: &dyn Filter, dst_reader: PortId) -> Result<(), ConnectError> {
        self.record("one_to_many");
        if self.core().has_writers() {
            return Err(ConnectError::WriterCapacity(1));
        }
        wire(self.core(), dst.core(), DEFAULT_PORT, dst_reader)
    }
}

#[test]
fn endpoints_are_preregistered_under_fixed_ids() {
    let pipe = manager();
    assert!(pipe.get_filter(RECEIVER_ID).is_some());
    assert!(pipe.get_filter(TRANSMITTER_ID).is_some());
    assert!(pipe.get_receiver().is_some());
    assert!(pipe.get_transmitter().is_some());

    // The endpoint slots cannot be re-registered.
    assert_eq!(
        pipe.add_filter(RECEIVER_ID, Arc::new(Gain::unity())),
        Err(PipelineError::DuplicateFilter(RECEIVER_ID))
    );
}

#[test]
fn endpoint_accessors_check_the_capability() {
    // A manager built with non-endpoint filters in the endpoint slots.
    let pipe = PipelineManager::new(
        Arc::new(Gain::unity()),
        Arc::new(Gain::unity()),
        Arc::new(WorkerManager::new()),
    );
    assert!(pipe.get_filter(RECEIVER_ID).is_some());
    assert!(pipe.get_receiver().is_none());
    assert!(pipe.get_transmitter().is_none());
}

#[test]
fn filter_registration_refuses_duplicates_without_mutation() {
    let pipe = manager();
    pipe.add_filter(10, Arc::new(AudioMixer::new())).unwrap();
    assert_eq!(
        pipe.add_filter(10, Arc::new(Gain::unity())),
        Err(PipelineError::DuplicateFilter(10))
    );
    // The original registration survives.
    let kept = pipe.get_filter(10).unwrap();
    assert_eq!(kept.filter_type(), FilterType::AudioMixer);
}

#[test]
fn path_registration_refuses_duplicates() {
    let pipe = manager();
    let path = pipe.create_path(RECEIVER_ID, TRANSMITTER_ID, 5004, 3, vec![]);
    pipe.add_path(1, path.clone()).unwrap();
    assert_eq!(pipe.add_path(1, path.clone()), Err(PipelineError::DuplicatePath(1)));
    assert_eq!(pipe.paths().len(), 1);

    // The value round-trips through the registry unchanged.
    assert_eq!(pipe.get_path(1), Some(path));
}

#[test]
fn connect_path_rejects_unknown_filters_before_wiring() {
    let pipe = manager();
    let path = pipe.create_path(RECEIVER_ID, 99, 5004, 3, vec![]);
    assert_eq!(
        pipe.connect_path(&path),
        Err(PipelineError::UnknownFilter(99))
    );
}

#[test]
fn direct_path_uses_a_single_many_to_many_link() {
    let pipe = manager();
    let log = Arc::new(Mutex::new(Vec::new()));
    pipe.add_filter(10, Arc::new(Recording::new("src", false, &log)))
        .unwrap();
    pipe.add_filter(20, Arc::new(Recording::new("dst", false, &log)))
        .unwrap();

    let path = pipe.create_path(10, 20, 5004, 3, vec![]);
    pipe.connect_path(&path).unwrap();

    assert_eq!(*log.lock(), vec!["src:many_to_many"]);
    let src = pipe.get_filter(10).unwrap();
    let dst = pipe.get_filter(20).unwrap();
    assert_eq!(src.core().writer_ports(), vec![5004]);
    assert_eq!(dst.core().reader_ports(), vec![3]);
}

#[test]
fn chained_path_wires_stages_in_order() {
    // origin -> encoder1 -> encoder2 -> destination, one connection per hop
    // boundary.
    let pipe = manager();
    let log = Arc::new(Mutex::new(Vec::new()));
    pipe.add_filter(10, Arc::new(Recording::new("origin", false, &log)))
        .unwrap();
    pipe.add_filter(11, Arc::new(Recording::new("enc1", true, &log)))
        .unwrap();
    pipe.add_filter(12, Arc::new(Recording::new("enc2", true, &log)))
        .unwrap();
    pipe.add_filter(20, Arc::new(Recording::new("sink", false, &log)))
        .unwrap();

    let path = pipe.create_path(10, 20, 5004, 3, vec![11, 12]);
    pipe.connect_path(&path).unwrap();

    assert_eq!(
        *log.lock(),
        vec!["origin:many_to_one", "enc1:one_to_one", "enc2:one_to_many"]
    );

    // End-to-end frame flow through the freshly wired chain.
    let origin = pipe.get_filter(10).unwrap();
    let sink = pipe.get_filter(20).unwrap();
    origin
        .core()
        .writer(5004)
        .unwrap()
        .try_send(crate::frame::Frame::new(vec![7]))
        .unwrap();
    let enc1 = pipe.get_filter(11).unwrap();
    let enc2 = pipe.get_filter(12).unwrap();
    let frame = enc1.core().try_recv(DEFAULT_PORT).unwrap();
    enc1.core().writer(DEFAULT_PORT).unwrap().try_send(frame).unwrap();
    let frame = enc2.core().try_recv(DEFAULT_PORT).unwrap();
    enc2.core().writer(DEFAULT_PORT).unwrap().try_send(frame).unwrap();
    assert_eq!(sink.core().try_recv(3).unwrap().payload, vec![7]);
}

#[test]
fn first_refused_stage_aborts_the_remaining_steps() {
    let pipe = manager();
    let log = Arc::new(Mutex::new(Vec::new()));
    pipe.add_filter(10, Arc::new(Recording::new("origin", false, &log)))
        .unwrap();
    pipe.add_filter(11, Arc::new(Recording::new("enc1", true, &log)))
        .unwrap();
    let enc2 = Arc::new(Recording::new("enc2", true, &log));
    pipe.add_filter(12, Arc::clone(&enc2) as Arc<dyn Filter>)
        .unwrap();
    pipe.add_filter(20, Arc::new(Recording::new("sink", false, &log)))
        .unwrap();

    // Occupy enc2's only reader slot so the intermediate hop is refused.
    let squatter = Recording::new("squatter", false, &log);
    wire(squatter.core(), enc2.core(), 0, DEFAULT_PORT).unwrap();

    let path = pipe.create_path(10, 20, 5004, 3, vec![11, 12]);
    let result = pipe.connect_path(&path);
    assert!(matches!(
        result,
        Err(PipelineError::ConnectionRefused {
            stage: ConnectStage::Intermediate,
            ..
        })
    ));

    // The stage after the failure never ran.
    assert_eq!(*log.lock(), vec!["origin:many_to_one", "enc1:one_to_one"]);

    // Connections made before the failure are left in place.
    let origin = pipe.get_filter(10).unwrap();
    assert_eq!(origin.core().writer_ports(), vec![5004]);
}

#[test]
fn add_worker_binds_filter_and_registers_the_worker() {
    let workers = Arc::new(WorkerManager::new());
    let pipe = PipelineManager::new(
        Arc::new(RtpReceiver::new()),
        Arc::new(RtpTransmitter::new()),
        Arc::clone(&workers),
    );
    pipe.add_filter(10, Arc::new(AudioMixer::new())).unwrap();

    let worker = Arc::new(Worker::new(7));
    pipe.add_worker(10, Arc::clone(&worker)).unwrap();
    assert_eq!(worker.assigned_filters(), vec![10]);
    assert_eq!(workers.worker_count(), 1);

    // A second worker under the same id is refused.
    assert_eq!(
        pipe.add_worker(10, Arc::new(Worker::new(7))),
        Err(PipelineError::DuplicateWorker(7))
    );
}

#[test]
fn add_worker_for_an_unknown_filter_leaves_the_worker_unassigned() {
    let workers = Arc::new(WorkerManager::new());
    let pipe = PipelineManager::new(
        Arc::new(RtpReceiver::new()),
        Arc::new(RtpTransmitter::new()),
        Arc::clone(&workers),
    );

    let worker = Arc::new(Worker::new(7));
    assert_eq!(
        pipe.add_worker(99, Arc::clone(&worker)),
        Err(PipelineError::UnknownFilter(99))
    );
    assert_eq!(worker.assignment_count(), 0);
    assert_eq!(workers.worker_count(), 0);
}

#[test]
fn path_worker_assignment_covers_every_intermediate() {
    let pipe = manager();
    pipe.add_filter(11, Arc::new(Gain::unity())).unwrap();
    pipe.add_filter(12, Arc::new(Gain::unity())).unwrap();

    let path = pipe.create_path(RECEIVER_ID, TRANSMITTER_ID, 5004, 3, vec![11, 12]);
    let worker = Arc::new(Worker::new(5));
    pipe.add_worker_to_path(&path, Arc::clone(&worker)).unwrap();
    assert_eq!(worker.assigned_filters(), vec![11, 12]);
}

#[test]
fn path_worker_assignment_rejects_direct_paths_and_unknown_hops() {
    let pipe = manager();
    let worker = Arc::new(Worker::new(5));

    let direct = pipe.create_path(RECEIVER_ID, TRANSMITTER_ID, 5004, 3, vec![]);
    assert_eq!(
        pipe.add_worker_to_path(&direct, Arc::clone(&worker)),
        Err(PipelineError::EmptyPath)
    );

    let broken = pipe.create_path(RECEIVER_ID, TRANSMITTER_ID, 5004, 3, vec![99]);
    assert_eq!(
        pipe.add_worker_to_path(&broken, Arc::clone(&worker)),
        Err(PipelineError::UnknownFilter(99))
    );
    assert_eq!(worker.assignment_count(), 0);
}

#[test]
fn find_filter_by_type_scans_the_registry() {
    let pipe = manager();
    assert_eq!(pipe.find_filter_by_type(FilterType::AudioMixer), None);

    pipe.add_filter(10, Arc::new(AudioMixer::new())).unwrap();
    assert_eq!(pipe.find_filter_by_type(FilterType::AudioMixer), Some(10));
    assert_eq!(pipe.find_filter_by_type(FilterType::Receiver), Some(RECEIVER_ID));
}
