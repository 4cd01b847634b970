// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The filter capability contract.
//!
//! A filter is a processing node with zero or more reader (input) slots and
//! writer (output) slots, each identified by a [`PortId`]. Filters are wired
//! together through four connection operations with different fan semantics:
//!
//! * `many_to_many` — both sides multiplex several logical streams over one
//!   physical link (e.g. several sessions sharing one receiver).
//! * `many_to_one` — collapses a multiplexed output onto a single-input
//!   filter, selecting which of the origin's outputs feeds the chain.
//! * `one_to_one` — internal chain hop; no port disambiguation needed.
//! * `one_to_many` — single-output filter feeding a multiplexed destination,
//!   selected by the destination's reader id.
//!
//! Each operation either establishes a bounded frame channel between the two
//! filters or refuses with a [`ConnectError`]; a refusal mutates neither
//! side. Concrete filters embed a [`FilterCore`] for the slot bookkeeping and
//! get the connection operations as provided methods.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::errors::ConnectError;
use crate::frame::{frame_channel, Frame, FrameReceiver, FrameSender};
use crate::traits::endpoint::{ReceiverEndpoint, TransmitterEndpoint};

/// Opaque integer handle for a registered filter, chosen by the caller.
pub type FilterId = i32;

/// Index disambiguating one of several reader or writer slots on a
/// multiplexing filter.
pub type PortId = i32;

/// Conventional port id for filters with a single logical slot. This is an
/// ordinary map key, not a sentinel: the receiver side keys slots by client
/// port number, internal filters use the default.
pub const DEFAULT_PORT: PortId = -1;

/// Type tag used for registry lookup by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Receiver,
    Transmitter,
    AudioDecoder,
    AudioEncoder,
    AudioMixer,
    Gain,
}

/// Outcome of one unit of processing work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The filter consumed and/or produced data.
    Processed,
    /// No input was available; try again on a later pass.
    Idle,
    /// A downstream link is full; the filter kept its input intact.
    Blocked,
}

/// Reader/writer slot bookkeeping shared by all filters.
///
/// Capacity limits are optional: `None` means the side multiplexes an
/// unbounded number of slots, `Some(n)` refuses the `n+1`-th binding.
pub struct FilterCore {
    readers: Mutex<HashMap<PortId, FrameReceiver>>,
    writers: Mutex<HashMap<PortId, FrameSender>>,
    max_readers: Option<usize>,
    max_writers: Option<usize>,
}

impl FilterCore {
    pub fn new(max_readers: Option<usize>, max_writers: Option<usize>) -> Self {
        Self {
            readers: Mutex::new(HashMap::new()),
            writers: Mutex::new(HashMap::new()),
            max_readers,
            max_writers,
        }
    }

    /// Core for an internal chain filter: one input, one output.
    pub fn single() -> Self {
        Self::new(Some(1), Some(1))
    }

    /// Core for an endpoint that multiplexes on both sides.
    pub fn multiplexed() -> Self {
        Self::new(None, None)
    }

    pub fn reader(&self, port: PortId) -> Option<FrameReceiver> {
        self.readers.lock().get(&port).cloned()
    }

    pub fn writer(&self, port: PortId) -> Option<FrameSender> {
        self.writers.lock().get(&port).cloned()
    }

    /// Bound reader slot ids, in ascending order.
    pub fn reader_ports(&self) -> Vec<PortId> {
        let mut ports: Vec<PortId> = self.readers.lock().keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    /// Bound writer slot ids, in ascending order.
    pub fn writer_ports(&self) -> Vec<PortId> {
        let mut ports: Vec<PortId> = self.writers.lock().keys().copied().collect();
        ports.sort_unstable();
        ports
    }

    pub fn has_readers(&self) -> bool {
        !self.readers.lock().is_empty()
    }

    pub fn has_writers(&self) -> bool {
        !self.writers.lock().is_empty()
    }

    /// Non-blocking receive from one reader slot.
    pub fn try_recv(&self, port: PortId) -> Option<Frame> {
        let rx = self.reader(port)?;
        rx.try_recv().ok()
    }

    fn bind_writer(&self, port: PortId, tx: FrameSender) -> Result<(), ConnectError> {
        let mut writers = self.writers.lock();
        if writers.contains_key(&port) {
            return Err(ConnectError::WriterBound(port));
        }
        if let Some(max) = self.max_writers {
            if writers.len() >= max {
                return Err(ConnectError::WriterCapacity(max));
            }
        }
        writers.insert(port, tx);
        Ok(())
    }

    fn bind_reader(&self, port: PortId, rx: FrameReceiver) -> Result<(), ConnectError> {
        let mut readers = self.readers.lock();
        if readers.contains_key(&port) {
            return Err(ConnectError::ReaderBound(port));
        }
        if let Some(max) = self.max_readers {
            if readers.len() >= max {
                return Err(ConnectError::ReaderCapacity(max));
            }
        }
        readers.insert(port, rx);
        Ok(())
    }

    fn unbind_writer(&self, port: PortId) {
        self.writers.lock().remove(&port);
    }
}

/// Establishes one bounded link from `src`'s writer slot to `dst`'s reader
/// slot. The writer side is bound first; if the reader side then refuses,
/// the writer binding is removed again before the error is returned. Either
/// way a refusal leaves both filters exactly as they were, even when
/// another thread is wiring into the same destination concurrently.
pub fn wire(
    src: &FilterCore,
    dst: &FilterCore,
    org_writer: PortId,
    dst_reader: PortId,
) -> Result<(), ConnectError> {
    if std::ptr::eq(src, dst) {
        return Err(ConnectError::SelfConnection);
    }

    let (tx, rx) = frame_channel();
    src.bind_writer(org_writer, tx)?;
    if let Err(refusal) = dst.bind_reader(dst_reader, rx) {
        src.unbind_writer(org_writer);
        return Err(refusal);
    }
    Ok(())
}

/// A processing node in the pipeline graph.
///
/// Implementations must be driveable from any worker thread: `process`
/// performs at most one unit of work and returns [`Step::Idle`] or
/// [`Step::Blocked`] instead of waiting.
pub trait Filter: Send + Sync {
    /// Slot bookkeeping for this filter.
    fn core(&self) -> &FilterCore;

    /// Type tag for lookup by kind.
    fn filter_type(&self) -> FilterType;

    /// One unit of processing work; must not block.
    fn process(&self) -> Step;

    /// Narrow to the ingestion endpoint capability, when supported.
    fn as_receiver(&self) -> Option<&dyn ReceiverEndpoint> {
        None
    }

    /// Narrow to the egress endpoint capability, when supported.
    fn as_transmitter(&self) -> Option<&dyn TransmitterEndpoint> {
        None
    }

    /// Multiplexed origin to multiplexed destination over one physical link.
    fn connect_many_to_many(
        &self,
        dst: &dyn Filter,
        dst_reader: PortId,
        org_writer: PortId,
    ) -> Result<(), ConnectError> {
        wire(self.core(), dst.core(), org_writer, dst_reader)
    }

    /// Collapses this filter's possibly-multiplexed output onto a
    /// single-input destination; `org_writer` selects which output feeds it.
    fn connect_many_to_one(
        &self,
        dst: &dyn Filter,
        org_writer: PortId,
    ) -> Result<(), ConnectError> {
        if dst.core().has_readers() {
            return Err(ConnectError::ReaderCapacity(1));
        }
        wire(self.core(), dst.core(), org_writer, DEFAULT_PORT)
    }

    /// Internal chain hop between two single-slot filters.
    fn connect_one_to_one(&self, dst: &dyn Filter) -> Result<(), ConnectError> {
        if self.core().has_writers() {
            return Err(ConnectError::WriterCapacity(1));
        }
        if dst.core().has_readers() {
            return Err(ConnectError::ReaderCapacity(1));
        }
        wire(self.core(), dst.core(), DEFAULT_PORT, DEFAULT_PORT)
    }

    /// Single-output filter feeding a multiplexed destination slot.
    fn connect_one_to_many(
        &self,
        dst: &dyn Filter,
        dst_reader: PortId,
    ) -> Result<(), ConnectError> {
        if self.core().has_writers() {
            return Err(ConnectError::WriterCapacity(1));
        }
        wire(self.core(), dst.core(), DEFAULT_PORT, dst_reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        core: FilterCore,
    }

    impl Node {
        fn single() -> Self {
            Self {
                core: FilterCore::single(),
            }
        }

        fn multiplexed() -> Self {
            Self {
                core: FilterCore::multiplexed(),
            }
        }
    }

    impl Filter for Node {
        fn core(&self) -> &FilterCore {
            &self.core
        }

        fn filter_type(&self) -> FilterType {
            FilterType::Gain
        }

        fn process(&self) -> Step {
            Step::Idle
        }
    }

    #[test]
    fn wire_binds_both_sides() {
        let a = Node::multiplexed();
        let b = Node::multiplexed();

        wire(a.core(), b.core(), 7, 9).unwrap();

        assert_eq!(a.core().writer_ports(), vec![7]);
        assert_eq!(b.core().reader_ports(), vec![9]);

        a.core().writer(7).unwrap().try_send(Frame::new(vec![1])).unwrap();
        assert_eq!(b.core().try_recv(9).unwrap().payload, vec![1]);
    }

    #[test]
    fn wire_refuses_bound_ports_without_mutation() {
        let a = Node::multiplexed();
        let b = Node::multiplexed();
        wire(a.core(), b.core(), 1, 1).unwrap();

        let c = Node::multiplexed();
        assert_eq!(
            wire(a.core(), c.core(), 1, 2),
            Err(ConnectError::WriterBound(1))
        );
        // The refused destination side stays untouched.
        assert!(!c.core().has_readers());

        assert_eq!(
            wire(c.core(), b.core(), 3, 1),
            Err(ConnectError::ReaderBound(1))
        );
        assert!(!c.core().has_writers());
    }

    #[test]
    fn racing_wires_into_one_reader_slot_leave_the_loser_unbound() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        // Two threads wiring distinct sources into the same destination
        // reader slot: exactly one link may form, and the refused source
        // must come out with no writer binding at all.
        for _ in 0..200 {
            let dst = Arc::new(Node::multiplexed());
            let a = Arc::new(Node::multiplexed());
            let b = Arc::new(Node::multiplexed());
            let barrier = Arc::new(Barrier::new(2));

            let spawn = |src: Arc<Node>, dst: Arc<Node>, barrier: Arc<Barrier>| {
                thread::spawn(move || {
                    barrier.wait();
                    wire(src.core(), dst.core(), 0, 7)
                })
            };
            let t1 = spawn(Arc::clone(&a), Arc::clone(&dst), Arc::clone(&barrier));
            let t2 = spawn(Arc::clone(&b), Arc::clone(&dst), Arc::clone(&barrier));
            let r1 = t1.join().unwrap();
            let r2 = t2.join().unwrap();

            assert!(r1.is_ok() != r2.is_ok(), "exactly one wire may win");
            assert_eq!(dst.core().reader_ports(), vec![7]);
            let loser = if r1.is_ok() { &b } else { &a };
            assert!(
                !loser.core().has_writers(),
                "refused wire left a half-bound writer behind"
            );
        }
    }

    #[test]
    fn wire_refuses_self_connection() {
        let a = Node::multiplexed();
        assert_eq!(
            wire(a.core(), a.core(), 0, 0),
            Err(ConnectError::SelfConnection)
        );
    }

    #[test]
    fn capacity_limits_are_enforced() {
        let single = Node::single();
        let m1 = Node::multiplexed();
        let m2 = Node::multiplexed();

        m1.connect_many_to_one(&single, 10).unwrap();
        assert_eq!(
            m2.connect_many_to_one(&single, 11),
            Err(ConnectError::ReaderCapacity(1))
        );
    }

    #[test]
    fn one_to_one_requires_free_single_slots() {
        let a = Node::single();
        let b = Node::single();
        let c = Node::single();

        a.connect_one_to_one(&b).unwrap();
        assert_eq!(
            a.connect_one_to_one(&c),
            Err(ConnectError::WriterCapacity(1))
        );
        assert_eq!(
            c.connect_one_to_one(&b),
            Err(ConnectError::ReaderCapacity(1))
        );
    }

    #[test]
    fn one_to_many_selects_destination_slot() {
        let a = Node::single();
        let sink = Node::multiplexed();

        a.connect_one_to_many(&sink, 42).unwrap();
        assert_eq!(sink.core().reader_ports(), vec![42]);
        assert_eq!(a.core().writer_ports(), vec![DEFAULT_PORT]);
    }
}
