// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::{FilterId, PortId};

/// Opaque integer handle for a registered path, chosen by the caller.
pub type PathId = i32;

/// An immutable route through the pipeline graph.
///
/// A path names an origin filter, an ordered (possibly empty) sequence of
/// intermediate filters, a destination filter, and the port ids used on the
/// multiplexed endpoints: which of the origin's writer slots feeds the chain
/// and which of the destination's reader slots receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    origin: FilterId,
    destination: FilterId,
    intermediates: Vec<FilterId>,
    org_writer: PortId,
    dst_reader: PortId,
}

impl Path {
    pub fn new(
        origin: FilterId,
        destination: FilterId,
        org_writer: PortId,
        dst_reader: PortId,
        intermediates: Vec<FilterId>,
    ) -> Self {
        Self {
            origin,
            destination,
            intermediates,
            org_writer,
            dst_reader,
        }
    }

    pub fn origin(&self) -> FilterId {
        self.origin
    }

    pub fn destination(&self) -> FilterId {
        self.destination
    }

    pub fn intermediates(&self) -> &[FilterId] {
        &self.intermediates
    }

    pub fn org_writer(&self) -> PortId {
        self.org_writer
    }

    pub fn dst_reader(&self) -> PortId {
        self.dst_reader
    }
}
