// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

use crate::pipeline::PathId;
use crate::traits::{FilterId, PortId};
use crate::workers::WorkerId;

/// Why a filter refused a requested connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("writer port {0} is already bound")]
    WriterBound(PortId),
    #[error("reader port {0} is already bound")]
    ReaderBound(PortId),
    #[error("filter cannot accept another output (limit {0})")]
    WriterCapacity(usize),
    #[error("filter cannot accept another input (limit {0})")]
    ReaderCapacity(usize),
    #[error("a filter cannot be connected to itself")]
    SelfConnection,
}

/// Which step of the path-wiring algorithm a connection failure occurred at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStage {
    /// Direct origin-to-destination link of a path without intermediates.
    HeadToTail,
    /// Origin to the first intermediate filter.
    HeadToFirst,
    /// Between two consecutive intermediate filters.
    Intermediate,
    /// Last intermediate filter to the destination.
    LastToTail,
}

impl fmt::Display for ConnectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectStage::HeadToTail => "head to tail",
            ConnectStage::HeadToFirst => "head to first filter",
            ConnectStage::Intermediate => "between path filters",
            ConnectStage::LastToTail => "last filter to tail",
        };
        write!(f, "{}", name)
    }
}

/// Failures surfaced by the pipeline and worker registries.
///
/// All of these are non-fatal to the process: registration conflicts and
/// missing references leave the registries untouched, and a refused
/// connection leaves the already-established links of the path in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("filter id {0} is already registered")]
    DuplicateFilter(FilterId),
    #[error("path id {0} is already registered")]
    DuplicatePath(PathId),
    #[error("worker id {0} is already registered")]
    DuplicateWorker(WorkerId),
    #[error("filter id {0} is not registered")]
    UnknownFilter(FilterId),
    #[error("path has no intermediate filters")]
    EmptyPath,
    #[error("connection refused ({stage}): {source}")]
    ConnectionRefused {
        stage: ConnectStage,
        source: ConnectError,
    },
}
