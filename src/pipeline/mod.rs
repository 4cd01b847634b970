// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod manager;
mod path;

#[cfg(test)]
mod integration_tests;

pub use manager::{PipelineManager, RECEIVER_ID, TRANSMITTER_ID};
pub use path::{Path, PathId};
