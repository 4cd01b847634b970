// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod pipeline;
mod session;

pub use config::{ConfigError, ValidationError};
pub use pipeline::{ConnectError, ConnectStage, PipelineError};
pub use session::SessionError;
