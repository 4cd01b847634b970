// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // pipeline configuration + validation
pub mod context;       // application context (manager lifecycle)
pub mod errors;        // error handling
pub mod filters;       // built-in collaborator filters
pub mod frame;         // inter-filter frame transport
pub mod observability;
pub mod pipeline;      // path model + pipeline manager
pub mod traits;        // filter and endpoint contracts
pub mod utils;
pub mod workers;       // worker threads + worker manager
