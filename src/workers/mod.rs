// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod manager;
mod worker;

pub use manager::WorkerManager;
pub use worker::{Worker, WorkerId};
