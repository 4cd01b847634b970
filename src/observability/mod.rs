// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging message types.
//!
//! Diagnostic and operational events are expressed as per-subsystem message
//! structs implementing `Display` plus [`messages::StructuredLog`], and are
//! emitted through `tracing`. Keeping the message text in one place avoids
//! magic strings at the call sites and keeps field names consistent across
//! the codebase.

pub mod messages;
