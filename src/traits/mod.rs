// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod endpoint;
mod filter;

pub use endpoint::{Packaging, ReceiverEndpoint, SessionDescriptor, TransmitterEndpoint};
pub use filter::{
    wire, Filter, FilterCore, FilterId, FilterType, PortId, Step, DEFAULT_PORT,
};
