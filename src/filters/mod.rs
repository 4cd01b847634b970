// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in collaborator filters.
//!
//! The pipeline core treats concrete filters as external collaborators;
//! these implementations cover what the bundled driver and the test suites
//! need: the two endpoint filters (session bookkeeping without transport
//! framing), a fan-in audio mixer, and a simple one-in/one-out gain stage.

mod gain;
mod mixer;
mod receiver;
mod transmitter;

pub use gain::Gain;
pub use mixer::AudioMixer;
pub use receiver::RtpReceiver;
pub use transmitter::RtpTransmitter;
