//! EmoteSync Test Harness - Loopback relay network and scenarios
//!
//! This crate provides:
//! - An in-memory network joining one host session and any number of peers
//! - A recording observer for asserting what the render layer was told
//! - A log capture for asserting on emitted tracing events
//! - End-to-end relay and ledger scenarios

pub mod capture;
pub mod network;
pub mod recorder;
pub mod scenarios;

pub use capture::*;
pub use network::*;
pub use recorder::*;
pub use scenarios::*;
