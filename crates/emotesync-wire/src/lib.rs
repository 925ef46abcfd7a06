//! EmoteSync Wire Protocol - Relay message format
//!
//! Every message travels on its own named, reliable, ordered channel.
//! Payloads are fixed-layout little-endian records with no framing
//! beyond the channel's message boundaries:
//! - PerformRequest (3 bytes)
//! - PerformApply (5 bytes)
//! - SyncRequest (4 bytes)
//! - SyncApply (6 bytes)

pub mod channel;
pub mod message;

pub use channel::*;
pub use message::*;
