//! EmoteSync Runtime - Session orchestration and relay dispatch
//!
//! A [`Session`] owns everything one process knows about the shared emote
//! state and is driven from a single dispatch point:
//! 1. Receive a named message from the transport
//! 2. Look up the handler for (role, message kind)
//! 3. Validate against the catalog and controller registry
//! 4. Apply to the local registry and notify observers
//! 5. Queue any rebroadcast for the transport to drain

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod observer;
pub mod relay;
pub mod roster;
pub mod session;
pub mod stats;

pub use config::*;
pub use dispatch::*;
pub use logging::*;
pub use observer::*;
pub use roster::*;
pub use session::*;
pub use stats::*;
