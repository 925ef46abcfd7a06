//! Performance observers
//!
//! The render layer subscribes here to learn what to play. Observers are
//! only notified on processes that render.

use emotesync_core::{ControllerId, Emote};

pub trait PerformanceObserver {
    /// A controller started performing `emote`
    fn on_emote_applied(
        &mut self,
        _controller: ControllerId,
        _emote: &Emote,
        _variant: Option<i16>,
        _suppress_audio: bool,
    ) {
    }

    /// A controller started mirroring `target`
    fn on_sync_applied(
        &mut self,
        _controller: ControllerId,
        _target: ControllerId,
        _variant: Option<i16>,
    ) {
    }
}
