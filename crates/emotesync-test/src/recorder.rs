//! Recording observer

use std::cell::RefCell;
use std::rc::Rc;

use emotesync_core::{ControllerId, Emote, EmoteId};
use emotesync_runtime::PerformanceObserver;

/// One callback received by the render layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observed {
    Emote {
        controller: ControllerId,
        emote: EmoteId,
        variant: Option<i16>,
        suppress_audio: bool,
    },
    Sync {
        controller: ControllerId,
        target: ControllerId,
        variant: Option<i16>,
    },
}

/// Observer that keeps every callback. Clones share the same log, so keep a
/// clone after handing one to the session.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<Observed>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        RecordingObserver::default()
    }

    pub fn events(&self) -> Vec<Observed> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn last(&self) -> Option<Observed> {
        self.events.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl PerformanceObserver for RecordingObserver {
    fn on_emote_applied(
        &mut self,
        controller: ControllerId,
        emote: &Emote,
        variant: Option<i16>,
        suppress_audio: bool,
    ) {
        self.events.borrow_mut().push(Observed::Emote {
            controller,
            emote: emote.id,
            variant,
            suppress_audio,
        });
    }

    fn on_sync_applied(&mut self, controller: ControllerId, target: ControllerId, variant: Option<i16>) {
        self.events.borrow_mut().push(Observed::Sync {
            controller,
            target,
            variant,
        });
    }
}
