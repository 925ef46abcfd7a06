//! Dispatch table
//!
//! Handlers are keyed by (role, message kind). A message kind with no entry
//! for the receiving role is a role violation, so a peer can never run the
//! host's relay pipeline and vice versa.

use std::collections::HashMap;

use emotesync_core::{EmoteResult, PeerId, Role};
use emotesync_wire::MessageKind;

use crate::{DispatchOutcome, Session};

/// Handler invoked with the sending peer and the raw payload
pub type Handler = fn(&mut Session, PeerId, &[u8]) -> EmoteResult<DispatchOutcome>;

#[derive(Clone, Debug, Default)]
pub struct DispatchTable {
    handlers: HashMap<(Role, MessageKind), Handler>,
}

impl DispatchTable {
    pub fn empty() -> Self {
        DispatchTable::default()
    }

    /// Host handles requests, peers handle applies
    pub fn standard() -> Self {
        let mut table = DispatchTable::empty();
        table.register(Role::Host, MessageKind::PerformRequest, Session::handle_perform_request);
        table.register(Role::Host, MessageKind::SyncRequest, Session::handle_sync_request);
        table.register(Role::Peer, MessageKind::PerformApply, Session::handle_perform_apply);
        table.register(Role::Peer, MessageKind::SyncApply, Session::handle_sync_apply);
        table
    }

    /// Returns the handler previously registered for the key, if any
    pub fn register(&mut self, role: Role, kind: MessageKind, handler: Handler) -> Option<Handler> {
        self.handlers.insert((role, kind), handler)
    }

    pub fn handler(&self, role: Role, kind: MessageKind) -> Option<Handler> {
        self.handlers.get(&(role, kind)).copied()
    }

    pub fn handles(&self, role: Role, kind: MessageKind) -> bool {
        self.handlers.contains_key(&(role, kind))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotesync_wire::Direction;

    #[test]
    fn test_standard_table_follows_direction() {
        let table = DispatchTable::standard();
        assert_eq!(table.len(), 4);
        for kind in MessageKind::ALL {
            let to_host = kind.direction() == Direction::ToHost;
            assert_eq!(table.handles(Role::Host, kind), to_host);
            assert_eq!(table.handles(Role::Peer, kind), !to_host);
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut table = DispatchTable::empty();
        assert!(table.is_empty());
        assert!(table
            .register(Role::Host, MessageKind::PerformRequest, Session::handle_perform_request)
            .is_none());
        assert!(table
            .register(Role::Host, MessageKind::PerformRequest, Session::handle_sync_request)
            .is_some());
        assert_eq!(table.len(), 1);
        assert!(table.handler(Role::Peer, MessageKind::PerformRequest).is_none());
    }
}
