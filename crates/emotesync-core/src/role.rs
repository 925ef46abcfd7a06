//! Session roles

use std::fmt;

/// Authority role of a process within a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Authoritative host: validates requests and rebroadcasts applies
    Host,
    /// Remote participant: sends requests, applies host broadcasts
    Peer,
}

impl Role {
    #[inline]
    pub fn is_host(self) -> bool {
        self == Role::Host
    }

    #[inline]
    pub fn is_peer(self) -> bool {
        self == Role::Peer
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => f.write_str("host"),
            Role::Peer => f.write_str("peer"),
        }
    }
}
