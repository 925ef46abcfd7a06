//! Connected players

use std::collections::BTreeMap;

use emotesync_core::PeerId;
use emotesync_state::RosterPlayer;

/// Peer id to username map for everyone currently in the session
#[derive(Clone, Debug, Default)]
pub struct PlayerRoster {
    players: BTreeMap<PeerId, String>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        PlayerRoster::default()
    }

    /// Returns the previous username if the peer was already listed
    pub fn insert(&mut self, peer: PeerId, username: impl Into<String>) -> Option<String> {
        self.players.insert(peer, username.into())
    }

    pub fn remove(&mut self, peer: PeerId) -> Option<String> {
        self.players.remove(&peer)
    }

    pub fn username(&self, peer: PeerId) -> Option<&str> {
        self.players.get(&peer).map(String::as_str)
    }

    pub fn peer_of(&self, username: &str) -> Option<PeerId> {
        self.players
            .iter()
            .find(|(_, name)| name.as_str() == username)
            .map(|(peer, _)| *peer)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Snapshot for ledger operations, flagging `local` as this process
    pub fn players(&self, local: PeerId) -> Vec<RosterPlayer> {
        self.players
            .iter()
            .map(|(peer, username)| RosterPlayer {
                peer: *peer,
                username: username.clone(),
                is_local: *peer == local,
            })
            .collect()
    }
}
