//! Loopback network
//!
//! Connects one host session and any number of peer sessions in memory.
//! Delivery is reliable and ordered per sender, which is all the relay
//! protocol assumes of its transport.

use std::collections::BTreeMap;

use tracing::trace;

use emotesync_core::{ControllerId, EmoteResult, PeerId};
use emotesync_runtime::{DispatchOutcome, Outgoing, SendTarget, Session};
use emotesync_state::ControllerKind;
use emotesync_wire::MessageKind;

/// Upper bound on pump rounds before giving up on quiescence
const MAX_ROUNDS: usize = 64;

/// One delivered message and what the receiver made of it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub from: PeerId,
    pub to: PeerId,
    pub kind: MessageKind,
    pub outcome: DispatchOutcome,
}

pub struct LoopbackNetwork {
    host: Session,
    peers: BTreeMap<PeerId, Session>,
    log: Vec<Delivery>,
}

impl LoopbackNetwork {
    pub fn new(host: Session) -> Self {
        LoopbackNetwork {
            host,
            peers: BTreeMap::new(),
            log: Vec::new(),
        }
    }

    /// Attach a peer session under its own peer id
    pub fn add_peer(&mut self, peer: Session) -> PeerId {
        let id = peer.local_peer();
        self.peers.insert(id, peer);
        id
    }

    pub fn host(&self) -> &Session {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Session {
        &mut self.host
    }

    pub fn peer(&self, id: PeerId) -> Option<&Session> {
        self.peers.get(&id)
    }

    pub fn peer_mut(&mut self, id: PeerId) -> Option<&mut Session> {
        self.peers.get_mut(&id)
    }

    /// Host first, then peers in id order
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        std::iter::once(&self.host).chain(self.peers.values())
    }

    fn sessions_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        std::iter::once(&mut self.host).chain(self.peers.values_mut())
    }

    /// Register the same controller on every session, as a spawn replicated
    /// by the host would
    pub fn spawn_everywhere(
        &mut self,
        id: ControllerId,
        owner: Option<PeerId>,
        kind: ControllerKind,
    ) -> EmoteResult<()> {
        for session in self.sessions_mut() {
            session.spawn_controller(Some(id), owner, kind)?;
        }
        Ok(())
    }

    /// Announce a player to every session
    pub fn join(&mut self, peer: PeerId, username: &str) {
        for session in self.sessions_mut() {
            session.on_player_joined(peer, username);
        }
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Deliver queued traffic until every session is quiet.
    ///
    /// Returns the number of messages delivered.
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_ROUNDS {
            let mut batch: Vec<(PeerId, Outgoing)> = Vec::new();
            for session in self.sessions_mut() {
                let from = session.local_peer();
                batch.extend(session.drain_outgoing().into_iter().map(|out| (from, out)));
            }
            if batch.is_empty() {
                return delivered;
            }
            for (from, out) in batch {
                delivered += self.deliver(from, &out);
            }
        }
        delivered
    }

    fn deliver(&mut self, from: PeerId, out: &Outgoing) -> usize {
        let recipients: Vec<PeerId> = match out.target {
            SendTarget::Host => vec![PeerId::HOST],
            SendTarget::AllPeers => self.peers.keys().copied().filter(|p| *p != from).collect(),
            SendTarget::Peer(peer) => vec![peer],
        };

        let mut count = 0;
        for to in recipients {
            let session = if to.is_host() {
                &mut self.host
            } else {
                match self.peers.get_mut(&to) {
                    Some(session) => session,
                    None => continue,
                }
            };
            let outcome = session.receive(out.channel(), from, &out.payload);
            trace!(from = %from, to = %to, kind = %out.kind, ?outcome, "delivered");
            self.log.push(Delivery {
                from,
                to,
                kind: out.kind,
                outcome,
            });
            count += 1;
        }
        count
    }
}
