//! EmoteSync Session - one process's view of the shared emote state

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use emotesync_core::{
    Catalog, ControllerId, ControllerRef, Emote, EmoteError, EmoteId, EmoteResult, PeerId, Role,
};
use emotesync_state::{
    ControllerKind, ControllerRegistry, JoinOutcome, Performance, RosterPlayer, UnlockLedger,
    UnlockSyncPlan,
};
use emotesync_wire::{MessageKind, PerformApply, RelayMessage};

use crate::{DispatchTable, PerformanceObserver, PlayerRoster, RelayConfig, RelayStats};

/// Where an outgoing message goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendTarget {
    Host,
    /// Every connected peer except the host
    AllPeers,
    Peer(PeerId),
}

/// A message waiting for the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outgoing {
    pub kind: MessageKind,
    pub target: SendTarget,
    pub payload: Bytes,
}

impl Outgoing {
    #[inline]
    pub fn channel(&self) -> &'static str {
        self.kind.channel()
    }
}

/// What happened to a received message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Applied to local state (peer side)
    Applied,
    /// Validated and rebroadcast (host side)
    Relayed { applied_locally: bool },
    /// Echo of this process's own action; already applied
    IgnoredSelfEcho,
    /// Rejected; local state unchanged
    Dropped(EmoteError),
}

impl DispatchOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, DispatchOutcome::Dropped(_))
    }
}

/// EmoteSync Session
pub struct Session {
    role: Role,
    /// Transport id of this process
    local_peer: PeerId,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) registry: ControllerRegistry,
    ledger: UnlockLedger,
    roster: PlayerRoster,
    config: RelayConfig,
    dispatch: DispatchTable,
    outgoing: VecDeque<Outgoing>,
    observers: Vec<Box<dyn PerformanceObserver>>,
    stats: RelayStats,
}

impl Session {
    pub fn new(role: Role, local_peer: PeerId, catalog: Arc<Catalog>, config: RelayConfig) -> Self {
        let mut ledger = UnlockLedger::new(
            Arc::clone(&catalog),
            config.policy.clone(),
            config.local_username.clone(),
        );
        ledger.set_favorite_names(config.favorites.clone());

        Session {
            role,
            local_peer,
            catalog,
            registry: ControllerRegistry::new(),
            ledger,
            roster: PlayerRoster::new(),
            config,
            dispatch: DispatchTable::standard(),
            outgoing: VecDeque::new(),
            observers: Vec::new(),
            stats: RelayStats::default(),
        }
    }

    /// Session for the authoritative host
    pub fn host(catalog: Arc<Catalog>, config: RelayConfig) -> Self {
        Self::new(Role::Host, PeerId::HOST, catalog, config)
    }

    /// Session for a remote peer
    pub fn peer(local_peer: PeerId, catalog: Arc<Catalog>, config: RelayConfig) -> Self {
        Self::new(Role::Peer, local_peer, catalog, config)
    }

    pub fn with_dispatch(mut self, dispatch: DispatchTable) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &UnlockLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut UnlockLedger {
        &mut self.ledger
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    pub fn add_observer(&mut self, observer: Box<dyn PerformanceObserver>) {
        self.observers.push(observer);
    }

    /// Whether observers hear about applied performances
    pub fn renders(&self) -> bool {
        self.role.is_peer() || self.config.host_renders
    }

    // ------------------------------------------------------------------
    // Transport side
    // ------------------------------------------------------------------

    /// Process one message from the transport.
    ///
    /// Errors never escape: a rejected message is logged, counted, and
    /// reported as [`DispatchOutcome::Dropped`] with local state untouched.
    pub fn receive(&mut self, channel: &str, sender: PeerId, payload: &[u8]) -> DispatchOutcome {
        self.stats.messages_in += 1;
        let outcome = match self.dispatch_message(channel, sender, payload) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    role = %self.role,
                    channel,
                    sender = %sender,
                    reason = err.label(),
                    "dropped relay message: {}",
                    err
                );
                DispatchOutcome::Dropped(err)
            }
        };
        self.stats.record(&outcome);
        outcome
    }

    fn dispatch_message(
        &mut self,
        channel: &str,
        sender: PeerId,
        payload: &[u8],
    ) -> EmoteResult<DispatchOutcome> {
        let kind = MessageKind::from_channel(channel)?;
        let handler =
            self.dispatch
                .handler(self.role, kind)
                .ok_or_else(|| EmoteError::RoleViolation {
                    role: self.role,
                    message: kind.to_string(),
                })?;
        handler(self, sender, payload)
    }

    /// Get next outgoing message (if any)
    pub fn pop_outgoing(&mut self) -> Option<Outgoing> {
        self.outgoing.pop_front()
    }

    pub fn drain_outgoing(&mut self) -> Vec<Outgoing> {
        self.outgoing.drain(..).collect()
    }

    pub fn outgoing_len(&self) -> usize {
        self.outgoing.len()
    }

    /// Fails while the outgoing buffer is at capacity. Callers check this
    /// before touching any state, so a refused message changes nothing.
    pub(crate) fn reserve_outgoing(&mut self) -> EmoteResult<()> {
        let capacity = self.config.max_outgoing;
        if self.outgoing.len() < capacity {
            return Ok(());
        }
        warn!(role = %self.role, capacity, "outgoing buffer full");
        self.stats.outgoing_overflow += 1;
        Err(EmoteError::OutgoingFull { capacity })
    }

    /// Push after a successful [`Session::reserve_outgoing`]
    pub(crate) fn queue_outgoing(&mut self, target: SendTarget, message: RelayMessage) {
        self.outgoing.push_back(Outgoing {
            kind: message.kind(),
            target,
            payload: message.encode(),
        });
        self.stats.messages_out += 1;
    }

    // ------------------------------------------------------------------
    // Local input
    // ------------------------------------------------------------------

    fn local_controller(&self) -> EmoteResult<ControllerId> {
        self.registry
            .local()
            .ok_or(EmoteError::UnresolvedController(ControllerRef::Peer(self.local_peer)))
    }

    /// Perform an emote on this process's own controller.
    ///
    /// Applied immediately, then sent to the host for relay.
    pub fn request_perform(&mut self, emote: EmoteId, suppress_audio: bool) -> EmoteResult<()> {
        let controller = self.local_controller()?;
        let catalog = Arc::clone(&self.catalog);
        let emote = catalog.resolve_wire(emote.to_wire())?;
        let variant = catalog.group_index(emote.id);

        self.reserve_outgoing()?;
        self.apply_performance(controller, emote, variant, suppress_audio)?;
        debug!(controller = %controller, emote = %emote, "local perform");

        let request = emotesync_wire::PerformRequest {
            emote_id: emote.id.to_wire(),
            suppress_audio,
        };
        if self.role.is_host() {
            // The host is its own relay.
            self.queue_outgoing(
                SendTarget::AllPeers,
                RelayMessage::PerformApply(PerformApply {
                    controller,
                    emote_id: request.emote_id,
                    suppress_audio,
                }),
            );
        } else {
            self.queue_outgoing(SendTarget::Host, RelayMessage::PerformRequest(request));
        }
        Ok(())
    }

    /// Mirror `target` on this process's own controller
    pub fn request_sync(&mut self, target: ControllerId, override_variant: Option<i16>) -> EmoteResult<()> {
        let controller = self.local_controller()?;
        self.sync_source(controller, target)?;
        self.reserve_outgoing()?;
        let variant = self.apply_sync(controller, target, override_variant)?;
        debug!(controller = %controller, target = %target, "local sync");

        if self.role.is_host() {
            self.queue_outgoing(
                SendTarget::AllPeers,
                RelayMessage::SyncApply(emotesync_wire::SyncApply {
                    controller,
                    target,
                    override_variant: variant,
                }),
            );
        } else {
            self.queue_outgoing(
                SendTarget::Host,
                RelayMessage::SyncRequest(emotesync_wire::SyncRequest {
                    target,
                    override_variant,
                }),
            );
        }
        Ok(())
    }

    /// Host-only: drive a controller no peer owns and tell every peer
    pub fn broadcast_performance(
        &mut self,
        controller: ControllerId,
        emote: EmoteId,
        suppress_audio: bool,
    ) -> EmoteResult<()> {
        if !self.role.is_host() {
            return Err(EmoteError::RoleViolation {
                role: self.role,
                message: "broadcast_performance".into(),
            });
        }
        let catalog = Arc::clone(&self.catalog);
        let emote = catalog.resolve_wire(emote.to_wire())?;
        let variant = catalog.group_index(emote.id);

        self.reserve_outgoing()?;
        self.apply_performance(controller, emote, variant, suppress_audio)?;
        self.queue_outgoing(
            SendTarget::AllPeers,
            RelayMessage::PerformApply(PerformApply {
                controller,
                emote_id: emote.id.to_wire(),
                suppress_audio,
            }),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Shared apply path
    // ------------------------------------------------------------------

    pub(crate) fn apply_performance(
        &mut self,
        controller: ControllerId,
        emote: &Emote,
        variant: Option<i16>,
        suppress_audio: bool,
    ) -> EmoteResult<()> {
        let entry = self
            .registry
            .find_mut(controller)
            .ok_or(EmoteError::UnresolvedController(ControllerRef::Id(controller)))?;
        entry.perform(emote.id, variant, suppress_audio);

        if self.renders() {
            for observer in &mut self.observers {
                observer.on_emote_applied(controller, emote, variant, suppress_audio);
            }
        }
        Ok(())
    }

    /// The performance `controller` would copy from `target`
    pub(crate) fn sync_source(&self, controller: ControllerId, target: ControllerId) -> EmoteResult<Performance> {
        if controller == target {
            return Err(EmoteError::InvalidSyncTarget(target));
        }
        let target_entry = self
            .registry
            .find(target)
            .ok_or(EmoteError::UnresolvedController(ControllerRef::Id(target)))?;
        target_entry
            .performance()
            .copied()
            .ok_or(EmoteError::InvalidSyncTarget(target))
    }

    /// Mirror `target` on `controller`, returning the displayed variant.
    ///
    /// An override that names no member of the target emote's sync group is
    /// ignored in favor of the target's own variant.
    pub(crate) fn apply_sync(
        &mut self,
        controller: ControllerId,
        target: ControllerId,
        override_variant: Option<i16>,
    ) -> EmoteResult<Option<i16>> {
        let source = self.sync_source(controller, target)?;
        let override_variant =
            override_variant.filter(|v| self.catalog.variant_of(source.emote, *v).is_some());
        let variant = override_variant.or(source.variant);

        let entry = self
            .registry
            .find_mut(controller)
            .ok_or(EmoteError::UnresolvedController(ControllerRef::Id(controller)))?;
        entry.mirror(
            target,
            Performance {
                emote: source.emote,
                variant,
                suppress_audio: source.suppress_audio,
            },
        );

        if self.renders() {
            for observer in &mut self.observers {
                observer.on_sync_applied(controller, target, variant);
            }
        }
        Ok(override_variant)
    }

    // ------------------------------------------------------------------
    // Controller lifecycle
    // ------------------------------------------------------------------

    /// Register a controller. `id` is the spawning authority's choice; `None`
    /// takes the lowest free id. A player owned by this process becomes the
    /// local controller.
    pub fn spawn_controller(
        &mut self,
        id: Option<ControllerId>,
        owner: Option<PeerId>,
        kind: ControllerKind,
    ) -> EmoteResult<ControllerId> {
        let id = match id {
            Some(id) => {
                self.registry.insert(id, owner, kind)?;
                id
            }
            None => self.registry.register(owner, kind)?,
        };
        if kind == ControllerKind::Player && owner == Some(self.local_peer) {
            self.registry.set_local(id)?;
        }
        debug!(controller = %id, ?owner, ?kind, "controller spawned");
        Ok(id)
    }

    pub fn despawn_controller(&mut self, id: ControllerId) -> Option<ControllerId> {
        let removed = self.registry.unregister(id).map(|c| c.id);
        if removed.is_some() {
            debug!(controller = %id, "controller despawned");
        }
        removed
    }

    pub fn set_local_controller(&mut self, id: ControllerId) -> EmoteResult<()> {
        self.registry.set_local(id)
    }

    /// Drop every controller. Used when the whole session is torn down, not
    /// between rounds.
    pub fn reset_controllers(&mut self) {
        self.registry.clear();
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    fn roster_players(&self) -> Vec<RosterPlayer> {
        self.roster.players(self.local_peer)
    }

    /// Grant complementary emotes (or everything) and refresh favorites
    pub fn on_session_start(&mut self) {
        let granted = self.ledger.apply_baseline();
        self.ledger.refresh_favorites();
        info!(role = %self.role, granted, "session started");
    }

    /// A player connected. On the host this reconciles their unlock entry.
    pub fn on_player_joined(&mut self, peer: PeerId, username: &str) -> Option<JoinOutcome> {
        self.roster.insert(peer, username);
        if !self.role.is_host() {
            return None;
        }
        let outcome = self.ledger.reconcile_on_join(username);
        self.ledger.refresh_favorites();
        info!(peer = %peer, username, ?outcome, "player joined");
        Some(outcome)
    }

    pub fn on_player_left(&mut self, peer: PeerId) -> Option<String> {
        let username = self.roster.remove(peer);
        if let Some(controller) = self.registry.find_by_peer(peer) {
            self.registry.unregister(controller);
        }
        info!(peer = %peer, ?username, "player left");
        username
    }

    /// Reset unlock progress, honoring persistence unless `force_all`
    pub fn on_session_reset(&mut self, force_all: bool) {
        let roster = self.roster_players();
        self.ledger.reset_local(force_all, &roster);
        self.ledger.refresh_favorites();
        info!(role = %self.role, force_all, "unlock progress reset");
    }

    /// End of round. Progress resets per the persistence policy; a session
    /// that unlocks everything keeps it all. Controllers stay registered.
    pub fn on_round_reset(&mut self) {
        if self.ledger.policy().unlock_everything {
            debug!(role = %self.role, "round reset skipped, everything unlocked");
            return;
        }
        self.on_session_reset(false);
    }

    /// How unlock state should be pushed to peers right now
    pub fn unlock_sync_plan(&self) -> UnlockSyncPlan {
        self.ledger.sync_plan(&self.roster_players())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotesync_core::{CatalogBuilder, Rarity};
    use emotesync_state::ControllerState;

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            CatalogBuilder::new()
                .complementary("Wave", Rarity::Common)
                .emote("Dance", Rarity::Common)
                .emote("Bow", Rarity::Rare)
                .emote("BowVariant", Rarity::Rare)
                .group(&["Bow", "BowVariant"])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_spawn_marks_local_player() {
        let mut peer = Session::peer(PeerId(3), catalog(), RelayConfig::default());
        let other = peer.spawn_controller(Some(ControllerId(0)), Some(PeerId::HOST), ControllerKind::Player).unwrap();
        let mine = peer.spawn_controller(Some(ControllerId(1)), Some(PeerId(3)), ControllerKind::Player).unwrap();
        assert!(!peer.registry().is_local(other));
        assert!(peer.registry().is_local(mine));
        assert_eq!(
            peer.spawn_controller(Some(ControllerId(1)), None, ControllerKind::Puppet),
            Err(EmoteError::DuplicateController(ControllerId(1)))
        );
    }

    #[test]
    fn test_request_perform_applies_and_queues() {
        let mut peer = Session::peer(PeerId(1), catalog(), RelayConfig::default());
        let id = peer.spawn_controller(None, Some(PeerId(1)), ControllerKind::Player).unwrap();

        peer.request_perform(EmoteId(3), true).unwrap();
        assert_eq!(
            peer.registry().find(id).unwrap().state(),
            ControllerState::Performing {
                emote: EmoteId(3),
                variant: Some(1)
            }
        );

        let out = peer.pop_outgoing().unwrap();
        assert_eq!(out.target, SendTarget::Host);
        assert_eq!(out.channel(), "PerformEmoteServerRpc");
        assert_eq!(&out.payload[..], &[0x03, 0x00, 0x01]);
        assert!(peer.pop_outgoing().is_none());
    }

    #[test]
    fn test_request_perform_without_local_controller() {
        let mut peer = Session::peer(PeerId(1), catalog(), RelayConfig::default());
        assert_eq!(
            peer.request_perform(EmoteId(0), false),
            Err(EmoteError::UnresolvedController(ControllerRef::Peer(PeerId(1))))
        );
        assert_eq!(peer.outgoing_len(), 0);
    }

    #[test]
    fn test_request_perform_out_of_range() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        host.spawn_controller(None, Some(PeerId::HOST), ControllerKind::Player).unwrap();
        assert!(matches!(
            host.request_perform(EmoteId(4), false),
            Err(EmoteError::InvalidEmoteId { id: 4, catalog_size: 4 })
        ));
        assert_eq!(host.outgoing_len(), 0);
    }

    #[test]
    fn test_host_local_perform_broadcasts_directly() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        let id = host.spawn_controller(None, Some(PeerId::HOST), ControllerKind::Player).unwrap();
        host.request_perform(EmoteId(1), false).unwrap();

        let out = host.pop_outgoing().unwrap();
        assert_eq!(out.target, SendTarget::AllPeers);
        assert_eq!(out.kind, MessageKind::PerformApply);
        assert_eq!(&out.payload[..], &[id.0 as u8, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_request_sync_rejects_self_and_idle() {
        let mut peer = Session::peer(PeerId(1), catalog(), RelayConfig::default());
        let mine = peer.spawn_controller(Some(ControllerId(0)), Some(PeerId(1)), ControllerKind::Player).unwrap();
        let other = peer.spawn_controller(Some(ControllerId(1)), Some(PeerId(2)), ControllerKind::Player).unwrap();

        assert_eq!(peer.request_sync(mine, None), Err(EmoteError::InvalidSyncTarget(mine)));
        assert_eq!(peer.request_sync(other, None), Err(EmoteError::InvalidSyncTarget(other)));
        assert_eq!(
            peer.request_sync(ControllerId(9), None),
            Err(EmoteError::UnresolvedController(ControllerRef::Id(ControllerId(9))))
        );
        assert_eq!(peer.outgoing_len(), 0);
    }

    #[test]
    fn test_apply_sync_override_falls_back() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        let a = host.spawn_controller(None, None, ControllerKind::Puppet).unwrap();
        let b = host.spawn_controller(None, None, ControllerKind::Puppet).unwrap();
        host.broadcast_performance(a, EmoteId(2), false).unwrap();

        assert_eq!(host.apply_sync(b, a, Some(5)).unwrap(), None);
        assert_eq!(host.registry().find(b).unwrap().override_variant(), Some(0));

        assert_eq!(host.apply_sync(b, a, Some(1)).unwrap(), Some(1));
        assert_eq!(host.registry().find(b).unwrap().override_variant(), Some(1));
    }

    #[test]
    fn test_broadcast_performance_host_only() {
        let mut peer = Session::peer(PeerId(1), catalog(), RelayConfig::default());
        let puppet = peer.spawn_controller(Some(ControllerId(4)), None, ControllerKind::Puppet).unwrap();
        assert!(matches!(
            peer.broadcast_performance(puppet, EmoteId(0), false),
            Err(EmoteError::RoleViolation { role: Role::Peer, .. })
        ));
    }

    #[test]
    fn test_outgoing_overflow() {
        let config = RelayConfig {
            max_outgoing: 2,
            ..RelayConfig::default()
        };
        let mut host = Session::host(catalog(), config);
        let puppet = host.spawn_controller(None, None, ControllerKind::Puppet).unwrap();
        host.broadcast_performance(puppet, EmoteId(0), false).unwrap();
        host.broadcast_performance(puppet, EmoteId(0), false).unwrap();
        assert_eq!(
            host.broadcast_performance(puppet, EmoteId(1), false),
            Err(EmoteError::OutgoingFull { capacity: 2 })
        );
        // The refused broadcast left the puppet alone
        assert_eq!(host.registry().find(puppet).unwrap().performing_emote(), Some(EmoteId(0)));
        assert_eq!(host.outgoing_len(), 2);
        assert_eq!(host.stats().outgoing_overflow, 1);
        assert_eq!(host.drain_outgoing().len(), 2);
        host.broadcast_performance(puppet, EmoteId(1), false).unwrap();
    }

    #[test]
    fn test_full_outgoing_refuses_local_input() {
        let config = RelayConfig {
            max_outgoing: 1,
            ..RelayConfig::default()
        };
        let catalog = catalog();
        let mut peer = Session::peer(PeerId(1), Arc::clone(&catalog), config);
        let mine = peer.spawn_controller(Some(ControllerId(0)), Some(PeerId(1)), ControllerKind::Player).unwrap();
        let other = peer.spawn_controller(Some(ControllerId(1)), Some(PeerId(2)), ControllerKind::Player).unwrap();
        let bow = catalog.lookup(EmoteId(2)).unwrap();
        peer.apply_performance(other, bow, Some(0), false).unwrap();

        peer.request_perform(EmoteId(1), false).unwrap();
        assert_eq!(peer.request_perform(EmoteId(0), false), Err(EmoteError::OutgoingFull { capacity: 1 }));
        assert_eq!(peer.request_sync(other, None), Err(EmoteError::OutgoingFull { capacity: 1 }));
        assert_eq!(
            peer.registry().find(mine).unwrap().state(),
            ControllerState::Performing {
                emote: EmoteId(1),
                variant: None
            }
        );
        assert_eq!(peer.outgoing_len(), 1);
        assert_eq!(peer.stats().outgoing_overflow, 2);
    }

    #[test]
    fn test_despawned_target_releases_mirror() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        let a = host.spawn_controller(None, None, ControllerKind::Puppet).unwrap();
        let b = host.spawn_controller(None, None, ControllerKind::Puppet).unwrap();
        host.broadcast_performance(a, EmoteId(2), false).unwrap();
        host.apply_sync(b, a, Some(1)).unwrap();

        assert_eq!(host.despawn_controller(a), Some(a));
        assert_eq!(
            host.registry().find(b).unwrap().state(),
            ControllerState::Performing {
                emote: EmoteId(2),
                variant: Some(1)
            }
        );
    }

    #[test]
    fn test_player_left_despawns_their_controller() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        host.on_player_joined(PeerId(2), "Bob");
        let bob = host.spawn_controller(None, Some(PeerId(2)), ControllerKind::Player).unwrap();
        assert_eq!(host.on_player_left(PeerId(2)).as_deref(), Some("Bob"));
        assert!(host.registry().find(bob).is_none());
        assert!(host.roster().is_empty());
    }

    #[test]
    fn test_round_reset_keeps_controllers() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        let id = host.spawn_controller(None, Some(PeerId::HOST), ControllerKind::Player).unwrap();
        host.on_round_reset();
        assert_eq!(host.registry().len(), 1);
        assert_eq!(host.registry().local(), Some(id));
        host.request_perform(EmoteId(1), false).unwrap();

        host.reset_controllers();
        assert!(host.registry().is_empty());
        assert_eq!(host.registry().local(), None);
    }

    #[test]
    fn test_round_reset_skipped_when_everything_unlocked() {
        let mut config = RelayConfig::default();
        config.policy.unlock_everything = true;
        let mut host = Session::host(catalog(), config);
        host.spawn_controller(None, Some(PeerId::HOST), ControllerKind::Player).unwrap();
        host.on_session_start();
        host.ledger_mut().set_credits(500);

        host.on_round_reset();
        assert_eq!(host.ledger().credits(), 500);
        assert_eq!(host.ledger().unlocked().len(), 4);
        assert_eq!(host.registry().len(), 1);
        assert_eq!(host.request_perform(EmoteId(2), false), Ok(()));

        // An explicit session reset still honours the request
        host.on_session_reset(true);
        assert_eq!(host.ledger().credits(), 0);
    }

    #[test]
    fn test_join_reconciles_only_on_host() {
        let mut host = Session::host(catalog(), RelayConfig::default());
        let mut peer = Session::peer(PeerId(2), catalog(), RelayConfig::default());
        assert_eq!(host.on_player_joined(PeerId(2), "Bob"), Some(JoinOutcome::FirstJoin));
        assert_eq!(peer.on_player_joined(PeerId(2), "Bob"), None);
        assert_eq!(peer.roster().username(PeerId(2)), Some("Bob"));
    }
}
