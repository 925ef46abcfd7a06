//! Relay handlers
//!
//! Host side: validate a peer's request and rebroadcast it to every peer.
//! Peer side: re-validate the host's broadcast against the local view and
//! apply it. The host never mutates persistent state on a relay; it only
//! updates its controller view so later sync requests validate correctly.

use std::sync::Arc;

use tracing::debug;

use emotesync_core::{ControllerId, ControllerRef, EmoteError, EmoteResult, PeerId};
use emotesync_wire::{MessageKind, PerformApply, PerformRequest, RelayMessage, SyncApply, SyncRequest};

use crate::{DispatchOutcome, SendTarget, Session};

impl Session {
    /// Controller owned by the sending peer
    fn resolve_sender(&self, sender: PeerId) -> EmoteResult<ControllerId> {
        self.registry
            .find_by_peer(sender)
            .ok_or(EmoteError::UnresolvedController(ControllerRef::Peer(sender)))
    }

    fn ensure_known(&self, controller: ControllerId) -> EmoteResult<()> {
        match self.registry.find(controller) {
            Some(_) => Ok(()),
            None => Err(EmoteError::UnresolvedController(ControllerRef::Id(controller))),
        }
    }

    /// Apply messages are only accepted from the host
    fn ensure_from_host(&self, sender: PeerId, kind: MessageKind) -> EmoteResult<()> {
        if sender.is_host() {
            return Ok(());
        }
        Err(EmoteError::RoleViolation {
            role: self.role(),
            message: format!("{} from peer {}", kind, sender),
        })
    }

    /// The host's own controller was applied by local input already
    fn host_applies(&self, controller: ControllerId) -> bool {
        !self.registry.is_local(controller)
    }

    pub(crate) fn handle_perform_request(
        &mut self,
        sender: PeerId,
        payload: &[u8],
    ) -> EmoteResult<DispatchOutcome> {
        let controller = self.resolve_sender(sender)?;
        let request = PerformRequest::decode(payload)?;
        let catalog = Arc::clone(&self.catalog);
        let emote = catalog.resolve_wire(request.emote_id)?;
        let variant = catalog.group_index(emote.id);
        self.reserve_outgoing()?;

        let applied_locally = self.host_applies(controller);
        if applied_locally {
            self.apply_performance(controller, emote, variant, request.suppress_audio)?;
        }
        debug!(sender = %sender, controller = %controller, emote = %emote, "relaying perform");

        self.queue_outgoing(
            SendTarget::AllPeers,
            RelayMessage::PerformApply(PerformApply {
                controller,
                emote_id: request.emote_id,
                suppress_audio: request.suppress_audio,
            }),
        );
        Ok(DispatchOutcome::Relayed { applied_locally })
    }

    pub(crate) fn handle_sync_request(
        &mut self,
        sender: PeerId,
        payload: &[u8],
    ) -> EmoteResult<DispatchOutcome> {
        let controller = self.resolve_sender(sender)?;
        let request = SyncRequest::decode(payload)?;
        // Target must be performing in the authoritative view
        self.sync_source(controller, request.target)?;
        self.reserve_outgoing()?;

        let applied_locally = self.host_applies(controller);
        let override_variant = if applied_locally {
            self.apply_sync(controller, request.target, request.override_variant)?
        } else {
            request.override_variant
        };
        debug!(sender = %sender, controller = %controller, target = %request.target, "relaying sync");

        self.queue_outgoing(
            SendTarget::AllPeers,
            RelayMessage::SyncApply(SyncApply {
                controller,
                target: request.target,
                override_variant,
            }),
        );
        Ok(DispatchOutcome::Relayed { applied_locally })
    }

    pub(crate) fn handle_perform_apply(
        &mut self,
        sender: PeerId,
        payload: &[u8],
    ) -> EmoteResult<DispatchOutcome> {
        self.ensure_from_host(sender, MessageKind::PerformApply)?;
        let apply = PerformApply::decode(payload)?;
        if self.registry.is_local(apply.controller) {
            debug!(controller = %apply.controller, "ignoring echo of local perform");
            return Ok(DispatchOutcome::IgnoredSelfEcho);
        }
        self.ensure_known(apply.controller)?;

        let catalog = Arc::clone(&self.catalog);
        let emote = catalog.resolve_wire(apply.emote_id)?;
        let variant = catalog.group_index(emote.id);
        self.apply_performance(apply.controller, emote, variant, apply.suppress_audio)?;
        debug!(controller = %apply.controller, emote = %emote, "applied perform");
        Ok(DispatchOutcome::Applied)
    }

    pub(crate) fn handle_sync_apply(
        &mut self,
        sender: PeerId,
        payload: &[u8],
    ) -> EmoteResult<DispatchOutcome> {
        self.ensure_from_host(sender, MessageKind::SyncApply)?;
        let apply = SyncApply::decode(payload)?;
        if self.registry.is_local(apply.controller) {
            debug!(controller = %apply.controller, "ignoring echo of local sync");
            return Ok(DispatchOutcome::IgnoredSelfEcho);
        }
        self.ensure_known(apply.controller)?;

        // Local re-validation; the peer's view may lag the host's.
        self.apply_sync(apply.controller, apply.target, apply.override_variant)?;
        debug!(controller = %apply.controller, target = %apply.target, "applied sync");
        Ok(DispatchOutcome::Applied)
    }
}
