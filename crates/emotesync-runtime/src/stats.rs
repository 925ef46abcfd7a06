//! Relay counters

use emotesync_core::EmoteError;

use crate::DispatchOutcome;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub messages_in: u64,
    pub applied: u64,
    pub relayed: u64,
    pub self_echo_ignored: u64,
    pub messages_out: u64,
    /// Local requests and relays refused because the outgoing buffer was full
    pub outgoing_overflow: u64,
    pub dropped_unresolved_controller: u64,
    pub dropped_invalid_emote: u64,
    pub dropped_invalid_sync_target: u64,
    pub dropped_role_violation: u64,
    pub dropped_outgoing_full: u64,
    /// Truncated payloads and unknown channels
    pub dropped_malformed: u64,
    pub dropped_other: u64,
}

impl RelayStats {
    pub fn record(&mut self, outcome: &DispatchOutcome) {
        match outcome {
            DispatchOutcome::Applied => self.applied += 1,
            DispatchOutcome::Relayed { .. } => self.relayed += 1,
            DispatchOutcome::IgnoredSelfEcho => self.self_echo_ignored += 1,
            DispatchOutcome::Dropped(err) => self.record_drop(err),
        }
    }

    pub fn record_drop(&mut self, err: &EmoteError) {
        let counter = match err {
            EmoteError::UnresolvedController(_) => &mut self.dropped_unresolved_controller,
            EmoteError::InvalidEmoteId { .. } => &mut self.dropped_invalid_emote,
            EmoteError::InvalidSyncTarget(_) => &mut self.dropped_invalid_sync_target,
            EmoteError::RoleViolation { .. } => &mut self.dropped_role_violation,
            EmoteError::OutgoingFull { .. } => &mut self.dropped_outgoing_full,
            EmoteError::BufferTooShort { .. } | EmoteError::UnknownChannel(_) => {
                &mut self.dropped_malformed
            }
            _ => &mut self.dropped_other,
        };
        *counter += 1;
    }

    pub fn dropped(&self) -> u64 {
        self.dropped_unresolved_controller
            + self.dropped_invalid_emote
            + self.dropped_invalid_sync_target
            + self.dropped_role_violation
            + self.dropped_outgoing_full
            + self.dropped_malformed
            + self.dropped_other
    }
}
