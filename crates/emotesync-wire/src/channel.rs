//! Named channels

use std::fmt;

use emotesync_core::{EmoteError, EmoteResult};

pub const PERFORM_REQUEST_CHANNEL: &str = "PerformEmoteServerRpc";
pub const SYNC_REQUEST_CHANNEL: &str = "SyncEmoteServerRpc";
pub const PERFORM_APPLY_CHANNEL: &str = "PerformEmoteClientRpc";
pub const SYNC_APPLY_CHANNEL: &str = "SyncEmoteClientRpc";

/// Which way a message kind flows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Peer to host
    ToHost,
    /// Host to every peer
    ToPeers,
}

/// Relay message kinds, one per channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    PerformRequest,
    PerformApply,
    SyncRequest,
    SyncApply,
}

impl MessageKind {
    pub const ALL: [MessageKind; 4] = [
        MessageKind::PerformRequest,
        MessageKind::PerformApply,
        MessageKind::SyncRequest,
        MessageKind::SyncApply,
    ];

    pub fn channel(self) -> &'static str {
        match self {
            MessageKind::PerformRequest => PERFORM_REQUEST_CHANNEL,
            MessageKind::PerformApply => PERFORM_APPLY_CHANNEL,
            MessageKind::SyncRequest => SYNC_REQUEST_CHANNEL,
            MessageKind::SyncApply => SYNC_APPLY_CHANNEL,
        }
    }

    pub fn from_channel(channel: &str) -> EmoteResult<Self> {
        match channel {
            PERFORM_REQUEST_CHANNEL => Ok(MessageKind::PerformRequest),
            PERFORM_APPLY_CHANNEL => Ok(MessageKind::PerformApply),
            SYNC_REQUEST_CHANNEL => Ok(MessageKind::SyncRequest),
            SYNC_APPLY_CHANNEL => Ok(MessageKind::SyncApply),
            other => Err(EmoteError::UnknownChannel(other.to_string())),
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            MessageKind::PerformRequest | MessageKind::SyncRequest => Direction::ToHost,
            MessageKind::PerformApply | MessageKind::SyncApply => Direction::ToPeers,
        }
    }

    /// Fixed payload size in bytes
    pub fn payload_size(self) -> usize {
        match self {
            MessageKind::PerformRequest => 3,
            MessageKind::PerformApply => 5,
            MessageKind::SyncRequest => 4,
            MessageKind::SyncApply => 6,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names_resolve() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_channel(kind.channel()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_channel() {
        let result = MessageKind::from_channel("DanceServerRpc");
        assert_eq!(
            result,
            Err(EmoteError::UnknownChannel("DanceServerRpc".into()))
        );
    }

    #[test]
    fn test_directions() {
        assert_eq!(MessageKind::PerformRequest.direction(), Direction::ToHost);
        assert_eq!(MessageKind::SyncRequest.direction(), Direction::ToHost);
        assert_eq!(MessageKind::PerformApply.direction(), Direction::ToPeers);
        assert_eq!(MessageKind::SyncApply.direction(), Direction::ToPeers);
    }
}
