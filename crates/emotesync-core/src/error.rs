//! Error types for EmoteSync

use thiserror::Error;

use crate::{ControllerId, PeerId, Role};

/// How an unresolved controller was referenced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerRef {
    /// The sending peer has no registered controller
    Peer(PeerId),
    /// No controller is registered under this id
    Id(ControllerId),
}

impl std::fmt::Display for ControllerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerRef::Peer(peer) => write!(f, "peer {}", peer),
            ControllerRef::Id(id) => write!(f, "id {}", id),
        }
    }
}

/// Core EmoteSync errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmoteError {
    // Protocol errors
    #[error("No controller registered for {0}")]
    UnresolvedController(ControllerRef),

    #[error("Invalid emote id {id}: catalog holds {catalog_size} emotes")]
    InvalidEmoteId { id: i16, catalog_size: usize },

    #[error("Controller {0} cannot be a sync target: it is not performing")]
    InvalidSyncTarget(ControllerId),

    #[error("Role violation: {role} does not handle {message}")]
    RoleViolation { role: Role, message: String },

    // Wire errors
    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    // Registry errors
    #[error("Controller id {0} is already registered")]
    DuplicateController(ControllerId),

    #[error("Controller registry is full")]
    RegistryFull,

    // Session errors
    #[error("Outgoing buffer is full ({capacity} messages)")]
    OutgoingFull { capacity: usize },

    // Ledger errors
    #[error("Player {0:?} has no session entry")]
    UnmappedPlayer(String),

    #[error("Player {player:?} has {available} credits, {needed} needed")]
    InsufficientCredits {
        player: String,
        needed: i32,
        available: i32,
    },

    // Setup errors
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EmoteError {
    /// Short stable label, used for log fields and stats buckets
    pub fn label(&self) -> &'static str {
        match self {
            EmoteError::UnresolvedController(_) => "unresolved_controller",
            EmoteError::InvalidEmoteId { .. } => "invalid_emote_id",
            EmoteError::InvalidSyncTarget(_) => "invalid_sync_target",
            EmoteError::RoleViolation { .. } => "role_violation",
            EmoteError::BufferTooShort { .. } => "buffer_too_short",
            EmoteError::UnknownChannel(_) => "unknown_channel",
            EmoteError::DuplicateController(_) => "duplicate_controller",
            EmoteError::RegistryFull => "registry_full",
            EmoteError::OutgoingFull { .. } => "outgoing_full",
            EmoteError::UnmappedPlayer(_) => "unmapped_player",
            EmoteError::InsufficientCredits { .. } => "insufficient_credits",
            EmoteError::InvalidCatalog(_) => "invalid_catalog",
            EmoteError::Config(_) => "config",
        }
    }
}

/// Result type for EmoteSync operations
pub type EmoteResult<T> = Result<T, EmoteError>;
