//! Identity types for EmoteSync
//!
//! Emote and controller ids are 16-bit to match the fixed wire layout.
//! Emote ids travel as signed `i16` so that a negative id can be rejected
//! by the bounds gate instead of wrapping into a valid one.

use std::fmt;

/// Emote identity - dense catalog index
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EmoteId(pub u16);

impl EmoteId {
    #[inline]
    pub fn new(id: u16) -> Self {
        EmoteId(id)
    }

    /// Catalog slot for this id
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Signed wire representation
    #[inline]
    pub fn to_wire(self) -> i16 {
        self.0 as i16
    }

    /// Convert a wire id; negative ids have no emote
    #[inline]
    pub fn from_wire(raw: i16) -> Option<Self> {
        u16::try_from(raw).ok().map(EmoteId)
    }
}

impl fmt::Debug for EmoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Emote({})", self.0)
    }
}

impl fmt::Display for EmoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Controller identity - unique among registered controllers, reused after despawn
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ControllerId(pub u16);

impl ControllerId {
    pub const MAX: ControllerId = ControllerId(u16::MAX);

    #[inline]
    pub fn new(id: u16) -> Self {
        ControllerId(id)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        ControllerId(u16::from_le_bytes(bytes))
    }
}

impl fmt::Debug for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Controller({})", self.0)
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-level peer identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PeerId(pub u64);

impl PeerId {
    /// The session host always holds peer id zero
    pub const HOST: PeerId = PeerId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        PeerId(id)
    }

    #[inline]
    pub fn is_host(self) -> bool {
        self == PeerId::HOST
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peer({})", self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
