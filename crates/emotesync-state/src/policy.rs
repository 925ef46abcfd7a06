//! Session policy - sharing and persistence rules for unlock progress

use serde::{Deserialize, Serialize};

/// Session policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    /// Every player shares the host's canonical unlock set
    pub share_everything: bool,
    /// Every emote starts unlocked
    pub unlock_everything: bool,
    /// Unlocks survive a round reset
    pub persistent_unlocks: bool,
    /// Credit balances survive a round reset
    pub persistent_credits: bool,
    /// Balance granted on reset and to the canonical set at session start
    pub starting_credits: i32,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy {
            share_everything: false,
            unlock_everything: false,
            persistent_unlocks: false,
            persistent_credits: false,
            starting_credits: 0,
        }
    }
}
