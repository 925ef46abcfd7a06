//! Unlock ledger - per-player unlock progress for one session
//!
//! The ledger owns the canonical unlock set (the local player's, or the
//! shared set under the share everything policy), the rarity tier buckets
//! derived from it, favorites, and credit balances. Per-player sets are
//! reached through [`PlayerUnlockBinding`], which is either the canonical
//! set itself or an independent copy.
//!
//! Sync groups: an emote counts as unlocked when any member of its group is
//! in the set being checked.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use emotesync_core::{Catalog, EmoteError, EmoteId, EmoteResult, PeerId, Rarity};
use tracing::{debug, info, warn};

use crate::SessionPolicy;

pub type UnlockSet = BTreeSet<EmoteId>;

/// Where a player's unlocks live
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerUnlockBinding {
    /// The player reads and writes the canonical set
    Shared,
    /// The player has a set of their own
    Independent(UnlockSet),
}

/// A connected player, as seen by the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterPlayer {
    pub peer: PeerId,
    pub username: String,
    /// Driven by this process
    pub is_local: bool,
}

/// Result of reconciling a joining player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No prior entry; seeded from the canonical set
    FirstJoin,
    /// Prior entry merged into the canonical set
    Rejoined { restored: usize },
}

/// How unlock state should be pushed to clients
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnlockSyncPlan {
    /// Everything is unlocked everywhere; nothing to send
    Nothing,
    /// One broadcast of the shared state
    Broadcast { credits: i32 },
    /// One targeted sync per connected remote peer
    PerPeer(Vec<PeerId>),
}

enum UnlockTarget {
    Canonical,
    Player(String),
}

fn group_contains(catalog: &Catalog, set: &UnlockSet, id: EmoteId) -> bool {
    match catalog.group_of(id) {
        Some(group) if !group.is_empty() => group.iter().any(|member| set.contains(member)),
        _ => set.contains(&id),
    }
}

/// Unlock ledger
#[derive(Debug)]
pub struct UnlockLedger {
    catalog: Arc<Catalog>,
    policy: SessionPolicy,
    local_username: String,
    unlocked: UnlockSet,
    tiers: [UnlockSet; 4],
    by_player: HashMap<String, PlayerUnlockBinding>,
    favorite_names: Vec<String>,
    favorites: UnlockSet,
    credits: i32,
    credits_by_player: HashMap<String, i32>,
}

impl UnlockLedger {
    pub fn new(catalog: Arc<Catalog>, policy: SessionPolicy, local_username: impl Into<String>) -> Self {
        let credits = policy.starting_credits;
        UnlockLedger {
            catalog,
            policy,
            local_username: local_username.into(),
            unlocked: UnlockSet::new(),
            tiers: Default::default(),
            by_player: HashMap::new(),
            favorite_names: Vec::new(),
            favorites: UnlockSet::new(),
            credits,
            credits_by_player: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn local_username(&self) -> &str {
        &self.local_username
    }

    /// The canonical set
    pub fn unlocked(&self) -> &UnlockSet {
        &self.unlocked
    }

    pub fn tier(&self, rarity: Rarity) -> &UnlockSet {
        &self.tiers[rarity.tier()]
    }

    pub fn favorites(&self) -> &UnlockSet {
        &self.favorites
    }

    pub fn binding(&self, player: &str) -> Option<&PlayerUnlockBinding> {
        self.by_player.get(player)
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.by_player.keys().map(String::as_str)
    }

    /// Follow a player's binding to the set it names
    pub fn unlocked_for(&self, player: &str) -> Option<&UnlockSet> {
        match self.by_player.get(player)? {
            PlayerUnlockBinding::Shared => Some(&self.unlocked),
            PlayerUnlockBinding::Independent(set) => Some(set),
        }
    }

    fn target_for(&self, player: Option<&str>) -> EmoteResult<UnlockTarget> {
        let Some(name) = player.filter(|name| !name.is_empty()) else {
            return Ok(UnlockTarget::Canonical);
        };
        if self.policy.share_everything || name == self.local_username {
            return Ok(UnlockTarget::Canonical);
        }
        match self.by_player.get(name) {
            Some(PlayerUnlockBinding::Shared) => Ok(UnlockTarget::Canonical),
            Some(PlayerUnlockBinding::Independent(_)) => Ok(UnlockTarget::Player(name.to_string())),
            None => Err(EmoteError::UnmappedPlayer(name.to_string())),
        }
    }

    /// Unlocked in the canonical set, counting sync-group members
    pub fn is_unlocked(&self, id: EmoteId) -> bool {
        group_contains(&self.catalog, &self.unlocked, id)
    }

    /// Unlocked for a specific player, counting sync-group members
    pub fn is_unlocked_for(&self, id: EmoteId, player: &str) -> EmoteResult<bool> {
        match self.target_for(Some(player))? {
            UnlockTarget::Canonical => Ok(self.is_unlocked(id)),
            UnlockTarget::Player(name) => {
                let set = self
                    .unlocked_for(&name)
                    .ok_or(EmoteError::UnmappedPlayer(name.clone()))?;
                Ok(group_contains(&self.catalog, set, id))
            }
        }
    }

    /// Unlock an emote, for the local player when `player` is `None`.
    ///
    /// Returns whether the set changed. Tier buckets and favorites follow
    /// the canonical set only.
    pub fn unlock_local(&mut self, id: EmoteId, player: Option<&str>) -> EmoteResult<bool> {
        let emote = self.catalog.lookup(id).ok_or(EmoteError::InvalidEmoteId {
            id: id.to_wire(),
            catalog_size: self.catalog.len(),
        })?;
        let (rarity, complementary) = (emote.rarity, emote.complementary);

        match self.target_for(player)? {
            UnlockTarget::Canonical => {
                if self.is_unlocked(id) {
                    return Ok(false);
                }
                self.unlocked.insert(id);
                if !complementary {
                    self.tiers[rarity.tier()].insert(id);
                }
                self.refresh_favorites();
                debug!(emote = %id, "unlocked emote");
                Ok(true)
            }
            UnlockTarget::Player(name) => {
                let catalog = &self.catalog;
                match self.by_player.get_mut(&name) {
                    Some(PlayerUnlockBinding::Independent(set)) => {
                        if group_contains(catalog, set, id) {
                            return Ok(false);
                        }
                        set.insert(id);
                        debug!(emote = %id, player = %name, "unlocked emote for player");
                        Ok(true)
                    }
                    _ => Err(EmoteError::UnmappedPlayer(name)),
                }
            }
        }
    }

    /// Unlock by raw wire id
    pub fn unlock_id(&mut self, raw: i16, player: Option<&str>) -> EmoteResult<bool> {
        let id = self.catalog.resolve_wire(raw)?.id;
        self.unlock_local(id, player)
    }

    /// Unlock several emotes; returns how many were new
    pub fn unlock_many<I>(&mut self, ids: I, player: Option<&str>) -> EmoteResult<usize>
    where
        I: IntoIterator<Item = EmoteId>,
    {
        let mut added = 0;
        for id in ids {
            if self.unlock_local(id, player)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Unlock the policy baseline: everything, or the complementary emotes
    pub fn apply_baseline(&mut self) -> usize {
        let ids: Vec<EmoteId> = if self.policy.unlock_everything {
            self.catalog.ids().collect()
        } else {
            self.catalog.complementary().map(|e| e.id).collect()
        };

        let mut added = 0;
        for id in ids {
            match self.unlock_local(id, None) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(err) => warn!(emote = %id, error = %err, "baseline unlock skipped"),
            }
        }
        added
    }

    /// Clear every set and rebuild the player bindings from the roster
    pub fn reset_unlocks(&mut self, roster: &[RosterPlayer]) {
        info!(players = roster.len(), "resetting unlocked emotes");
        self.unlocked.clear();
        for tier in &mut self.tiers {
            tier.clear();
        }
        self.favorites.clear();
        self.by_player.clear();

        for player in roster {
            let binding = if player.is_local || self.policy.share_everything {
                PlayerUnlockBinding::Shared
            } else {
                PlayerUnlockBinding::Independent(UnlockSet::new())
            };
            self.by_player.insert(player.username.clone(), binding);
        }

        self.apply_baseline();
        self.refresh_favorites();
    }

    /// Reset progress, honouring the persistence policy unless `force_all`
    pub fn reset_local(&mut self, force_all: bool, roster: &[RosterPlayer]) {
        info!(force_all, "resetting progress");
        if !self.policy.persistent_unlocks || force_all {
            self.reset_unlocks(roster);
        }
        if !self.policy.persistent_credits || force_all {
            let starting = self.policy.starting_credits;
            self.credits = starting;
            for balance in self.credits_by_player.values_mut() {
                *balance = starting;
            }
        }
    }

    /// Reconcile a joining player with the canonical set.
    ///
    /// A returning player's stored unlocks become canonical so progress is
    /// not lost on reconnect; afterwards the player shares the canonical set.
    pub fn reconcile_on_join(&mut self, username: &str) -> JoinOutcome {
        let outcome = match self.by_player.remove(username) {
            None => {
                info!(player = %username, "first join, seeding from canonical set");
                JoinOutcome::FirstJoin
            }
            Some(PlayerUnlockBinding::Shared) => JoinOutcome::Rejoined { restored: 0 },
            Some(PlayerUnlockBinding::Independent(stored)) => {
                let mut restored = 0;
                for id in stored {
                    match self.unlock_local(id, None) {
                        Ok(true) => restored += 1,
                        Ok(false) => {}
                        Err(err) => warn!(player = %username, emote = %id, error = %err, "stored unlock skipped"),
                    }
                }
                info!(player = %username, restored, "merged stored unlocks into canonical set");
                JoinOutcome::Rejoined { restored }
            }
        };

        self.by_player
            .insert(username.to_string(), PlayerUnlockBinding::Shared);
        self.credits_by_player
            .insert(username.to_string(), self.credits);
        outcome
    }

    /// Record a player's stored unlock state
    pub fn bind_player(&mut self, username: impl Into<String>, binding: PlayerUnlockBinding) {
        self.by_player.insert(username.into(), binding);
    }

    /// Canonical set ordered by (rarity, name)
    pub fn sort_canonical(&self) -> Vec<EmoteId> {
        let mut emotes: Vec<_> = self
            .unlocked
            .iter()
            .filter_map(|id| self.catalog.lookup(*id))
            .collect();
        emotes.sort_by(|a, b| a.rarity.cmp(&b.rarity).then_with(|| a.name.cmp(&b.name)));
        emotes.into_iter().map(|e| e.id).collect()
    }

    pub fn favorite_names(&self) -> &[String] {
        &self.favorite_names
    }

    pub fn set_favorite_names(&mut self, names: Vec<String>) {
        self.favorite_names = names;
        self.refresh_favorites();
    }

    /// Rebuild favorites from the configured names
    pub fn refresh_favorites(&mut self) {
        let favorites: UnlockSet = self
            .favorite_names
            .iter()
            .filter_map(|name| self.catalog.by_name(name))
            .map(|emote| self.catalog.canonical(emote.id))
            .filter(|id| self.is_unlocked(*id))
            .collect();
        self.favorites = favorites;
    }

    /// Canonical credit balance
    pub fn credits(&self) -> i32 {
        self.credits
    }

    pub fn set_credits(&mut self, credits: i32) {
        self.credits = credits;
    }

    pub fn credits_for(&self, player: &str) -> Option<i32> {
        self.credits_by_player.get(player).copied()
    }

    pub fn set_player_credits(&mut self, player: &str, credits: i32) -> EmoteResult<()> {
        if !self.by_player.contains_key(player) {
            return Err(EmoteError::UnmappedPlayer(player.to_string()));
        }
        self.credits_by_player.insert(player.to_string(), credits);
        Ok(())
    }

    /// Spend credits on an unlock. Already-unlocked emotes cost nothing.
    pub fn purchase(&mut self, id: EmoteId, player: Option<&str>, cost: i32) -> EmoteResult<bool> {
        let target = self.target_for(player)?;
        let (already, available) = match &target {
            UnlockTarget::Canonical => (self.is_unlocked(id), self.credits),
            UnlockTarget::Player(name) => (
                self.is_unlocked_for(id, name)?,
                self.credits_for(name).unwrap_or(0),
            ),
        };
        if already {
            return Ok(false);
        }
        if available < cost {
            return Err(EmoteError::InsufficientCredits {
                player: player.unwrap_or(self.local_username.as_str()).to_string(),
                needed: cost,
                available,
            });
        }

        let unlocked = self.unlock_local(id, player)?;
        match target {
            UnlockTarget::Canonical => self.credits -= cost,
            UnlockTarget::Player(name) => {
                *self.credits_by_player.entry(name).or_insert(0) -= cost;
            }
        }
        Ok(unlocked)
    }

    /// Decide how unlock state reaches the connected clients
    pub fn sync_plan(&self, roster: &[RosterPlayer]) -> UnlockSyncPlan {
        if self.policy.unlock_everything {
            return UnlockSyncPlan::Nothing;
        }
        if self.policy.share_everything {
            return UnlockSyncPlan::Broadcast {
                credits: self.credits,
            };
        }
        let peers: BTreeSet<PeerId> = roster
            .iter()
            .map(|p| p.peer)
            .filter(|peer| !peer.is_host())
            .collect();
        UnlockSyncPlan::PerPeer(peers.into_iter().collect())
    }
}
