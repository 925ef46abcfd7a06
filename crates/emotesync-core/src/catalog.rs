//! Emote catalog - the static table of known emotes
//!
//! The catalog is built once and never mutated. Ids are dense and 0-based,
//! so the bounds check in [`Catalog::resolve_wire`] is the input-validation
//! gate for every message that carries an emote id.

use std::collections::HashMap;
use std::fmt;

use crate::{EmoteError, EmoteId, EmoteResult};

/// Largest catalog whose ids still fit the signed wire field
pub const MAX_CATALOG_SIZE: usize = i16::MAX as usize + 1;

/// Rarity tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rarity {
    Common = 0,
    Rare = 1,
    Epic = 2,
    Legendary = 3,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Rarity::Common),
            1 => Some(Rarity::Rare),
            2 => Some(Rarity::Epic),
            3 => Some(Rarity::Legendary),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Tier bucket index
    #[inline]
    pub fn tier(self) -> usize {
        self as usize
    }
}

/// Sync group identity - index into the catalog's group table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SyncGroupId(pub u16);

/// A single catalog entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emote {
    pub id: EmoteId,
    pub name: String,
    pub rarity: Rarity,
    /// Baseline emote: always available, never bucketed by tier
    pub complementary: bool,
    /// Group of mutually-exclusive variants this emote belongs to
    pub sync_group: Option<SyncGroupId>,
}

impl fmt::Display for Emote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// Immutable emote table
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    emotes: Vec<Emote>,
    groups: Vec<Vec<EmoteId>>,
    by_name: HashMap<String, EmoteId>,
}

impl Catalog {
    /// Number of emotes
    #[inline]
    pub fn len(&self) -> usize {
        self.emotes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.emotes.is_empty()
    }

    /// All emotes, indexed by id
    pub fn all(&self) -> &[Emote] {
        &self.emotes
    }

    pub fn lookup(&self, id: EmoteId) -> Option<&Emote> {
        self.emotes.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<&Emote> {
        self.by_name.get(name).and_then(|id| self.lookup(*id))
    }

    /// Bounds-check a signed wire id and resolve it
    pub fn resolve_wire(&self, raw: i16) -> EmoteResult<&Emote> {
        EmoteId::from_wire(raw)
            .and_then(|id| self.lookup(id))
            .ok_or(EmoteError::InvalidEmoteId {
                id: raw,
                catalog_size: self.len(),
            })
    }

    /// Members of the emote's sync group, in declaration order
    pub fn group_of(&self, id: EmoteId) -> Option<&[EmoteId]> {
        let group = self.lookup(id)?.sync_group?;
        self.groups.get(group.0 as usize).map(Vec::as_slice)
    }

    /// Position of the emote inside its own sync group
    pub fn group_index(&self, id: EmoteId) -> Option<i16> {
        self.group_of(id)?
            .iter()
            .position(|member| *member == id)
            .map(|pos| pos as i16)
    }

    /// Group member at `variant`, if the emote is grouped and the index is in range
    pub fn variant_of(&self, id: EmoteId, variant: i16) -> Option<EmoteId> {
        let index = usize::try_from(variant).ok()?;
        self.group_of(id)?.get(index).copied()
    }

    /// Representative of the emote's group (first member), or the emote itself
    pub fn canonical(&self, id: EmoteId) -> EmoteId {
        self.group_of(id)
            .and_then(|group| group.first().copied())
            .unwrap_or(id)
    }

    /// Baseline emotes
    pub fn complementary(&self) -> impl Iterator<Item = &Emote> {
        self.emotes.iter().filter(|e| e.complementary)
    }

    pub fn ids(&self) -> impl Iterator<Item = EmoteId> + '_ {
        self.emotes.iter().map(|e| e.id)
    }
}

struct EmoteSpec {
    name: String,
    rarity: Rarity,
    complementary: bool,
}

/// Catalog builder
#[derive(Default)]
pub struct CatalogBuilder {
    emotes: Vec<EmoteSpec>,
    groups: Vec<Vec<String>>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emote(mut self, name: impl Into<String>, rarity: Rarity) -> Self {
        self.emotes.push(EmoteSpec {
            name: name.into(),
            rarity,
            complementary: false,
        });
        self
    }

    pub fn complementary(mut self, name: impl Into<String>, rarity: Rarity) -> Self {
        self.emotes.push(EmoteSpec {
            name: name.into(),
            rarity,
            complementary: true,
        });
        self
    }

    /// Declare a sync group; member order defines variant indices
    pub fn group<S: AsRef<str>>(mut self, members: &[S]) -> Self {
        self.groups
            .push(members.iter().map(|m| m.as_ref().to_string()).collect());
        self
    }

    pub fn build(self) -> EmoteResult<Catalog> {
        if self.emotes.len() > MAX_CATALOG_SIZE {
            return Err(EmoteError::InvalidCatalog(format!(
                "{} emotes exceed the wire limit of {}",
                self.emotes.len(),
                MAX_CATALOG_SIZE
            )));
        }

        let mut emotes = Vec::with_capacity(self.emotes.len());
        let mut by_name = HashMap::with_capacity(self.emotes.len());

        for (index, spec) in self.emotes.into_iter().enumerate() {
            let id = EmoteId(index as u16);
            if by_name.insert(spec.name.clone(), id).is_some() {
                return Err(EmoteError::InvalidCatalog(format!(
                    "duplicate emote name {:?}",
                    spec.name
                )));
            }
            emotes.push(Emote {
                id,
                name: spec.name,
                rarity: spec.rarity,
                complementary: spec.complementary,
                sync_group: None,
            });
        }

        let mut groups = Vec::with_capacity(self.groups.len());
        for names in self.groups {
            if names.is_empty() {
                continue;
            }
            let group_id = SyncGroupId(groups.len() as u16);
            let mut members = Vec::with_capacity(names.len());
            for name in &names {
                let id = *by_name.get(name).ok_or_else(|| {
                    EmoteError::InvalidCatalog(format!("sync group names unknown emote {:?}", name))
                })?;
                let emote = &mut emotes[id.index()];
                if emote.sync_group.is_some() {
                    return Err(EmoteError::InvalidCatalog(format!(
                        "emote {:?} belongs to more than one sync group",
                        name
                    )));
                }
                emote.sync_group = Some(group_id);
                members.push(id);
            }
            groups.push(members);
        }

        Ok(Catalog {
            emotes,
            groups,
            by_name,
        })
    }
}
