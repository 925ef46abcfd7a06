//! Runtime configuration
//!
//! Both documents load from JSON. Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use emotesync_core::{Catalog, CatalogBuilder, EmoteError, EmoteResult, Rarity};
use emotesync_state::SessionPolicy;

/// Relay configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Username of the player driving this process
    pub local_username: String,
    /// The host also renders performances for controllers it does not drive
    pub host_renders: bool,
    /// Maximum outgoing message buffer
    pub max_outgoing: usize,
    pub policy: SessionPolicy,
    /// Favorite emote names, in display order
    pub favorites: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            local_username: "Player".to_string(),
            host_renders: true,
            max_outgoing: 1000,
            policy: SessionPolicy::default(),
            favorites: Vec::new(),
        }
    }
}

impl RelayConfig {
    pub fn from_json(json: &str) -> EmoteResult<Self> {
        let config: RelayConfig =
            serde_json::from_str(json).map_err(|e| EmoteError::Config(e.to_string()))?;
        if config.max_outgoing == 0 {
            return Err(EmoteError::Config("max_outgoing must be at least 1".into()));
        }
        Ok(config)
    }
}

/// One catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteDefinition {
    pub name: String,
    /// Rarity tier, 0 (common) through 3 (legendary)
    #[serde(default)]
    pub rarity: u8,
    /// Unlocked for everyone at session start
    #[serde(default)]
    pub complementary: bool,
    /// Sync group name; members are ordered by declaration
    #[serde(default)]
    pub group: Option<String>,
}

/// Catalog document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub emotes: Vec<EmoteDefinition>,
}

impl CatalogConfig {
    pub fn from_json(json: &str) -> EmoteResult<Self> {
        serde_json::from_str(json).map_err(|e| EmoteError::Config(e.to_string()))
    }

    /// Build the immutable catalog. Emote ids follow declaration order.
    pub fn build(&self) -> EmoteResult<Catalog> {
        let mut builder = CatalogBuilder::new();
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();

        for def in &self.emotes {
            let rarity = Rarity::from_byte(def.rarity).ok_or_else(|| {
                EmoteError::InvalidCatalog(format!("{}: unknown rarity {}", def.name, def.rarity))
            })?;
            builder = if def.complementary {
                builder.complementary(def.name.as_str(), rarity)
            } else {
                builder.emote(def.name.as_str(), rarity)
            };

            if let Some(group) = def.group.as_deref() {
                match groups.iter_mut().find(|(name, _)| *name == group) {
                    Some((_, members)) => members.push(def.name.as_str()),
                    None => groups.push((group, vec![def.name.as_str()])),
                }
            }
        }

        for (_, members) in &groups {
            builder = builder.group(members.as_slice());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotesync_core::{EmoteId, SyncGroupId};

    const CATALOG: &str = r#"{
        "emotes": [
            { "name": "Wave", "complementary": true },
            { "name": "Dance", "rarity": 1 },
            { "name": "Bow", "rarity": 2, "group": "bow" },
            { "name": "Cheer", "rarity": 3 },
            { "name": "BowVariant", "rarity": 2, "group": "bow" }
        ]
    }"#;

    #[test]
    fn test_relay_config_defaults() {
        let config = RelayConfig::from_json("{}").unwrap();
        assert_eq!(config, RelayConfig::default());
        assert!(config.host_renders);
        assert_eq!(config.policy.starting_credits, 0);
    }

    #[test]
    fn test_relay_config_nested_policy() {
        let config = RelayConfig::from_json(
            r#"{ "local_username": "Alice", "policy": { "share_everything": true } }"#,
        )
        .unwrap();
        assert_eq!(config.local_username, "Alice");
        assert!(config.policy.share_everything);
        assert!(!config.policy.persistent_unlocks);
    }

    #[test]
    fn test_relay_config_rejects_bad_input() {
        assert!(matches!(RelayConfig::from_json("{ nope"), Err(EmoteError::Config(_))));
        assert!(matches!(
            RelayConfig::from_json(r#"{ "max_outgoing": 0 }"#),
            Err(EmoteError::Config(_))
        ));
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = CatalogConfig::from_json(CATALOG).unwrap().build().unwrap();
        assert_eq!(catalog.len(), 5);

        let bow = catalog.by_name("Bow").unwrap();
        let variant = catalog.by_name("BowVariant").unwrap();
        assert_eq!(bow.id, EmoteId(2));
        assert_eq!(variant.id, EmoteId(4));
        assert_eq!(bow.sync_group, Some(SyncGroupId(0)));
        assert_eq!(catalog.group_index(variant.id), Some(1));
        assert_eq!(catalog.by_name("Cheer").unwrap().rarity, Rarity::Legendary);
        assert_eq!(catalog.complementary().count(), 1);
    }

    #[test]
    fn test_catalog_unknown_rarity() {
        let config = CatalogConfig::from_json(r#"{ "emotes": [{ "name": "Odd", "rarity": 9 }] }"#).unwrap();
        assert!(matches!(config.build(), Err(EmoteError::InvalidCatalog(_))));
    }
}
