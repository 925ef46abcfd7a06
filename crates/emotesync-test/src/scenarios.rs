//! End-to-end relay scenarios
//!
//! Builds a host plus N peers over the loopback network and checks that
//! every session converges on the same performance state.

use std::sync::Arc;

use emotesync_core::{Catalog, CatalogBuilder, ControllerId, EmoteResult, PeerId, Rarity};
use emotesync_runtime::{RelayConfig, Session};
use emotesync_state::ControllerKind;

use crate::LoopbackNetwork;

/// Wave, Dab, Bow and its variant
pub fn demo_catalog() -> Arc<Catalog> {
    let catalog = CatalogBuilder::new()
        .complementary("Wave", Rarity::Common)
        .emote("Dab", Rarity::Rare)
        .emote("Bow", Rarity::Epic)
        .emote("BowVariant", Rarity::Epic)
        .group(&["Bow", "BowVariant"])
        .build();
    Arc::new(catalog.expect("demo catalog is valid"))
}

/// Controller owned by `peer`; the host is controller 0
pub fn player_controller(peer: PeerId) -> ControllerId {
    ControllerId(peer.0 as u16)
}

/// Host plus `peers` peers (ids 1..=peers), each with a player controller
/// registered on every session
pub fn relay_network(
    catalog: Arc<Catalog>,
    peers: u64,
    config: RelayConfig,
) -> EmoteResult<LoopbackNetwork> {
    let mut net = LoopbackNetwork::new(Session::host(Arc::clone(&catalog), config.clone()));
    for raw in 1..=peers {
        net.add_peer(Session::peer(PeerId(raw), Arc::clone(&catalog), config.clone()));
    }
    for raw in 0..=peers {
        let peer = PeerId(raw);
        net.spawn_everywhere(player_controller(peer), Some(peer), ControllerKind::Player)?;
    }
    Ok(net)
}
