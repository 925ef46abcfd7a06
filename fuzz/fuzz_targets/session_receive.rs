#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use emotesync_core::{CatalogBuilder, ControllerId, PeerId, Rarity, Role};
use emotesync_runtime::{RelayConfig, Session};
use emotesync_state::ControllerKind;
use emotesync_wire::MessageKind;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    host: bool,
    messages: Vec<(u8, u8, Vec<u8>)>,
}

fuzz_target!(|input: Input| {
    let Ok(catalog) = CatalogBuilder::new()
        .complementary("Wave", Rarity::Common)
        .emote("Bow", Rarity::Epic)
        .emote("BowVariant", Rarity::Epic)
        .group(&["Bow", "BowVariant"])
        .build()
    else {
        return;
    };
    let role = if input.host { Role::Host } else { Role::Peer };
    let local = if input.host { PeerId::HOST } else { PeerId(1) };
    let mut session = Session::new(role, local, Arc::new(catalog), RelayConfig::default());
    for raw in 0..4u16 {
        let _ = session.spawn_controller(Some(ControllerId(raw)), Some(PeerId(u64::from(raw))), ControllerKind::Player);
    }

    for (kind, sender, payload) in input.messages {
        let kind = MessageKind::ALL[usize::from(kind) % MessageKind::ALL.len()];
        let sender = PeerId(u64::from(sender % 5));
        session.receive(kind.channel(), sender, &payload);

        // Every performing controller still names a real emote
        for controller in session.registry().iter() {
            if let Some(emote) = controller.performing_emote() {
                assert!(session.catalog().lookup(emote).is_some());
            }
        }
    }
});
