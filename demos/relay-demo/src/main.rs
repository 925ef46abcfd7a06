//! Relay Demo - one host and two peers exchanging performances
//!
//! Usage: relay-demo [catalog.json] [--json]

use std::error::Error;
use std::sync::Arc;

use tracing::info;

use emotesync_core::{ControllerId, PeerId};
use emotesync_runtime::{init_logging, CatalogConfig, LogFormat, RelayConfig, Session};
use emotesync_test::{player_controller, relay_network, LoopbackNetwork};

const DEFAULT_CATALOG: &str = include_str!("../catalog.json");

fn print_controllers(net: &LoopbackNetwork) {
    for session in net.sessions() {
        println!("  [{} {}]", session.role(), session.local_peer());
        for controller in session.registry().iter() {
            println!("    controller {}: {:?}", controller.id, controller.state());
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut catalog_path = None;
    let mut format = LogFormat::Compact;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => format = LogFormat::Json,
            _ => catalog_path = Some(arg),
        }
    }
    init_logging("info", format);

    let catalog_json = match catalog_path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_CATALOG.to_string(),
    };
    let catalog = Arc::new(CatalogConfig::from_json(&catalog_json)?.build()?);

    println!("╔════════════════════════════════════════╗");
    println!("║     EmoteSync Relay Demo               ║");
    println!("╚════════════════════════════════════════╝");
    println!("Catalog: {} emotes", catalog.len());

    let mut net = relay_network(Arc::clone(&catalog), 2, RelayConfig::default())?;
    net.join(PeerId::HOST, "Host");
    net.join(PeerId(1), "Alice");
    net.join(PeerId(2), "Bob");
    net.host_mut().on_session_start();

    let bow = catalog.by_name("BowVariant").or_else(|| catalog.all().last());
    let Some(bow) = bow else {
        println!("Catalog is empty, nothing to perform");
        return Ok(());
    };

    println!("\n> Host performs {}", bow);
    net.host_mut().request_perform(bow.id, false)?;
    info!(delivered = net.pump(), "host perform relayed");
    print_controllers(&net);

    let alice = PeerId(1);
    println!("\n> Alice mirrors the host");
    peer(&mut net, alice)?.request_sync(player_controller(PeerId::HOST), None)?;
    info!(delivered = net.pump(), "sync relayed");
    print_controllers(&net);

    println!("\n> Bob tries a self-sync (rejected locally)");
    if let Err(err) = peer(&mut net, PeerId(2))?.request_sync(ControllerId(2), None) {
        println!("  rejected: {}", err);
    }

    let stats = net.host().stats();
    println!(
        "\nHost: {} in, {} relayed, {} dropped, {} out",
        stats.messages_in,
        stats.relayed,
        stats.dropped(),
        stats.messages_out
    );
    Ok(())
}

fn peer(net: &mut LoopbackNetwork, id: PeerId) -> Result<&mut Session, Box<dyn Error>> {
    net.peer_mut(id)
        .ok_or_else(|| format!("peer {} is not connected", id).into())
}
