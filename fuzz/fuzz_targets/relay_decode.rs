#![no_main]

use emotesync_wire::{MessageKind, RelayMessage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for kind in MessageKind::ALL {
        if let Ok(message) = RelayMessage::decode(kind, data) {
            let encoded = message.encode();
            assert_eq!(encoded.len(), kind.payload_size());
            // Re-decoding the canonical encoding is stable
            assert_eq!(RelayMessage::decode(kind, &encoded).ok(), Some(message));
        }
    }
});
