//! Relay messages
//!
//! Layouts (all little-endian):
//! - PerformRequest: i16 emote id, u8 suppress audio
//! - PerformApply:   u16 controller id, i16 emote id, u8 suppress audio
//! - SyncRequest:    u16 target controller id, i16 override variant
//! - SyncApply:      u16 controller id, u16 target controller id, i16 override variant
//!
//! Emote ids stay raw `i16` here; bounds are checked by the consumer against
//! its own catalog. An override variant of `-1` is `None`.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use emotesync_core::{ControllerId, EmoteError, EmoteResult};

use crate::MessageKind;

/// Wire sentinel for "no explicit variant override"
pub const NO_VARIANT: i16 = -1;

#[inline]
fn encode_variant(variant: Option<i16>) -> i16 {
    match variant {
        Some(v) if v >= 0 => v,
        _ => NO_VARIANT,
    }
}

#[inline]
fn decode_variant(raw: i16) -> Option<i16> {
    if raw < 0 {
        None
    } else {
        Some(raw)
    }
}

fn ensure_len(buf: &[u8], kind: MessageKind) -> EmoteResult<()> {
    let expected = kind.payload_size();
    if buf.len() < expected {
        return Err(EmoteError::BufferTooShort {
            expected,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// "I want to perform this emote."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerformRequest {
    pub emote_id: i16,
    pub suppress_audio: bool,
}

impl PerformRequest {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MessageKind::PerformRequest.payload_size());
        buf.put_i16_le(self.emote_id);
        buf.put_u8(self.suppress_audio as u8);
        buf.freeze()
    }

    pub fn decode(mut buf: &[u8]) -> EmoteResult<Self> {
        ensure_len(buf, MessageKind::PerformRequest)?;
        let emote_id = buf.get_i16_le();
        let suppress_audio = buf.get_u8() != 0;
        Ok(PerformRequest {
            emote_id,
            suppress_audio,
        })
    }
}

/// "This controller is now performing this emote."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerformApply {
    pub controller: ControllerId,
    pub emote_id: i16,
    pub suppress_audio: bool,
}

impl PerformApply {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MessageKind::PerformApply.payload_size());
        buf.put_u16_le(self.controller.0);
        buf.put_i16_le(self.emote_id);
        buf.put_u8(self.suppress_audio as u8);
        buf.freeze()
    }

    pub fn decode(mut buf: &[u8]) -> EmoteResult<Self> {
        ensure_len(buf, MessageKind::PerformApply)?;
        let controller = ControllerId(buf.get_u16_le());
        let emote_id = buf.get_i16_le();
        let suppress_audio = buf.get_u8() != 0;
        Ok(PerformApply {
            controller,
            emote_id,
            suppress_audio,
        })
    }
}

/// "Make my controller mirror that controller's performance."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncRequest {
    pub target: ControllerId,
    pub override_variant: Option<i16>,
}

impl SyncRequest {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MessageKind::SyncRequest.payload_size());
        buf.put_u16_le(self.target.0);
        buf.put_i16_le(encode_variant(self.override_variant));
        buf.freeze()
    }

    pub fn decode(mut buf: &[u8]) -> EmoteResult<Self> {
        ensure_len(buf, MessageKind::SyncRequest)?;
        let target = ControllerId(buf.get_u16_le());
        let override_variant = decode_variant(buf.get_i16_le());
        Ok(SyncRequest {
            target,
            override_variant,
        })
    }
}

/// "This controller now mirrors that controller."
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncApply {
    pub controller: ControllerId,
    pub target: ControllerId,
    pub override_variant: Option<i16>,
}

impl SyncApply {
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MessageKind::SyncApply.payload_size());
        buf.put_u16_le(self.controller.0);
        buf.put_u16_le(self.target.0);
        buf.put_i16_le(encode_variant(self.override_variant));
        buf.freeze()
    }

    pub fn decode(mut buf: &[u8]) -> EmoteResult<Self> {
        ensure_len(buf, MessageKind::SyncApply)?;
        let controller = ControllerId(buf.get_u16_le());
        let target = ControllerId(buf.get_u16_le());
        let override_variant = decode_variant(buf.get_i16_le());
        Ok(SyncApply {
            controller,
            target,
            override_variant,
        })
    }
}

/// Any relay message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayMessage {
    PerformRequest(PerformRequest),
    PerformApply(PerformApply),
    SyncRequest(SyncRequest),
    SyncApply(SyncApply),
}

impl RelayMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            RelayMessage::PerformRequest(_) => MessageKind::PerformRequest,
            RelayMessage::PerformApply(_) => MessageKind::PerformApply,
            RelayMessage::SyncRequest(_) => MessageKind::SyncRequest,
            RelayMessage::SyncApply(_) => MessageKind::SyncApply,
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            RelayMessage::PerformRequest(m) => m.encode(),
            RelayMessage::PerformApply(m) => m.encode(),
            RelayMessage::SyncRequest(m) => m.encode(),
            RelayMessage::SyncApply(m) => m.encode(),
        }
    }

    /// Decode a payload received on the channel for `kind`
    pub fn decode(kind: MessageKind, buf: &[u8]) -> EmoteResult<Self> {
        Ok(match kind {
            MessageKind::PerformRequest => RelayMessage::PerformRequest(PerformRequest::decode(buf)?),
            MessageKind::PerformApply => RelayMessage::PerformApply(PerformApply::decode(buf)?),
            MessageKind::SyncRequest => RelayMessage::SyncRequest(SyncRequest::decode(buf)?),
            MessageKind::SyncApply => RelayMessage::SyncApply(SyncApply::decode(buf)?),
        })
    }
}
