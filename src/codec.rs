//! Frame decoding.
//!
//! Encoding is driven by the packet being sent ([Packet::pack]). Decoding
//! cannot work the same way: the wire value `2` means "exec command" when we
//! send it and "auth response" when the server sends it. The registry below
//! therefore only knows about the packets a server sends back.
use std::collections::HashMap;

use log::trace;

use crate::{
    error::RconError,
    packet::{Packet, PacketType},
};

/// Maps wire type values to the packet variant they decode into.
#[derive(Debug, Clone)]
pub struct PacketRegistry {
    types: HashMap<i32, PacketType>,
}

impl PacketRegistry {
    pub fn empty() -> Self {
        PacketRegistry {
            types: HashMap::new(),
        }
    }

    /// Registry for a client: everything a server may answer with.
    pub fn responses() -> Self {
        let mut registry = Self::empty();
        registry.register(PacketType::AuthResponse);
        registry.register(PacketType::ResponseValue);
        registry
    }

    /// Register `packet_type` under its wire value, replacing whatever was
    /// there before.
    pub fn register(&mut self, packet_type: PacketType) -> &mut Self {
        self.types.insert(packet_type.wire_value(), packet_type);
        self
    }

    pub fn lookup(&self, wire_value: i32) -> Option<PacketType> {
        self.types.get(&wire_value).copied()
    }

    /// Decode one frame with its leading size field already stripped.
    pub fn decode(&self, raw: &[u8]) -> Result<Packet, RconError> {
        if raw.len() < Packet::BASE_PACKET_SIZE as usize {
            return Err(RconError::MalformedFrame(raw.len() as i32));
        }

        let body_len = raw.len() - Packet::BASE_PACKET_SIZE as usize;
        let id = read_i32(&raw[0..4]);
        let wire_type = read_i32(&raw[4..8]);
        let packet_type = self
            .lookup(wire_type)
            .ok_or(RconError::UnknownPacketType(wire_type))?;
        let body = String::from_utf8(raw[8..8 + body_len].to_vec())?;

        trace!("decoded {:?} id {} ({} body bytes)", packet_type, id, body_len);
        Ok(Packet::new(id, packet_type, body))
    }
}

impl Default for PacketRegistry {
    fn default() -> Self {
        Self::responses()
    }
}

pub(crate) fn read_i32(bytes: &[u8]) -> i32 {
    let mut le = [0u8; 4];
    le.copy_from_slice(&bytes[..4]);
    i32::from_le_bytes(le)
}
