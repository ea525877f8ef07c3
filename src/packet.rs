use std::fmt;

use crate::error::RconError;

/// The role a packet plays in the protocol. The wire value `2` is shared by
/// [PacketType::ExecCommand] and [PacketType::AuthResponse]; which one is
/// meant depends on the direction the packet travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    // SERVERDATA_AUTH
    Auth,
    // SERVERDATA_EXECCOMMAND
    ExecCommand,
    // SERVERDATA_AUTH_RESPONSE
    AuthResponse,
    // SERVERDATA_RESPONSE_VALUE
    ResponseValue,
}

impl PacketType {
    pub fn wire_value(&self) -> i32 {
        match self {
            PacketType::Auth => 3,
            PacketType::ExecCommand => 2,
            PacketType::AuthResponse => 2,
            PacketType::ResponseValue => 0,
        }
    }

    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.wire_value().to_le_bytes()
    }
}

/// A single protocol packet.
///
/// `size` is not stored: it is derived from the body whenever it is needed,
/// so two packets are equal when their id, type and body are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    id: i32,
    packet_type: Option<PacketType>,
    body: String,
}

impl Packet {
    /// id + type + the two trailing NULs.
    pub const BASE_PACKET_SIZE: i32 = 10;
    /// Bytes taken by the leading size field, which does not count itself.
    pub const SIZE_FIELD_LEN: usize = 4;
    /// Largest size field a server is allowed to send.
    pub const MAX_PACKET_SIZE: i32 = 4096;

    pub fn new(id: i32, packet_type: PacketType, body: impl Into<String>) -> Self {
        Packet {
            id,
            packet_type: Some(packet_type),
            body: body.into(),
        }
    }

    /// A packet with no type. It can be inspected but never encoded.
    pub fn untyped(id: i32, body: impl Into<String>) -> Self {
        Packet {
            id,
            packet_type: None,
            body: body.into(),
        }
    }

    pub fn auth(id: i32, password: &str) -> Self {
        Self::new(id, PacketType::Auth, password)
    }

    pub fn exec_command(id: i32, command: &str) -> Self {
        Self::new(id, PacketType::ExecCommand, command)
    }

    pub fn auth_response(id: i32) -> Self {
        Self::new(id, PacketType::AuthResponse, "")
    }

    pub fn response_value(id: i32, body: impl Into<String>) -> Self {
        Self::new(id, PacketType::ResponseValue, body)
    }

    // Since the only one of these values that can change in length is the body,
    // an easy way to calculate the size of a packet is to find the byte-length
    // of the packet body, then add 10 to it.
    pub fn size(&self) -> i32 {
        i32::try_from(self.body.len())
            .unwrap_or(i32::MAX)
            .saturating_add(Self::BASE_PACKET_SIZE)
    }

    /// Size field for a body of `body_len` bytes, if it fits in an `i32`.
    pub fn frame_size(body_len: usize) -> Result<i32, RconError> {
        i32::try_from(body_len)
            .ok()
            .and_then(|len| len.checked_add(Self::BASE_PACKET_SIZE))
            .ok_or(RconError::PacketTooLarge(body_len))
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Overrides the id. Only meant for tests that need to pin ids down.
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn packet_type(&self) -> Option<PacketType> {
        self.packet_type
    }

    pub fn is(&self, packet_type: PacketType) -> bool {
        self.packet_type == Some(packet_type)
    }

    pub fn body(&self) -> &str {
        self.body.as_ref()
    }

    pub fn into_body(self) -> String {
        self.body
    }

    /// Encode the packet into a complete frame, size field included.
    pub fn pack(&self) -> Result<Vec<u8>, RconError> {
        let packet_type = self.packet_type.ok_or(RconError::MissingPacketType)?;
        let size = Self::frame_size(self.body.len())?;

        // Size, ID, Type, Body, Terminator
        let mut payload = Vec::<u8>::with_capacity(Self::SIZE_FIELD_LEN + size as usize);
        payload.extend_from_slice(&size.to_le_bytes());
        payload.extend_from_slice(&self.id.to_le_bytes());
        payload.extend_from_slice(&packet_type.to_le_bytes());
        payload.extend_from_slice(self.body.as_bytes());
        // null terminate the body, then null terminate the entire packet
        payload.extend_from_slice(&[0u8, 0u8]);
        Ok(payload)
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.packet_type {
            Some(t) => write!(f, "{:?}(id={}, size={})", t, self.id, self.size()),
            None => write!(f, "Packet(id={}, size={})", self.id, self.size()),
        }
    }
}
