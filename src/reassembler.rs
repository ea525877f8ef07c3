//! Turns arbitrarily chunked socket reads back into whole packets.
use crate::{
    codec::{read_i32, PacketRegistry},
    error::RconError,
    packet::Packet,
};

/// Append `chunk` to `buffer` and try to cut one complete frame off the
/// front. Returns the packet, if there was a whole one, and whatever bytes
/// are left over.
pub fn extract_packet(
    registry: &PacketRegistry,
    mut buffer: Vec<u8>,
    chunk: &[u8],
) -> Result<(Option<Packet>, Vec<u8>), RconError> {
    buffer.extend_from_slice(chunk);

    if buffer.len() < Packet::SIZE_FIELD_LEN {
        return Ok((None, buffer));
    }

    let size = read_i32(&buffer);
    if !(Packet::BASE_PACKET_SIZE..=Packet::MAX_PACKET_SIZE).contains(&size) {
        return Err(RconError::MalformedFrame(size));
    }

    let end = Packet::SIZE_FIELD_LEN + size as usize;
    if buffer.len() < end {
        return Ok((None, buffer));
    }

    let packet = registry.decode(&buffer[Packet::SIZE_FIELD_LEN..end])?;
    let remaining = buffer.split_off(end);
    Ok((Some(packet), remaining))
}

/// Owns the accumulation buffer between reads.
#[derive(Debug, Default)]
pub struct Reassembler {
    registry: PacketRegistry,
    buffer: Vec<u8>,
}

impl Reassembler {
    pub fn new(registry: PacketRegistry) -> Self {
        Reassembler {
            registry,
            buffer: Vec::new(),
        }
    }

    /// Feed a chunk and take at most one packet out.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Option<Packet>, RconError> {
        let buffer = std::mem::take(&mut self.buffer);
        let (packet, remaining) = extract_packet(&self.registry, buffer, chunk)?;
        self.buffer = remaining;
        Ok(packet)
    }

    /// Take the next packet out of what is already buffered.
    pub fn next_packet(&mut self) -> Result<Option<Packet>, RconError> {
        self.push(&[])
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
