//! Protocol module containing the packet constants and the binary codec.

pub mod codec;
pub mod cursor;
pub mod packet;

pub use codec::{decode_datagram, decode_packet, encode_packet, DecodeError};
pub use packet::{ProtocolVersion, PACKET_MAGIC, PACKET_SIZE, PROTOCOL_VERSION};
