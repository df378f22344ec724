//! Bounds-checked big-endian cursors used by the packet codec.
//!
//! The reader advances through a byte slice one field at a time and fails
//! with [`DecodeError::InsufficientData`] instead of panicking when a field
//! would run past the end.  The writer is its mirror image for encoding.

use crate::protocol::codec::DecodeError;

/// Sequential big-endian reader over a borrowed byte slice.
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.pos + N;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(DecodeError::InsufficientData {
                needed: end,
                available: self.buf.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.take::<2>().map(u16::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        self.take::<2>().map(i16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.take::<4>().map(u32::from_be_bytes)
    }
}

/// Sequential big-endian writer into a fixed-size buffer.
///
/// Writing past the end is a layout bug and panics.
pub struct PacketWriter<const N: usize> {
    buf: [u8; N],
    pos: usize,
}

impl<const N: usize> PacketWriter<N> {
    pub fn new() -> Self {
        Self {
            buf: [0u8; N],
            pos: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        debug_assert!(
            end <= N,
            "write of {} bytes at {} overruns {N}-byte packet",
            bytes.len(),
            self.pos
        );
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    pub fn write_u16(&mut self, v: u16) {
        self.put(&v.to_be_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.put(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.put(&v.to_be_bytes());
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn into_inner(self) -> [u8; N] {
        self.buf
    }
}

impl<const N: usize> Default for PacketWriter<N> {
    fn default() -> Self {
        Self::new()
    }
}
