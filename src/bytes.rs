//! Little-endian primitive reads over an in-memory buffer.
//!
//! Every decode in the crate bottoms out here.  [`ByteReader`] is a bounded
//! cursor: running past the end of its slice is reported as
//! [`WireError::Truncated`] with the absolute offset, never as a panic.
//! Writes go straight to a `Vec<u8>` through byteorder's `WriteBytesExt`.

use byteorder::{ByteOrder, LittleEndian};

use crate::wire::WireError;

/// Bounded little-endian cursor over a byte slice.
///
/// `base` is the absolute position of `data[0]` within the enclosing file, so
/// sub-readers created with [`ByteReader::split`] keep reporting file offsets.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos:  usize,
    base: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    pub fn with_base(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Absolute offset of the next byte to be read.
    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to a position relative to the start of this reader's slice.
    pub fn seek(&mut self, pos: usize) -> Result<(), WireError> {
        if pos > self.data.len() {
            return Err(WireError::Truncated {
                offset:    self.base + self.data.len(),
                needed:    pos - self.data.len(),
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if n > self.remaining() {
            return Err(WireError::Truncated {
                offset:    self.position(),
                needed:    n,
                available: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Consume everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    /// Carve the next `n` bytes off into an independent reader.
    pub fn split(&mut self, n: usize) -> Result<ByteReader<'a>, WireError> {
        let base = self.position();
        let data = self.take(n)?;
        Ok(ByteReader::with_base(data, base))
    }

    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }
}

/// Overwrite a `u32` previously reserved in `out` at `at`.
pub fn patch_u32(out: &mut [u8], at: usize, value: u32) {
    LittleEndian::write_u32(&mut out[at..at + 4], value);
}
