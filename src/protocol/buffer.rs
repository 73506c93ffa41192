//! Buffer utilities for reading and writing MariaDB protocol data.
//!
//! All fixed-width integers on the MariaDB wire are little-endian.

use crate::error::{Error, Result};
use crate::protocol::constants::{
    LENENC_NULL, LENENC_PREFIX_U16, LENENC_PREFIX_U24, LENENC_PREFIX_U64,
};
use bytes::{BufMut, Bytes, BytesMut};

/// A forward-reading cursor over one received protocol packet.
#[derive(Debug, Clone)]
pub struct ReadBuffer {
    data: Bytes,
    pos: usize,
}

impl ReadBuffer {
    /// Create a new read buffer from bytes.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Get the current position in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to an absolute position.
    #[track_caller]
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::BufferTooSmall {
                needed: pos,
                available: self.data.len(),
                location: std::panic::Location::caller(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Get the remaining bytes in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if the buffer has at least `n` bytes remaining.
    pub fn has_remaining(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// The whole backing packet.
    pub fn packet(&self) -> &Bytes {
        &self.data
    }

    #[track_caller]
    fn ensure(&self, n: usize) -> Result<()> {
        if !self.has_remaining(n) {
            return Err(Error::BufferTooSmall {
                needed: n,
                available: self.remaining(),
                location: std::panic::Location::caller(),
            });
        }
        Ok(())
    }

    #[track_caller]
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Skip `n` bytes.
    #[track_caller]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Read a single byte.
    #[track_caller]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    /// Read a signed byte.
    #[track_caller]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take::<1>()?[0] as i8)
    }

    /// Read a little-endian u16.
    #[track_caller]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    /// Read a little-endian i16.
    #[track_caller]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    /// Read a little-endian unsigned 3-byte integer.
    #[track_caller]
    pub fn read_u24(&mut self) -> Result<u32> {
        let [a, b, c] = self.take::<3>()?;
        Ok(u32::from_le_bytes([a, b, c, 0]))
    }

    /// Read a little-endian signed 3-byte integer (sign-extended).
    #[track_caller]
    pub fn read_i24(&mut self) -> Result<i32> {
        let [a, b, c] = self.take::<3>()?;
        let fill = if c & 0x80 != 0 { 0xff } else { 0 };
        Ok(i32::from_le_bytes([a, b, c, fill]))
    }

    /// Read a little-endian u32.
    #[track_caller]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    /// Read a little-endian i32.
    #[track_caller]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    /// Read a little-endian u64.
    #[track_caller]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    /// Read a little-endian i64.
    #[track_caller]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    /// Read a little-endian IEEE-754 single.
    #[track_caller]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    /// Read a little-endian IEEE-754 double.
    #[track_caller]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take()?))
    }

    /// Read raw bytes.
    #[track_caller]
    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        let bytes = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(bytes)
    }

    /// Read `n` bytes as a string.
    /// Uses lossy UTF-8 conversion to handle binary data gracefully.
    #[track_caller]
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        self.ensure(n)?;
        let s = String::from_utf8_lossy(&self.data[self.pos..self.pos + n]).into_owned();
        self.pos += n;
        Ok(s)
    }

    /// Read `n` bytes of ASCII text.
    ///
    /// Numeric and temporal literals are plain ASCII; any other byte is kept
    /// as a replacement character so that the literal fails to parse.
    #[track_caller]
    pub fn read_ascii(&mut self, n: usize) -> Result<String> {
        self.read_string(n)
    }

    /// Read a length-encoded integer.
    ///
    /// See <https://mariadb.com/kb/en/protocol-data-types/#length-encoded-integers>
    #[track_caller]
    pub fn read_lenenc(&mut self) -> Result<u64> {
        match self.read_lenenc_nullable()? {
            Some(v) => Ok(v),
            None => Err(Error::protocol("unexpected NULL length-encoded integer")),
        }
    }

    /// Read a length-encoded integer where `0xFB` stands for NULL.
    #[track_caller]
    pub fn read_lenenc_nullable(&mut self) -> Result<Option<u64>> {
        let v = self.read_u8()?;
        Ok(match v {
            LENENC_NULL => None,
            LENENC_PREFIX_U16 => Some(self.read_u16()?.into()),
            LENENC_PREFIX_U24 => Some(self.read_u24()?.into()),
            LENENC_PREFIX_U64 => Some(self.read_u64()?),
            v => Some(v.into()),
        })
    }

    /// Read a length-encoded byte string.
    #[track_caller]
    pub fn read_lenenc_bytes(&mut self) -> Result<Bytes> {
        let len = self.read_lenenc()?;
        self.read_bytes(len as usize)
    }

    /// Read a length-encoded string.
    #[track_caller]
    pub fn read_lenenc_str(&mut self) -> Result<String> {
        let len = self.read_lenenc()?;
        self.read_string(len as usize)
    }

    /// Skip past a length-encoded string, returning the position it started at.
    #[track_caller]
    pub fn skip_lenenc(&mut self) -> Result<usize> {
        let start = self.pos;
        let len = self.read_lenenc()?;
        self.skip(len as usize)?;
        Ok(start)
    }

    /// Read a length-encoded sub-buffer sharing the same backing bytes.
    #[track_caller]
    pub fn read_length_buffer(&mut self) -> Result<ReadBuffer> {
        let bytes = self.read_lenenc_bytes()?;
        Ok(ReadBuffer::new(bytes))
    }
}

/// A buffer for writing MariaDB protocol data.
pub struct WriteBuffer {
    data: BytesMut,
}

impl WriteBuffer {
    /// Create a new write buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new write buffer with specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Get the current length of the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the buffer contents as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Freeze the buffer into immutable bytes.
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, val: u8) {
        self.data.put_u8(val);
    }

    /// Write a little-endian u16.
    pub fn write_u16(&mut self, val: u16) {
        self.data.put_u16_le(val);
    }

    /// Write a little-endian 3-byte integer.
    pub fn write_u24(&mut self, val: u32) {
        self.data.extend_from_slice(&val.to_le_bytes()[..3]);
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, val: u32) {
        self.data.put_u32_le(val);
    }

    /// Write a little-endian u64.
    pub fn write_u64(&mut self, val: u64) {
        self.data.put_u64_le(val);
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write ASCII text without any prefix.
    pub fn write_ascii(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write a length-encoded integer.
    pub fn write_lenenc(&mut self, val: u64) {
        if val < LENENC_NULL as u64 {
            self.write_u8(val as u8);
        } else if val <= 0xffff {
            self.write_u8(LENENC_PREFIX_U16);
            self.write_u16(val as u16);
        } else if val <= 0xff_ffff {
            self.write_u8(LENENC_PREFIX_U24);
            self.write_u24(val as u32);
        } else {
            self.write_u8(LENENC_PREFIX_U64);
            self.write_u64(val);
        }
    }

    /// Write bytes with a length-encoded prefix.
    pub fn write_lenenc_bytes(&mut self, bytes: &[u8]) {
        self.write_lenenc(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    /// Write a string with a length-encoded prefix.
    pub fn write_lenenc_str(&mut self, s: &str) {
        self.write_lenenc_bytes(s.as_bytes());
    }

    /// Write padding zeros.
    pub fn write_zeros(&mut self, count: usize) {
        self.data.put_bytes(0, count);
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}
