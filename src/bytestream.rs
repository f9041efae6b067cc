//! A simple slice backed bytestream reader.
//!
//! Chunk parsing needs a reader that can fetch big endian
//! integers, peek ahead for CRC validation and hand out
//! sub-slices for IDAT accumulation, this provides exactly that
//! on top of a borrowed byte slice.

use crate::error::ImageErrors;

/// Render a four byte chunk tag for display and log messages.
///
/// Lossy, bytes outside graphic ASCII are replaced, the result is
/// only ever used for matching and messages, never for numeric
/// work.
pub(crate) fn tag_to_text(tag: u32) -> String
{
    tag.to_be_bytes()
        .iter()
        .map(|b| if b.is_ascii_graphic() { *b as char } else { '?' })
        .collect()
}

/// An encapsulation of a bytestream.
///
/// The lifetime parameter is that of the buffer from which we
/// are decoding.
pub struct ByteReader<'a>
{
    stream:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a>
{
    pub const fn new(stream: &'a [u8]) -> ByteReader<'a>
    {
        ByteReader { stream, position: 0 }
    }

    /// Number of bytes between the cursor and the end of the
    /// stream.
    pub const fn remaining(&self) -> usize
    {
        self.stream.len().saturating_sub(self.position)
    }

    pub const fn position(&self) -> usize
    {
        self.position
    }

    /// Return true if `num` more bytes can be read.
    pub const fn has(&self, num: usize) -> bool
    {
        self.remaining() >= num
    }

    pub const fn eof(&self) -> bool
    {
        self.remaining() == 0
    }

    /// Skip `num` bytes ahead of the stream.
    pub fn skip(&mut self, num: usize)
    {
        self.position = self.position.saturating_add(num);
    }

    /// Move the cursor `num` bytes back.
    pub fn rewind(&mut self, num: usize)
    {
        self.position = self.position.saturating_sub(num);
    }

    fn truncated(&self, expected: usize) -> ImageErrors
    {
        ImageErrors::TruncatedInput {
            expected,
            found: self.remaining()
        }
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], ImageErrors>
    {
        let end = self.position.saturating_add(N);

        match self.stream.get(self.position..end)
        {
            Some(bytes) =>
            {
                let mut space = [0; N];
                space.copy_from_slice(bytes);
                self.position = end;
                Ok(space)
            }
            None => Err(self.truncated(N))
        }
    }

    /// Read one byte, returning zero if the stream is exhausted.
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8
    {
        match self.stream.get(self.position)
        {
            Some(byte) =>
            {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }

    /// Read a `u32` stored in big endian order, returning zero if
    /// the stream does not hold four more bytes.
    #[inline(always)]
    pub fn get_u32_be(&mut self) -> u32
    {
        self.read_fixed::<4>().map_or(0, u32::from_be_bytes)
    }

    /// Read a `u32` stored in big endian order.
    pub fn get_u32_be_err(&mut self) -> Result<u32, ImageErrors>
    {
        self.read_fixed::<4>().map(u32::from_be_bytes)
    }

    /// Read a `u64` stored in big endian order.
    pub fn get_u64_be_err(&mut self) -> Result<u64, ImageErrors>
    {
        self.read_fixed::<8>().map(u64::from_be_bytes)
    }

    /// Look `offset` bytes ahead of the cursor and return a
    /// reference to `num_bytes` from that position without moving
    /// the cursor.
    pub fn peek_at(&self, offset: usize, num_bytes: usize) -> Result<&'a [u8], ImageErrors>
    {
        let start = self.position.saturating_add(offset);
        let end = start.saturating_add(num_bytes);

        match self.stream.get(start..end)
        {
            Some(bytes) => Ok(bytes),
            None => Err(self.truncated(offset.saturating_add(num_bytes)))
        }
    }

    /// Return a reference to the next `num_bytes` bytes and
    /// advance the cursor past them.
    pub fn get_as_ref(&mut self, num_bytes: usize) -> Result<&'a [u8], ImageErrors>
    {
        let bytes = self.peek_at(0, num_bytes)?;
        self.position += num_bytes;

        Ok(bytes)
    }
}
