use byteorder::{ByteOrder, LittleEndian};

use crate::error::SourceQueryError;

/// Sequential reader over a response payload.
///
/// Tracks a zero-based position in the wrapped buffer; every `read_*`
/// advances it by exactly the width it decoded. All multi-byte values on
/// the wire are little-endian. Running off the end of the buffer fails
/// with [`SourceQueryError::MalformedPacket`] instead of handing back
/// partial or zero-filled data.
pub struct PacketCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PacketCursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether any payload bytes are left unread.
    pub fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    fn take(&mut self, width: usize, what: &str) -> Result<&'a [u8], SourceQueryError> {
        let end = self
            .pos
            .checked_add(width)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                SourceQueryError::MalformedPacket(format!(
                    "unexpected end of data while reading {what}"
                ))
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_byte(&mut self) -> Result<u8, SourceQueryError> {
        Ok(self.take(1, "byte")?[0])
    }

    pub fn read_short(&mut self) -> Result<i16, SourceQueryError> {
        Ok(LittleEndian::read_i16(self.take(2, "short")?))
    }

    pub fn read_long(&mut self) -> Result<i32, SourceQueryError> {
        Ok(LittleEndian::read_i32(self.take(4, "long")?))
    }

    pub fn read_long_long(&mut self) -> Result<u64, SourceQueryError> {
        Ok(LittleEndian::read_u64(self.take(8, "long long")?))
    }

    pub fn read_float(&mut self) -> Result<f32, SourceQueryError> {
        Ok(LittleEndian::read_f32(self.take(4, "float")?))
    }

    pub fn read_bool(&mut self) -> Result<bool, SourceQueryError> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_char(&mut self) -> Result<char, SourceQueryError> {
        Ok(char::from(self.read_byte()?))
    }

    /// Reads up to (not including) the next NUL byte, decodes the span as
    /// UTF-8 and leaves the position just past the terminator.
    pub fn read_string(&mut self) -> Result<String, SourceQueryError> {
        let rest = &self.data[self.pos..];
        let len = rest.iter().position(|&b| b == 0).ok_or_else(|| {
            SourceQueryError::MalformedPacket("unterminated string".to_owned())
        })?;
        let value = std::str::from_utf8(&rest[..len])?.to_owned();
        self.pos += len + 1;
        Ok(value)
    }
}
