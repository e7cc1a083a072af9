//! Low-level byte cursor for class-file decoding.
//!
//! [`ClassReader`] is a bounds-checked, big-endian cursor over a class-file byte slice.
//! All multi-byte quantities in the class-file format are big-endian, and the format is
//! strictly sequential, so the cursor only ever moves forward. Every read validates data
//! availability before touching the buffer; a truncated file surfaces as
//! [`crate::Error::OutOfBounds`] instead of a panic.
//!
//! The module also provides [`WriteBytes`], the matching big-endian emission helpers used
//! by the stub re-encoder to build new class files into a `Vec<u8>`.

use crate::Result;

/// A bounds-checked big-endian cursor over class-file bytes.
///
/// # Examples
///
/// ```rust
/// use stubjar::classfile::ClassReader;
///
/// let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00];
/// let mut reader = ClassReader::new(&data);
/// assert_eq!(reader.read_u32()?, 0xCAFE_BABE);
/// assert_eq!(reader.read_u16()?, 0);
/// # Ok::<(), stubjar::Error>(())
/// ```
pub struct ClassReader<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> ClassReader<'a> {
    /// Create a new [`ClassReader`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ClassReader { data, position: 0 }
    }

    /// Current offset into the underlying buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns `true` if the cursor has reached the end of the buffer.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read one unsigned byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if no byte is available.
    pub fn read_u8(&mut self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(value) => {
                self.position += 1;
                Ok(*value)
            }
            None => Err(crate::Error::OutOfBounds),
        }
    }

    /// Read a big-endian `u16`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than two bytes remain.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian `u32`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than four bytes remain.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `len` raw bytes, advancing the cursor past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(crate::Error::OutOfBounds)?;
        if end > self.data.len() {
            return Err(crate::Error::OutOfBounds);
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Advance the cursor by `len` bytes without inspecting them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len)?;
        Ok(())
    }
}

/// Big-endian emission helpers for building class-file bytes.
pub trait WriteBytes {
    /// Append a big-endian `u16`.
    fn put_u16(&mut self, value: u16);
    /// Append a big-endian `u32`.
    fn put_u32(&mut self, value: u32);
}

impl WriteBytes for Vec<u8> {
    fn put_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_be_bytes());
    }
}
