//! Constant-pool decoding with verbatim re-emission support.
//!
//! The stubber never rewrites constant-pool entries it did not create: the original pool
//! is kept as a raw byte span and copied straight into synthesized output, so every index
//! stored in retained members and pass-through attributes stays valid. Decoding only
//! extracts what the rest of the crate needs (UTF-8 strings and `Class` name links)
//! and records slot boundaries so the pool can be skipped and re-emitted losslessly.
//!
//! New entries (currently only the `Code` attribute name during stub synthesis) are
//! appended after the original entries, never inserted.

use std::ops::Range;

use crate::{classfile::io::ClassReader, Result};

/// One decoded constant-pool slot.
///
/// Entries the stubber does not interpret are kept as [`PoolEntry::Other`]; their bytes
/// still round-trip via the raw span held by [`ConstantPool`].
#[derive(Debug, Clone)]
pub enum PoolEntry {
    /// A `CONSTANT_Utf8` entry, kept as its wire-format payload.
    ///
    /// Class files store strings in modified UTF-8 (`0xC0 0x80` for NUL, CESU-8 surrogate
    /// pairs for supplementary characters), so the payload is only decoded when a caller
    /// actually asks for it. The names and descriptors the stubber reads are ASCII-safe.
    Utf8(Vec<u8>),
    /// A `CONSTANT_Class` entry pointing at the UTF-8 slot holding the internal name.
    Class {
        /// Pool index of the class name's UTF-8 entry.
        name_index: u16,
    },
    /// Any entry kind the stubber has no need to interpret.
    Other,
    /// Slot 0, and the phantom second slot occupied by `long`/`double` entries.
    Unusable,
}

/// Decoded view of a class file's constant pool.
pub struct ConstantPool {
    /// One element per pool slot; slot 0 is the [`PoolEntry::Unusable`] sentinel.
    entries: Vec<PoolEntry>,
    /// Span of the original entry bytes within the source class file (count field excluded).
    raw: Range<usize>,
    /// Entries appended during re-encoding, already in wire format.
    appended: Vec<Vec<u8>>,
}

impl ConstantPool {
    /// Decode the constant pool at the reader's current position.
    ///
    /// The reader must be positioned right after the major-version field. On return it
    /// sits on the `access_flags` field that follows the pool.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for unknown entry tags and
    /// [`crate::Error::OutOfBounds`] for a truncated pool.
    pub fn parse(reader: &mut ClassReader<'_>) -> Result<Self> {
        let count = reader.read_u16()? as usize;
        let start = reader.pos();

        let mut entries = Vec::with_capacity(count);
        entries.push(PoolEntry::Unusable); // slot 0 is never addressable

        while entries.len() < count {
            let tag = reader.read_u8()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u16()? as usize;
                    let bytes = reader.read_bytes(length)?;
                    PoolEntry::Utf8(bytes.to_vec())
                }
                3 | 4 => {
                    // Integer / Float
                    reader.skip(4)?;
                    PoolEntry::Other
                }
                5 | 6 => {
                    // Long / Double take up two slots
                    reader.skip(8)?;
                    entries.push(PoolEntry::Other);
                    PoolEntry::Unusable
                }
                7 => PoolEntry::Class {
                    name_index: reader.read_u16()?,
                },
                8 | 16 | 19 | 20 => {
                    // String / MethodType / Module / Package
                    reader.skip(2)?;
                    PoolEntry::Other
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    // Fieldref / Methodref / InterfaceMethodref / NameAndType /
                    // Dynamic / InvokeDynamic
                    reader.skip(4)?;
                    PoolEntry::Other
                }
                15 => {
                    // MethodHandle
                    reader.skip(3)?;
                    PoolEntry::Other
                }
                _ => {
                    return Err(malformed_error!(
                        "unknown constant pool tag {} at slot {}",
                        tag,
                        entries.len()
                    ))
                }
            };

            entries.push(entry);
        }

        Ok(ConstantPool {
            entries,
            raw: start..reader.pos(),
            appended: Vec::new(),
        })
    }

    /// Number of pool slots, including the unusable slot 0.
    ///
    /// This is the value the `constant_pool_count` field holds on re-encode.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a UTF-8 entry.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index is out of range, does not denote
    /// a UTF-8 entry, or the payload is not plain UTF-8. Modified-UTF-8 payloads that
    /// the stubber never resolves (string constants, say) do not fail parsing.
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.entries.get(index as usize) {
            Some(PoolEntry::Utf8(bytes)) => std::str::from_utf8(bytes).map_err(|_| {
                malformed_error!("constant pool index {} is not plain UTF-8", index)
            }),
            _ => Err(malformed_error!(
                "constant pool index {} is not a UTF-8 entry",
                index
            )),
        }
    }

    /// Resolve a `Class` entry to the internal name it references.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the index does not denote a `Class` entry
    /// or its name link is dangling.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.entries.get(index as usize) {
            Some(PoolEntry::Class { name_index }) => self.utf8(*name_index),
            _ => Err(malformed_error!(
                "constant pool index {} is not a Class entry",
                index
            )),
        }
    }

    /// Return the index of a UTF-8 entry equal to `value`, appending one if absent.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the pool has no free slots left.
    pub fn ensure_utf8(&mut self, value: &str) -> Result<u16> {
        for (index, entry) in self.entries.iter().enumerate() {
            if let PoolEntry::Utf8(existing) = entry {
                if existing == value.as_bytes() {
                    return Ok(index as u16);
                }
            }
        }

        if self.entries.len() >= u16::MAX as usize {
            return Err(malformed_error!(
                "constant pool overflow while appending \"{}\"",
                value
            ));
        }

        let mut encoded = Vec::with_capacity(3 + value.len());
        encoded.push(1); // CONSTANT_Utf8
        encoded.extend_from_slice(&(value.len() as u16).to_be_bytes());
        encoded.extend_from_slice(value.as_bytes());
        self.appended.push(encoded);
        self.entries.push(PoolEntry::Utf8(value.as_bytes().to_vec()));

        Ok((self.entries.len() - 1) as u16)
    }

    /// Re-emit the pool: count field, original bytes verbatim, then appended entries.
    ///
    /// `source` must be the same byte slice the pool was parsed from.
    pub fn write_to(&self, out: &mut Vec<u8>, source: &[u8]) {
        out.extend_from_slice(&(self.entries.len() as u16).to_be_bytes());
        out.extend_from_slice(&source[self.raw.clone()]);
        for entry in &self.appended {
            out.extend_from_slice(entry);
        }
    }
}
