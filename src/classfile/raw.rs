//! Lossless structural decode of one class file.
//!
//! [`RawClass`] keeps everything as indices and byte spans into the original input:
//! members reference their name/descriptor pool slots, attributes keep their payload as
//! an opaque span. This single representation serves both consumers in the crate: the
//! class-model extractor resolves the handful of strings it needs, and the stub
//! synthesizer re-emits retained pieces verbatim without understanding them.

use std::ops::Range;

use crate::{
    classfile::{flags::AccessFlags, io::ClassReader, pool::ConstantPool},
    Result,
};

/// Magic number at offset 0 of every class file.
pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// One attribute, held as a pool name link plus an undecoded payload span.
#[derive(Debug, Clone)]
pub struct RawAttribute {
    /// Pool index of the attribute name's UTF-8 entry.
    pub name_index: u16,
    /// Span of the attribute payload within the source bytes (length prefix excluded).
    pub payload: Range<usize>,
}

/// One field or method as stored in the class file.
#[derive(Debug, Clone)]
pub struct RawMember {
    /// The member's access flags.
    pub access: AccessFlags,
    /// Pool index of the member name.
    pub name_index: u16,
    /// Pool index of the member descriptor.
    pub descriptor_index: u16,
    /// The member's attributes, in declaration order.
    pub attributes: Vec<RawAttribute>,
}

/// Structural view of a whole class file, borrowed from its bytes.
pub struct RawClass<'a> {
    bytes: &'a [u8],
    /// Class-file minor version.
    pub minor_version: u16,
    /// Class-file major version.
    pub major_version: u16,
    /// The constant pool, decodable and re-emittable.
    pub pool: ConstantPool,
    /// Class-level access flags.
    pub access: AccessFlags,
    /// Pool index of this class's `Class` entry.
    pub this_class: u16,
    /// Pool index of the superclass entry; 0 only for `java/lang/Object`.
    pub super_class: u16,
    /// Pool indices of the implemented interfaces, in declaration order.
    pub interfaces: Vec<u16>,
    /// All fields, unfiltered.
    pub fields: Vec<RawMember>,
    /// All methods, unfiltered.
    pub methods: Vec<RawMember>,
    /// Class-level attributes.
    pub attributes: Vec<RawAttribute>,
}

impl<'a> RawClass<'a> {
    /// Decode the structure of a class file.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for empty input, [`crate::Error::Malformed`] if the
    /// magic number or constant pool is invalid, and [`crate::Error::OutOfBounds`] for
    /// truncated input.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(crate::Error::Empty);
        }

        let mut reader = ClassReader::new(bytes);

        let magic = reader.read_u32()?;
        if magic != CLASS_MAGIC {
            return Err(malformed_error!(
                "invalid class file magic 0x{:08X}",
                magic
            ));
        }

        let minor_version = reader.read_u16()?;
        let major_version = reader.read_u16()?;
        let pool = ConstantPool::parse(&mut reader)?;

        let access = AccessFlags::from_bits_retain(reader.read_u16()?);
        let this_class = reader.read_u16()?;
        let super_class = reader.read_u16()?;

        let interface_count = reader.read_u16()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(reader.read_u16()?);
        }

        let fields = Self::parse_members(&mut reader)?;
        let methods = Self::parse_members(&mut reader)?;
        let attributes = Self::parse_attributes(&mut reader)?;

        Ok(RawClass {
            bytes,
            minor_version,
            major_version,
            pool,
            access,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_members(reader: &mut ClassReader<'_>) -> Result<Vec<RawMember>> {
        let count = reader.read_u16()?;
        let mut members = Vec::with_capacity(count as usize);
        for _ in 0..count {
            members.push(RawMember {
                access: AccessFlags::from_bits_retain(reader.read_u16()?),
                name_index: reader.read_u16()?,
                descriptor_index: reader.read_u16()?,
                attributes: Self::parse_attributes(reader)?,
            });
        }
        Ok(members)
    }

    fn parse_attributes(reader: &mut ClassReader<'_>) -> Result<Vec<RawAttribute>> {
        let count = reader.read_u16()?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name_index = reader.read_u16()?;
            let length = reader.read_u32()? as usize;
            let start = reader.pos();
            reader.skip(length)?;
            attributes.push(RawAttribute {
                name_index,
                payload: start..reader.pos(),
            });
        }
        Ok(attributes)
    }

    /// This class's internal name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the `this_class` link is dangling.
    pub fn name(&self) -> Result<&str> {
        self.pool.class_name(self.this_class)
    }

    /// The raw payload bytes of an attribute.
    #[must_use]
    pub fn attribute_bytes(&self, attribute: &RawAttribute) -> &'a [u8] {
        &self.bytes[attribute.payload.clone()]
    }

    /// The name of an attribute, resolved through the pool.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the attribute's name link is dangling.
    pub fn attribute_name(&self, attribute: &RawAttribute) -> Result<&str> {
        self.pool.utf8(attribute.name_index)
    }

    /// Resolve a `Signature` attribute among `attributes`, if present.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a dangling or truncated attribute.
    pub fn signature_attribute(&self, attributes: &[RawAttribute]) -> Result<Option<String>> {
        for attribute in attributes {
            if self.attribute_name(attribute)? == "Signature" {
                let mut reader = ClassReader::new(self.attribute_bytes(attribute));
                let index = reader.read_u16()?;
                return Ok(Some(self.pool.utf8(index)?.to_string()));
            }
        }
        Ok(None)
    }

    /// Resolve an `Exceptions` attribute among `attributes` to declared exception names.
    ///
    /// Returns an empty vector when the attribute is absent.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for a dangling or truncated attribute.
    pub fn exceptions_attribute(&self, attributes: &[RawAttribute]) -> Result<Vec<String>> {
        for attribute in attributes {
            if self.attribute_name(attribute)? == "Exceptions" {
                let mut reader = ClassReader::new(self.attribute_bytes(attribute));
                let count = reader.read_u16()?;
                let mut exceptions = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let index = reader.read_u16()?;
                    exceptions.push(self.pool.class_name(index)?.to_string());
                }
                return Ok(exceptions);
            }
        }
        Ok(Vec::new())
    }

    /// Resolve a member's name through the pool.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the name link is dangling.
    pub fn member_name(&self, member: &RawMember) -> Result<&str> {
        self.pool.utf8(member.name_index)
    }

    /// Resolve a member's descriptor through the pool.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the descriptor link is dangling.
    pub fn member_descriptor(&self, member: &RawMember) -> Result<&str> {
        self.pool.utf8(member.descriptor_index)
    }
}
