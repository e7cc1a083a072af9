//! Stub synthesis: re-encode a class keeping only its API surface.
//!
//! A stub has the same name, parent structure and visible members as the original class,
//! but every concrete method body is replaced by the shortest instruction sequence that
//! is valid for the method's declared return type. Non-visible fields and methods are
//! dropped entirely, not merely emptied. Class-level metadata (attributes,
//! inner-class relationships, generic signatures) passes through unchanged.
//!
//! The constant pool is copied verbatim so every retained index stays valid; at most one
//! UTF-8 entry (`Code`) is appended when the original pool lacks it. The placeholder
//! bodies are at most two instructions with trivial stack depth, so no stack-map frames
//! need to be computed.

use crate::{
    classfile::{
        io::WriteBytes,
        raw::{RawAttribute, RawClass, RawMember, CLASS_MAGIC},
    },
    Result,
};

/// `return`
const CODE_VOID: &[u8] = &[0xB1];
/// `iconst_0; ireturn`
const CODE_INT: &[u8] = &[0x03, 0xAC];
/// `lconst_0; lreturn`
const CODE_LONG: &[u8] = &[0x09, 0xAD];
/// `fconst_0; freturn`
const CODE_FLOAT: &[u8] = &[0x0B, 0xAE];
/// `dconst_0; dreturn`
const CODE_DOUBLE: &[u8] = &[0x0E, 0xAF];
/// `aconst_null; areturn`
const CODE_REFERENCE: &[u8] = &[0x01, 0xB0];

/// Select the placeholder body for a method descriptor, by its return-type code.
fn placeholder_code(descriptor: &str) -> Result<&'static [u8]> {
    let return_type = descriptor
        .split_once(')')
        .and_then(|(_, ret)| ret.bytes().next())
        .ok_or_else(|| malformed_error!("method descriptor has no return type: {}", descriptor))?;

    match return_type {
        b'V' => Ok(CODE_VOID),
        b'I' | b'S' | b'B' | b'Z' | b'C' => Ok(CODE_INT),
        b'J' => Ok(CODE_LONG),
        b'F' => Ok(CODE_FLOAT),
        b'D' => Ok(CODE_DOUBLE),
        b'L' | b'[' => Ok(CODE_REFERENCE),
        other => Err(malformed_error!(
            "unknown return type code '{}' in descriptor {}",
            other as char,
            descriptor
        )),
    }
}

/// Number of local-variable slots the parameters of `descriptor` occupy.
///
/// `long` and `double` take two slots, everything else one; the receiver slot for
/// instance methods is added by the caller.
fn parameter_slots(descriptor: &str) -> Result<u16> {
    let params = descriptor
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(')'))
        .map(|(params, _)| params)
        .ok_or_else(|| malformed_error!("malformed method descriptor: {}", descriptor))?;

    let bytes = params.as_bytes();
    let mut slots: u16 = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        // an array is a single reference slot whatever its element type
        let mut is_array = false;
        while pos < bytes.len() && bytes[pos] == b'[' {
            is_array = true;
            pos += 1;
        }

        match bytes.get(pos).copied() {
            Some(b'J' | b'D') => {
                slots += if is_array { 1 } else { 2 };
                pos += 1;
            }
            Some(b'I' | b'S' | b'B' | b'Z' | b'C' | b'F') => {
                slots += 1;
                pos += 1;
            }
            Some(b'L') => {
                slots += 1;
                while pos < bytes.len() && bytes[pos] != b';' {
                    pos += 1;
                }
                if pos >= bytes.len() {
                    return Err(malformed_error!(
                        "unterminated class type in descriptor: {}",
                        descriptor
                    ));
                }
                pos += 1;
            }
            Some(other) => {
                return Err(malformed_error!(
                    "unknown parameter type code '{}' in descriptor {}",
                    other as char,
                    descriptor
                ))
            }
            None => {
                return Err(malformed_error!(
                    "dangling array dimensions in descriptor: {}",
                    descriptor
                ))
            }
        }
    }

    Ok(slots)
}

/// Re-encode `bytes` as a stub: visible members only, placeholder bodies.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] if the bytes
/// cannot be decoded as a class file; synthesis never produces partial output.
pub fn synthesize_stub(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut raw = RawClass::parse(bytes)?;

    let retained_fields: Vec<RawMember> = raw
        .fields
        .iter()
        .filter(|field| field.access.is_visible())
        .cloned()
        .collect();
    let retained_methods: Vec<RawMember> = raw
        .methods
        .iter()
        .filter(|method| method.access.is_visible())
        .cloned()
        .collect();

    // The pool must be final before it is written, so the `Code` name is interned first.
    let needs_code = retained_methods.iter().any(|method| method.access.has_body());
    let code_name_index = if needs_code {
        Some(raw.pool.ensure_utf8("Code")?)
    } else {
        None
    };

    let mut out = Vec::with_capacity(bytes.len());
    out.put_u32(CLASS_MAGIC);
    out.put_u16(raw.minor_version);
    out.put_u16(raw.major_version);
    raw.pool.write_to(&mut out, bytes);

    out.put_u16(raw.access.bits());
    out.put_u16(raw.this_class);
    out.put_u16(raw.super_class);
    out.put_u16(raw.interfaces.len() as u16);
    for interface in &raw.interfaces {
        out.put_u16(*interface);
    }

    out.put_u16(retained_fields.len() as u16);
    for field in &retained_fields {
        out.put_u16(field.access.bits());
        out.put_u16(field.name_index);
        out.put_u16(field.descriptor_index);
        write_attributes(&raw, &field.attributes, &mut out);
    }

    out.put_u16(retained_methods.len() as u16);
    for method in &retained_methods {
        out.put_u16(method.access.bits());
        out.put_u16(method.name_index);
        out.put_u16(method.descriptor_index);

        let mut kept: Vec<&RawAttribute> = Vec::with_capacity(method.attributes.len());
        for attribute in &method.attributes {
            if raw.attribute_name(attribute)? != "Code" {
                kept.push(attribute);
            }
        }

        let emit_body = method.access.has_body();
        out.put_u16((kept.len() + usize::from(emit_body)) as u16);
        for attribute in kept {
            write_attribute(&raw, attribute, &mut out);
        }
        if emit_body {
            let descriptor = raw.member_descriptor(method)?;
            let code = placeholder_code(descriptor)?;
            let receiver = u16::from(!method.access.contains(crate::AccessFlags::STATIC));
            let max_locals = parameter_slots(descriptor)? + receiver;

            let name_index = code_name_index
                .ok_or_else(|| malformed_error!("missing Code pool entry for {}", descriptor))?;
            out.put_u16(name_index);
            out.put_u32(12 + code.len() as u32);
            out.put_u16(2); // max_stack: the widest placeholder pushes one category-2 value
            out.put_u16(max_locals);
            out.put_u32(code.len() as u32);
            out.extend_from_slice(code);
            out.put_u16(0); // exception_table_length
            out.put_u16(0); // attributes_count
        }
    }

    write_attributes(&raw, &raw.attributes, &mut out);

    Ok(out)
}

fn write_attributes(raw: &RawClass<'_>, attributes: &[RawAttribute], out: &mut Vec<u8>) {
    out.put_u16(attributes.len() as u16);
    for attribute in attributes {
        write_attribute(raw, attribute, out);
    }
}

fn write_attribute(raw: &RawClass<'_>, attribute: &RawAttribute, out: &mut Vec<u8>) {
    let payload = raw.attribute_bytes(attribute);
    out.put_u16(attribute.name_index);
    out.put_u32(payload.len() as u32);
    out.extend_from_slice(payload);
}
