//! Normalized per-class view used by the dependency sweep.
//!
//! [`ClassModel`] is the extractor contract the closure engine consumes: one immutable
//! snapshot per class holding its name, parent names, the API-visible members and any
//! generic signatures. Non-visible members never make it into a model; visibility
//! filtering is enforced here, not in the engine.

use std::collections::HashSet;

use crate::{classfile::raw::RawClass, signatures, Result};

/// An API-visible field of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModel {
    /// Field name.
    pub name: String,
    /// Erased type descriptor, e.g. `Ljava/lang/String;`.
    pub descriptor: String,
    /// Generic signature, present only when the field type uses generics.
    pub signature: Option<String>,
}

/// An API-visible method of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    /// Method name (`<init>` for constructors).
    pub name: String,
    /// Erased parameter/return descriptor, e.g. `(I)Ljava/lang/String;`.
    pub descriptor: String,
    /// Generic signature, present only when the method uses generics.
    pub signature: Option<String>,
    /// Declared exception types, as internal names.
    pub exceptions: Vec<String>,
}

/// Normalized view of one class: name, parents and API-visible members.
///
/// Produced once per class by [`ClassModel::extract`] and immutable afterwards; the
/// closure engine owns the extracted models for the duration of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassModel {
    /// The class's internal name.
    pub name: String,
    /// Superclass first, then implemented interfaces, in declaration order.
    pub parents: Vec<String>,
    /// API-visible fields only.
    pub fields: Vec<FieldModel>,
    /// API-visible methods only.
    pub methods: Vec<MethodModel>,
    /// Class-level generic signature, if any.
    pub signature: Option<String>,
}

impl ClassModel {
    /// Extract a model from class-file bytes.
    ///
    /// When `skip_invisible` is set and the class itself is not public/protected, no
    /// model is produced (`Ok(None)`): such a class is not part of the API surface when
    /// encountered as a root. Later sweep rounds pass `false`: a class reached through
    /// another class's public signature is modeled regardless of its own visibility,
    /// with only its visible members retained.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] if the bytes
    /// cannot be decoded as a class file.
    pub fn extract(bytes: &[u8], skip_invisible: bool) -> Result<Option<ClassModel>> {
        let raw = RawClass::parse(bytes)?;

        if skip_invisible && !raw.access.is_visible() {
            return Ok(None);
        }

        let mut parents = Vec::with_capacity(1 + raw.interfaces.len());
        if raw.super_class != 0 {
            parents.push(raw.pool.class_name(raw.super_class)?.to_string());
        }
        for interface in &raw.interfaces {
            parents.push(raw.pool.class_name(*interface)?.to_string());
        }

        let mut fields = Vec::new();
        for field in &raw.fields {
            if !field.access.is_visible() {
                continue;
            }
            fields.push(FieldModel {
                name: raw.member_name(field)?.to_string(),
                descriptor: raw.member_descriptor(field)?.to_string(),
                signature: raw.signature_attribute(&field.attributes)?,
            });
        }

        let mut methods = Vec::new();
        for method in &raw.methods {
            if !method.access.is_visible() {
                continue;
            }
            methods.push(MethodModel {
                name: raw.member_name(method)?.to_string(),
                descriptor: raw.member_descriptor(method)?.to_string(),
                signature: raw.signature_attribute(&method.attributes)?,
                exceptions: raw.exceptions_attribute(&method.attributes)?,
            });
        }

        Ok(Some(ClassModel {
            name: raw.name()?.to_string(),
            parents,
            fields,
            methods,
            signature: raw.signature_attribute(&raw.attributes)?,
        }))
    }

    /// Collect every class name referenced from this model's visible surface into `out`.
    ///
    /// Covers the parent names (already structured, added as-is), the class signature,
    /// every field's descriptor and signature, and every method's descriptor, signature
    /// and declared exceptions.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if any signature string cannot be parsed.
    pub fn collect_referenced_types(&self, out: &mut HashSet<String>) -> Result<()> {
        out.extend(self.parents.iter().cloned());
        if let Some(signature) = &self.signature {
            signatures::collect_referenced_types(signature, out)?;
        }

        for field in &self.fields {
            signatures::collect_referenced_types(&field.descriptor, out)?;
            if let Some(signature) = &field.signature {
                signatures::collect_referenced_types(signature, out)?;
            }
        }

        for method in &self.methods {
            signatures::collect_referenced_types(&method.descriptor, out)?;
            if let Some(signature) = &method.signature {
                signatures::collect_referenced_types(signature, out)?;
            }
            out.extend(method.exceptions.iter().cloned());
        }

        Ok(())
    }
}
