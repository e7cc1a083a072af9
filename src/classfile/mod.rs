//! Class-file decoding: byte cursor, constant pool, access flags, structural view and
//! the normalized [`ClassModel`] the dependency sweep consumes.
//!
//! Decoding is split in two layers. [`RawClass`] is lossless and index/span based, so the
//! stub synthesizer can re-emit anything it does not understand verbatim. [`ClassModel`]
//! is the lossy, name-resolved view for dependency analysis: visible members only, with
//! `Signature` and `Exceptions` attributes resolved to strings.

pub mod flags;
pub mod io;
pub mod model;
pub mod pool;
pub mod raw;

pub use flags::AccessFlags;
pub use io::ClassReader;
pub use model::{ClassModel, FieldModel, MethodModel};
pub use pool::ConstantPool;
pub use raw::{RawAttribute, RawClass, RawMember, CLASS_MAGIC};
