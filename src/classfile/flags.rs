//! Access-flag bitsets for classes, fields and methods.

use bitflags::bitflags;

bitflags! {
    /// Class/member access flags as stored in the class-file format.
    ///
    /// The same 16-bit field is used for classes, fields and methods; a handful of bits
    /// are overloaded between the three (e.g. `0x0020` is `ACC_SUPER` on a class and
    /// `ACC_SYNCHRONIZED` on a method). Only the bits this crate actually inspects are
    /// named; everything else is carried through untouched via `from_bits_retain`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessFlags: u16 {
        /// Declared `public`; visible outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`.
        const PRIVATE = 0x0002;
        /// Declared `protected`.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`.
        const FINAL = 0x0010;
        /// Declared `native`; the method has no `Code` attribute.
        const NATIVE = 0x0100;
        /// The class is an interface.
        const INTERFACE = 0x0200;
        /// Declared `abstract`; a method carrying it has no `Code` attribute.
        const ABSTRACT = 0x0400;
    }
}

impl AccessFlags {
    /// Whether a class or member with these flags is part of the API surface.
    ///
    /// API-visible means `public` or `protected`; package-private and `private`
    /// declarations are invisible to external callers and are dropped from stubs.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.intersects(Self::PUBLIC | Self::PROTECTED)
    }

    /// Whether a method with these flags carries a `Code` attribute.
    ///
    /// Abstract and native methods have no body, so stub synthesis must not emit a
    /// placeholder body for them either.
    #[must_use]
    pub fn has_body(self) -> bool {
        !self.intersects(Self::ABSTRACT | Self::NATIVE)
    }
}
