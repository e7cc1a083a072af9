// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # stubjar
//!
//! A library and CLI for generating JVM *stub jars*: archives containing only the
//! API-visible skeleton of a set of classes, sufficient to compile against but with
//! every method body replaced by a minimal placeholder.
//!
//! Given one or more root classes and a classpath, `stubjar` computes the transitive
//! closure of classes reachable through public and protected declarations (field and
//! method descriptors, generic signatures, superclasses, interfaces and declared
//! exceptions), then re-encodes each class in the closure with private and
//! package-private members removed and method bodies swapped for a single
//! constant-plus-return sequence.
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust,no_run
//! use stubjar::prelude::*;
//!
//! let mut classpath = Classpath::new();
//! classpath.push("lib/api.jar".as_ref())?;
//!
//! let mut engine = ClosureEngine::new(classpath, ExclusionPrefixes::default());
//! engine.fill(["com/example/Service".to_string()])?;
//!
//! let writer = StubJarWriter::new(engine.source());
//! writer.write(engine.type_names(), "api-stubs.jar".as_ref())?;
//! # Ok::<(), stubjar::Error>(())
//! ```
//!
//! ### Stubbing a Single Class
//!
//! ```rust,no_run
//! use stubjar::synthesize_stub;
//!
//! let bytes = std::fs::read("target/classes/com/example/Service.class")?;
//! let stub = synthesize_stub(&bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized in layers:
//!
//! - [`classfile`] - Class-file decoding: constant pool, access flags, raw member
//!   structures, and the [`ClassModel`] view of the API-visible surface
//! - [`signatures`] - Grammar-level extraction of class names from descriptors and
//!   generic signatures
//! - [`closure`] - The round-based fixed-point sweep collecting every class the API
//!   surface reaches
//! - [`stub`] - Re-encoding a class with invisible members dropped and placeholder
//!   method bodies
//! - [`classpath`] - Byte lookup across directories and jars, including `*` wildcard
//!   expansion
//! - [`jar`] - Writing the stubbed closure out as a deterministic jar
//!
//! All parsing is bounds-checked and allocation-light: the constant pool is carried
//! as a raw byte span so stub synthesis can re-emit it verbatim without re-encoding
//! individual entries.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use stubjar::prelude::*;
///
/// let mut classpath = Classpath::new();
/// classpath.push("lib".as_ref())?;
/// # Ok::<(), stubjar::Error>(())
/// ```
pub mod prelude;

/// Class-file decoding: magic, constant pool, flags, members and attributes
///
/// The types in this module read the binary class-file format directly. [`RawClass`]
/// keeps the structural view (indices and byte ranges), while [`ClassModel`] resolves
/// it into the named API-visible surface the closure operates on.
pub mod classfile;

/// Descriptor and generic-signature parsing
///
/// Extracts every class name referenced by a field descriptor, method descriptor or
/// generic signature, including type arguments, bounds, wildcards and nested types.
pub mod signatures;

/// Round-based closure over API-visible class references
pub mod closure;

/// Stub synthesis: re-encode a class with only its visible surface
pub mod stub;

/// Classpath lookup across directories and jar archives
pub mod classpath;

/// Jar output for the stubbed closure
pub mod jar;

/// The main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

pub use classfile::{AccessFlags, ClassModel, ClassReader, FieldModel, MethodModel, RawClass};
pub use classpath::Classpath;
pub use closure::{ClassSource, ClosureEngine, ExclusionPrefixes};
pub use jar::StubJarWriter;
pub use signatures::referenced_types;
pub use stub::synthesize_stub;
