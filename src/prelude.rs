//! # stubjar Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits from the stubjar library. Import this module to get quick access to the
//! essential types for stub-jar generation.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all stubjar operations
pub use crate::Error;

/// The result type used throughout stubjar
pub use crate::Result;

// ================================================================================================
// Closure Computation
// ================================================================================================

/// Byte lookup abstraction the closure pulls classes from
pub use crate::closure::ClassSource;

/// The round-based sweep collecting every API-reachable class
pub use crate::closure::ClosureEngine;

/// Name prefixes excluded from the sweep (platform classes)
pub use crate::closure::ExclusionPrefixes;

// ================================================================================================
// Class Files and Signatures
// ================================================================================================

/// Class, field and method access flags
pub use crate::classfile::AccessFlags;

/// The resolved API-visible surface of one class
pub use crate::classfile::{ClassModel, FieldModel, MethodModel};

/// Class-name extraction from descriptors and generic signatures
pub use crate::signatures::referenced_types;

// ================================================================================================
// Input and Output
// ================================================================================================

/// Byte lookup across directories and jar archives
pub use crate::classpath::Classpath;

/// Deterministic jar output for a stubbed closure
pub use crate::jar::StubJarWriter;

/// Single-class stub synthesis
pub use crate::stub::synthesize_stub;
