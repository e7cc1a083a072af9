//! Descriptor and generic-signature parsing.
//!
//! The class-file format encodes types twice: erased descriptors (`(I)Ljava/lang/String;`)
//! and, when generics are involved, richer signature strings
//! (`<T:Ljava/lang/Object;>(TT;)Ljava/util/List<TT;>;`). Both share one textual grammar,
//! and this module's single job is to pull every referenced class name out of such a
//! string (erased, with nesting flattened to `$`) so the dependency sweep can chase
//! them. Primitives, wildcards and type-variable references contribute nothing.
//!
//! # Example
//!
//! ```rust
//! use stubjar::signatures::referenced_types;
//!
//! let types = referenced_types("(I)Ljava/lang/String;")?;
//! assert_eq!(types.len(), 1);
//! assert!(types.contains("java/lang/String"));
//! # Ok::<(), stubjar::Error>(())
//! ```

mod parser;

pub use parser::{collect_referenced_types, referenced_types};
