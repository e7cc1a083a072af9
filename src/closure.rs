//! Round-based dependency closure over the API surface.
//!
//! Starting from a set of root class names, [`ClosureEngine`] repeatedly loads candidate
//! classes from a [`ClassSource`], extracts their [`ClassModel`], and scans every visible
//! member signature for further class names, until a round discovers nothing new. The
//! stabilized key set is the exact set of classes to stub.
//!
//! Two deliberately asymmetric visibility rules apply. Roots must themselves be
//! public/protected to count as API surface at all; a non-visible root is skipped
//! entirely. Classes discovered in later rounds are retained regardless of their own
//! visibility (a package-private class appearing in a public signature must still exist
//! for callers to compile against), with only their visible members scanned.
//!
//! Unresolvable candidates are warned about and dropped: the closure stays syntactically
//! self-consistent but may be semantically incomplete, which is accepted. Malformed
//! signatures and I/O failures abort the sweep.

use std::collections::{HashMap, HashSet};

use crate::{classfile::ClassModel, Result};

/// A synchronous source of class-file bytes keyed by internal class name.
///
/// `Ok(None)` means "not found" and is never an error; implementations return `Err` only
/// for genuine I/O failures. Lookups happen once per candidate class per sweep.
pub trait ClassSource {
    /// Fetch the class-file bytes for `name`, or `None` if no entry resolves it.
    ///
    /// # Errors
    /// Returns an error only for I/O failures, not for unresolvable names.
    fn bytes_for(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// In-memory byte source, used by tests and available to embedders.
impl ClassSource for HashMap<String, Vec<u8>> {
    fn bytes_for(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(name).cloned())
    }
}

/// Ordered set of class-name prefixes excluded from stubbing.
///
/// An excluded class is presumed available wherever the stub jar is consumed, so it is
/// neither stubbed nor scanned for further dependencies. Prefixes use internal naming
/// (slashes and dollars, not dots). [`ExclusionPrefixes::default`] seeds the platform's
/// own namespace, `java/`.
#[derive(Debug, Clone)]
pub struct ExclusionPrefixes {
    prefixes: Vec<String>,
}

impl Default for ExclusionPrefixes {
    fn default() -> Self {
        ExclusionPrefixes {
            prefixes: vec!["java/".to_string()],
        }
    }
}

impl ExclusionPrefixes {
    /// An exclusion set with no entries, not even the default `java/`.
    #[must_use]
    pub fn empty() -> Self {
        ExclusionPrefixes {
            prefixes: Vec::new(),
        }
    }

    /// Add one exclusion prefix.
    ///
    /// Matching is a plain string-prefix test, not path-segment aware: `com/foo` also
    /// matches `com/foobar/Baz`. This coarseness is deliberate and kept as-is; end a
    /// prefix with `/` to exclude exactly one package tree.
    pub fn add(&mut self, prefix: impl Into<String>) {
        self.prefixes.push(prefix.into());
    }

    /// Whether `name` matches any exclusion prefix.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| name.starts_with(prefix))
    }
}

/// Computes the fixed-point set of classes reachable from a root set through
/// public/protected signatures.
///
/// The engine owns its working map for the duration of a run; the map only ever grows
/// and existing entries are never replaced. Re-running [`ClosureEngine::fill`] over the
/// stabilized keys adds nothing. All configuration (the byte source and the exclusion
/// set) is passed at construction; there are no ambient defaults.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use stubjar::{ClosureEngine, ExclusionPrefixes};
///
/// let source: HashMap<String, Vec<u8>> = HashMap::new();
/// let mut engine = ClosureEngine::new(source, ExclusionPrefixes::default());
/// engine.fill(["com/example/Missing".to_string()])?;
/// // Unresolvable roots are warned about and dropped, not errors.
/// assert_eq!(engine.type_names().count(), 0);
/// # Ok::<(), stubjar::Error>(())
/// ```
pub struct ClosureEngine<S> {
    source: S,
    exclusions: ExclusionPrefixes,
    classes: HashMap<String, ClassModel>,
}

impl<S: ClassSource> ClosureEngine<S> {
    /// Create an engine over `source` honoring `exclusions`.
    pub fn new(source: S, exclusions: ExclusionPrefixes) -> Self {
        ClosureEngine {
            source,
            exclusions,
            classes: HashMap::new(),
        }
    }

    /// Sweep from `roots` until the closure stabilizes.
    ///
    /// Round 0 skips roots that are not themselves API-visible; every later round
    /// retains discovered classes regardless of their own visibility. May be called
    /// again with more roots; the accumulated closure only grows.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for undecodable classes or signatures and
    /// [`crate::Error::FileError`] for source I/O failures. Unresolvable names are
    /// logged and dropped instead.
    pub fn fill<I>(&mut self, roots: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut round_result = self.round(roots, true)?;

        loop {
            round_result.retain(|name, _| !self.classes.contains_key(name));

            let mut discovered = HashSet::new();
            for model in round_result.values() {
                model.collect_referenced_types(&mut discovered)?;
            }
            self.classes.extend(round_result);

            discovered.retain(|name| !self.classes.contains_key(name));
            if discovered.is_empty() {
                return Ok(());
            }

            round_result = self.round(discovered, false)?;
        }
    }

    /// Process one round of candidates into extracted models.
    fn round<I>(&self, candidates: I, skip_invisible: bool) -> Result<HashMap<String, ClassModel>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut result = HashMap::new();

        for candidate in candidates {
            // Exclusions are checked before any byte loading is attempted.
            if self.exclusions.matches(&candidate) {
                continue;
            }

            let Some(bytes) = self.source.bytes_for(&candidate)? else {
                log::warn!(
                    "cannot find class {candidate}; it will not be stubbed and it will not be scanned for further dependencies"
                );
                continue;
            };

            if let Some(model) = ClassModel::extract(&bytes, skip_invisible)? {
                result.insert(candidate, model);
            }
        }

        Ok(result)
    }

    /// The stabilized set of class names after [`ClosureEngine::fill`].
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// The retained class models, keyed by class name.
    #[must_use]
    pub fn classes(&self) -> &HashMap<String, ClassModel> {
        &self.classes
    }

    /// The byte source this engine was constructed with.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }
}
