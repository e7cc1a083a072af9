//! Jar assembly for synthesized stubs.
//!
//! Lays out the closure's stub outputs into a jar with explicit directory entries for
//! every package prefix. Entries are written in sorted order so the same closure always
//! produces the same archive layout.

use std::{
    collections::BTreeSet,
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use zip::{write::SimpleFileOptions, ZipWriter};

use crate::{closure::ClassSource, stub::synthesize_stub, Result};

/// Writes a jar containing stubs for a set of classes.
///
/// Only public/protected members survive in the written classes; bodies are placeholder
/// sequences. Classes whose bytes can no longer be resolved are skipped with a warning,
/// mirroring how the sweep treats them.
pub struct StubJarWriter<'a, S> {
    source: &'a S,
}

impl<'a, S: ClassSource> StubJarWriter<'a, S> {
    /// Create a writer that fetches original bytes from `source`.
    pub fn new(source: &'a S) -> Self {
        StubJarWriter { source }
    }

    /// Synthesize stubs for `types` and write them to a jar at `path`.
    ///
    /// # Errors
    /// Returns an error for I/O or container failures, and
    /// [`crate::Error::Malformed`] if any class fails to decode during synthesis.
    pub fn write<I, T>(&self, types: I, path: &Path) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let names: BTreeSet<String> = types
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();

        let file = fs::File::create(path)?;
        let mut jar = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default();

        // One directory entry per package prefix; BTreeSet keeps parents before children.
        let mut directories = BTreeSet::new();
        for name in &names {
            for (index, _) in name.match_indices('/') {
                directories.insert(&name[..index]);
            }
        }
        for directory in directories {
            jar.add_directory(directory, options)?;
        }

        for name in &names {
            let Some(bytes) = self.source.bytes_for(name)? else {
                log::warn!("class {name} disappeared from the classpath; not written to the jar");
                continue;
            };
            let stub = synthesize_stub(&bytes)?;
            jar.start_file(format!("{name}.class"), options)?;
            jar.write_all(&stub)?;
        }

        jar.finish()?;
        Ok(())
    }
}
