//! Byte source over directories and jar files.
//!
//! A [`Classpath`] is an ordered list of lookup entries; the first entry that resolves
//! `<name>.class` wins. Jar archives are opened once and kept behind a `RefCell`; the
//! sweep is single-threaded, so interior mutability is all the `zip` reader needs.
//!
//! The module also hosts root discovery: enumerating every class inside a directory tree
//! or jar, and expanding `/a/b/*` specs into the jar files of a directory.

use std::{
    cell::RefCell,
    fs,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use zip::{result::ZipError, ZipArchive};

use crate::{closure::ClassSource, Result};

enum Entry {
    Directory(PathBuf),
    Jar {
        path: PathBuf,
        archive: RefCell<ZipArchive<BufReader<fs::File>>>,
    },
}

/// Ordered lookup path for class-file bytes, over directories and jars.
///
/// # Example
///
/// ```rust,no_run
/// use stubjar::Classpath;
///
/// let mut classpath = Classpath::new();
/// for path in Classpath::expand_entry("lib/*")? {
///     classpath.push(&path)?;
/// }
/// classpath.push("build/classes".as_ref())?;
/// # Ok::<(), stubjar::Error>(())
/// ```
#[derive(Default)]
pub struct Classpath {
    entries: Vec<Entry>,
}

impl Classpath {
    /// An empty classpath; resolves nothing until entries are pushed.
    #[must_use]
    pub fn new() -> Self {
        Classpath::default()
    }

    /// Append one entry: a class directory or a jar file.
    ///
    /// # Errors
    /// Returns an error if the path does not exist or a jar cannot be opened.
    pub fn push(&mut self, path: &Path) -> Result<()> {
        if path.is_dir() {
            self.entries.push(Entry::Directory(path.to_path_buf()));
            return Ok(());
        }
        if path.is_file() {
            let file = fs::File::open(path)?;
            let archive = ZipArchive::new(BufReader::new(file))?;
            self.entries.push(Entry::Jar {
                path: path.to_path_buf(),
                archive: RefCell::new(archive),
            });
            return Ok(());
        }
        Err(crate::Error::Error(format!(
            "classpath entry not found: {}",
            path.display()
        )))
    }

    /// Expand a classpath/root spec into concrete paths.
    ///
    /// A spec ending in `*` denotes every `*.jar` file directly inside the named
    /// directory, sorted for deterministic ordering; anything else is taken literally.
    ///
    /// # Errors
    /// Returns an error if a `*` spec names an unreadable directory.
    pub fn expand_entry(spec: &str) -> Result<Vec<PathBuf>> {
        let Some(dir) = spec.strip_suffix('*') else {
            return Ok(vec![PathBuf::from(spec)]);
        };

        let dir = if dir.is_empty() { "." } else { dir };
        let mut jars = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "jar") {
                jars.push(path);
            }
        }
        jars.sort();
        Ok(jars)
    }

    /// Enumerate the internal names of all classes inside a directory tree or jar.
    ///
    /// # Errors
    /// Returns an error if the path is neither a directory nor a readable jar.
    pub fn class_names(path: &Path) -> Result<Vec<String>> {
        if path.is_dir() {
            let mut names = Vec::new();
            scan_directory(path, String::new(), &mut names)?;
            names.sort();
            return Ok(names);
        }
        if path.is_file() {
            let file = fs::File::open(path)?;
            let archive = ZipArchive::new(BufReader::new(file))?;
            let mut names: Vec<String> = archive
                .file_names()
                .filter_map(|entry| entry.strip_suffix(".class"))
                .map(str::to_string)
                .collect();
            names.sort();
            return Ok(names);
        }
        Err(crate::Error::Error(format!(
            "root entry not found: {}",
            path.display()
        )))
    }
}

fn scan_directory(dir: &Path, prefix: String, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue; // non-UTF-8 file names cannot be class names
        };

        if path.is_dir() {
            scan_directory(&path, format!("{prefix}{file_name}/"), names)?;
        } else if let Some(class_name) = file_name.strip_suffix(".class") {
            names.push(format!("{prefix}{class_name}"));
        }
    }
    Ok(())
}

impl ClassSource for Classpath {
    fn bytes_for(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let file_name = format!("{name}.class");

        for entry in &self.entries {
            match entry {
                Entry::Directory(dir) => {
                    let candidate = dir.join(&file_name);
                    if candidate.is_file() {
                        return Ok(Some(fs::read(candidate)?));
                    }
                }
                Entry::Jar { path, archive } => {
                    let mut archive = archive.borrow_mut();
                    let found = archive.by_name(&file_name);
                    match found {
                        Ok(mut zipped) => {
                            let mut bytes = Vec::with_capacity(zipped.size() as usize);
                            zipped.read_to_end(&mut bytes)?;
                            return Ok(Some(bytes));
                        }
                        Err(ZipError::FileNotFound) => {}
                        Err(error) => {
                            log::error!("failed reading {file_name} from {}", path.display());
                            return Err(error.into());
                        }
                    }
                }
            }
        }

        Ok(None)
    }
}
