//! Filesystem access for condition scanning
//!
//! Catalog building and media listing only need three capabilities: list the
//! subdirectories of a folder, list the files of a folder, and read a small
//! text file. [`DirLister`] captures exactly that so parsing and facet
//! derivation can run against [`MemoryLister`] in tests and [`OsLister`] in
//! production.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::Result;

/// A regular file inside a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name without any directory component
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Lowercased extension without the leading dot, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Directory listing capability
///
/// Listing order is unspecified; callers sort.
pub trait DirLister: Send + Sync {
    /// Names of the immediate subdirectories of `dir`
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when `dir` does not exist.
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Regular files directly inside `dir`
    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>>;

    /// Read a UTF-8 text file, `Ok(None)` when it does not exist
    fn read_to_string(&self, path: &Path) -> io::Result<Option<String>>;

    /// Whether `path` names an existing directory
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`DirLister`] backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLister;

impl OsLister {
    /// Immediate children of `dir` whose (symlink-followed) type passes `keep`
    fn entries(
        dir: &Path,
        keep: impl Fn(&std::fs::FileType) -> bool,
    ) -> io::Result<Vec<(String, DirEntry)>> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true); // Match what a user sees in a file browser

        let mut out = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself is unreadable or missing
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !keep(&entry.file_type()) {
                continue;
            }
            let name = match entry.file_name().to_str() {
                Some(name) => name.to_string(),
                None => {
                    warn!("Skipping non UTF-8 entry {:?} in {}", entry.file_name(), dir.display());
                    continue;
                }
            };
            out.push((name, entry));
        }
        Ok(out)
    }
}

impl DirLister for OsLister {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        Ok(Self::entries(dir, |t| t.is_dir())?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        Self::entries(dir, |t| t.is_file())?
            .into_iter()
            .map(|(name, entry)| {
                let size = entry.metadata().map_err(io::Error::from)?.len();
                Ok::<_, io::Error>(FileEntry { name, size })
            })
            .collect()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory [`DirLister`] for tests and dry runs
///
/// Registering a file implicitly registers every ancestor directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLister {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an (possibly empty) directory
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.register_ancestors(&path);
        self
    }

    /// Register a file with the given contents
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.register_ancestors(parent);
        }
        self.files.insert(path, contents.into());
        self
    }

    fn register_ancestors(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn require_dir(&self, dir: &Path) -> io::Result<()> {
        if self.dirs.contains(dir) {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", dir.display()),
            ))
        }
    }
}

impl DirLister for MemoryLister {
    fn list_dirs(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.require_dir(dir)?;
        Ok(self
            .dirs
            .iter()
            .filter(|d| d.parent() == Some(dir))
            .filter_map(|d| d.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<FileEntry>> {
        self.require_dir(dir)?;
        Ok(self
            .files
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .filter_map(|(path, contents)| {
                path.file_name().map(|name| FileEntry {
                    name: name.to_string_lossy().into_owned(),
                    size: contents.len() as u64,
                })
            })
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<Option<String>> {
        match self.files.get(path) {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.clone())
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }
}

/// Write `value` as pretty-printed JSON, replacing `path` atomically
///
/// The payload goes to a temporary file in the target directory, is synced,
/// then renamed over `path`. A failure at any step leaves an existing file at
/// `path` untouched. Missing parent directories are created.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let payload = serde_json::to_vec_pretty(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&payload)?;
    // Temp files are created 0600; keep the target readable as before
    if let Some(permissions) = target_permissions(path)? {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", payload.len(), path.display());
    Ok(())
}

/// Permissions the replacement file should carry
///
/// An existing target keeps its mode. A new file gets 0644 on unix.
fn target_permissions(path: &Path) -> io::Result<Option<std::fs::Permissions>> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}
