//! # Corpus
//!
//! A [`Corpus`] is a directory tree of documents rooted at one explicitly
//! configured path. Every path that enters the library is corpus-relative
//! (`/journal/2024.md`) and goes through [`Corpus::resolve`], which refuses
//! anything that would land outside the root, including escapes through
//! symlinks.
//!
//! The walker is the shared primitive under directory trees, hint listings
//! and search. It prunes the trash directory at the corpus root and reports
//! paths relative to the corpus root, even when started from a subdirectory.
//!
//! Nothing here locks: walks observe whatever the filesystem holds at the
//! time, and concurrent writers race (last rename wins).

use crate::config::NotasConfig;
use crate::error::{NotasError, Result};
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;
use walkdir::WalkDir;

const TEMP_PREFIX: &str = ".notas-";

/// One path produced by [`Corpus::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub path: String,
    pub is_dir: bool,
}

impl CorpusEntry {
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    config: NotasConfig,
}

impl Corpus {
    /// Opens (creating if needed) the corpus rooted at `root`.
    pub fn open(root: impl AsRef<Path>, config: NotasConfig) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            fs::create_dir_all(root).map_err(|e| NotasError::io("/", e))?;
        }
        let root = root.canonicalize().map_err(|e| NotasError::io("/", e))?;
        if !root.is_dir() {
            return Err(NotasError::InvalidPath(
                "corpus root is not a directory".to_string(),
            ));
        }
        debug!(root = %root.display(), "opened corpus");
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &NotasConfig {
        &self.config
    }

    /// Maps a corpus-relative path onto the filesystem.
    ///
    /// Leading slashes are ignored, so `""`, `"/"` and `"."` all name the
    /// root. `..` segments are rejected outright, and the deepest existing
    /// ancestor of the result must canonicalize to somewhere inside the root.
    pub fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for component in Path::new(rel.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(NotasError::InvalidPath(format!(
                        "{} escapes the corpus root",
                        rel
                    )));
                }
            }
        }
        self.ensure_contained(&path, rel)?;
        Ok(path)
    }

    /// Fails with `InvalidPath` unless the deepest existing ancestor of an
    /// already-built path canonicalizes inside the root.
    pub fn ensure_inside(&self, path: &Path) -> Result<()> {
        self.ensure_contained(path, &self.relative(path))
    }

    fn ensure_contained(&self, path: &Path, rel: &str) -> Result<()> {
        let existing = path
            .ancestors()
            .find(|p| p.exists())
            .unwrap_or(self.root.as_path());
        let canonical = existing
            .canonicalize()
            .map_err(|e| NotasError::io(rel, e))?;
        if canonical.starts_with(&self.root) {
            Ok(())
        } else {
            Err(NotasError::InvalidPath(format!(
                "{} resolves outside the corpus root",
                rel
            )))
        }
    }

    /// Expresses a path under the root as `/a/b`, the root itself as `/`.
    pub fn relative(&self, path: &Path) -> String {
        let rest = path.strip_prefix(&self.root).unwrap_or(path);
        let parts: Vec<String> = rest
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    /// The closest directory at or above `rel`, never above the root.
    pub fn nearest_directory(&self, rel: &str) -> Result<PathBuf> {
        let mut path = self.resolve(rel)?;
        while !path.is_dir() && path != self.root {
            if !path.pop() {
                break;
            }
        }
        Ok(path)
    }

    pub fn is_document(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.len() > self.config.doc_ext.len() && n.ends_with(&self.config.doc_ext))
    }

    pub fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .is_some_and(|e| self.config.image_extensions.iter().any(|x| *x == e))
    }

    /// True for the trash directory at the root and everything below it.
    pub fn is_trash(&self, path: &Path) -> bool {
        match path.strip_prefix(&self.root) {
            Ok(rest) => rest
                .components()
                .next()
                .is_some_and(|c| c.as_os_str() == OsStr::new(&self.config.trash_dir)),
            Err(_) => false,
        }
    }

    pub fn trash_path(&self) -> PathBuf {
        self.root.join(&self.config.trash_dir)
    }

    /// The trash directory, created on first use. A symlink or a plain file
    /// in its place is refused so trashing never moves data out of the root.
    pub fn prepare_trash(&self) -> Result<PathBuf> {
        let trash = self.trash_path();
        let rel = self.relative(&trash);
        match fs::symlink_metadata(&trash) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(NotasError::InvalidPath(format!(
                    "{} is not a real directory",
                    rel
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir(&trash).map_err(|e| NotasError::io(rel.clone(), e))?;
            }
            Err(e) => return Err(NotasError::io(rel, e)),
        }
        self.ensure_contained(&trash, &rel)?;
        Ok(trash)
    }

    /// Lists every directory and file under `start` (itself included),
    /// sorted by corpus-relative path, trash pruned.
    ///
    /// Symlinks below `start` are left out: a link may point anywhere, and
    /// following it would let the listing leave the root.
    pub fn walk(&self, start: &Path) -> Result<Vec<CorpusEntry>> {
        let walker = WalkDir::new(start)
            .into_iter()
            .filter_entry(|e| !self.is_trash(e.path()) && !is_temp_file(e.path()));

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let rel = err.path().map(|p| self.relative(p)).unwrap_or_default();
                    if err.io_error().map(|e| e.kind()) == Some(ErrorKind::NotFound) {
                        warn!(path = %rel, "entry vanished during walk");
                        continue;
                    }
                    return Err(NotasError::io(rel, err.into()));
                }
            };
            if entry.depth() > 0 && entry.path_is_symlink() {
                debug!(path = %self.relative(entry.path()), "skipping symlink");
                continue;
            }
            entries.push(CorpusEntry {
                path: self.relative(entry.path()),
                is_dir: entry.file_type().is_dir(),
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(start = %self.relative(start), count = entries.len(), "walked corpus");
        Ok(entries)
    }

    pub fn read_document(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| NotasError::io(self.relative(path), e))
    }

    /// Creates an empty file (and its parents) unless something already sits
    /// at `path`. Returns whether a file was created.
    pub fn create_empty(&self, path: &Path) -> Result<bool> {
        self.ensure_inside(path)?;
        let rel = self.relative(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| NotasError::io(rel.clone(), e))?;
        }
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(NotasError::io(rel, e)),
        }
    }

    /// Replaces the file at `path` through a temp file and a rename, creating
    /// parent directories as needed.
    /// The target is checked against the root first, so a symlinked parent
    /// pointing elsewhere is refused before anything is created.
    pub fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_inside(path)?;
        let rel = self.relative(path);
        let parent = path
            .parent()
            .ok_or_else(|| NotasError::InvalidPath(format!("{} has no parent", rel)))?;
        fs::create_dir_all(parent).map_err(|e| NotasError::io(rel.clone(), e))?;

        let tmp_path = parent.join(format!("{}{}.tmp", TEMP_PREFIX, Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(|e| NotasError::io(rel.clone(), e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(NotasError::io(rel, e));
        }
        Ok(())
    }
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEMP_PREFIX) && n.ends_with(".tmp"))
}
