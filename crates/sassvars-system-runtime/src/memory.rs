/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * In-memory runtime for stylesheets that never touch the disk.
 */

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime, normalize_components};

/// Helper function to create a "not found" error.
fn not_found_error(path: &Path) -> RuntimeError {
    RuntimeError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("Path not found: {}", path.display()),
    ))
}

#[derive(Debug, Default)]
struct VirtualFiles {
    /// File contents, keyed by normalized absolute path
    files: HashMap<PathBuf, Vec<u8>>,
    /// Directory entries (automatically includes parents of all files)
    directories: HashSet<PathBuf>,
}

/// Runtime serving files from an in-memory virtual filesystem.
///
/// Paths are normalized lexically and relative paths are taken relative to
/// the root (`/`). Adding a file creates all of its parent directories.
///
/// Thread safety: Uses RwLock to satisfy the Send + Sync trait bounds.
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    vfs: RwLock<VirtualFiles>,
}

impl MemoryRuntime {
    /// Create a new empty virtual filesystem.
    pub fn new() -> Self {
        let runtime = Self::default();
        runtime.write().directories.insert(PathBuf::from("/"));
        runtime
    }

    /// Add (or replace) a file, creating all parent directories.
    pub fn add_file(&self, path: &Path, contents: impl Into<Vec<u8>>) {
        let normalized = Self::normalize_path(path);
        let mut vfs = self.write();
        if let Some(parent) = normalized.parent() {
            let mut current = PathBuf::new();
            for component in parent.components() {
                current.push(component);
                vfs.directories.insert(current.clone());
            }
        }
        vfs.files.insert(normalized, contents.into());
    }

    /// Normalize a path to an absolute path.
    pub fn normalize_path(path: &Path) -> PathBuf {
        if path.is_absolute() {
            normalize_components(path)
        } else {
            normalize_components(&Path::new("/").join(path))
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, VirtualFiles> {
        self.vfs.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, VirtualFiles> {
        self.vfs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SystemRuntime for MemoryRuntime {
    fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let normalized = Self::normalize_path(path);
        self.read()
            .files
            .get(&normalized)
            .cloned()
            .ok_or_else(|| not_found_error(&normalized))
    }

    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool> {
        let normalized = Self::normalize_path(path);
        let vfs = self.read();
        let is_file = vfs.files.contains_key(&normalized);
        let is_dir = vfs.directories.contains(&normalized);
        Ok(match kind {
            None => is_file || is_dir,
            Some(PathKind::File) => is_file,
            Some(PathKind::Directory) => is_dir,
        })
    }

    fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf> {
        Ok(Self::normalize_path(path))
    }
}
