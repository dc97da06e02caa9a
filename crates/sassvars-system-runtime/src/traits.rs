/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the SystemRuntime trait and supporting types for the runtime abstraction layer.
 */

use std::io;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug)]
pub enum RuntimeError {
    /// Standard I/O error
    Io(io::Error),

    /// SASS compilation failed
    SassError(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
            RuntimeError::SassError(msg) => write!(f, "SASS compilation error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> Self {
        RuntimeError::Io(e)
    }
}

/// Type of filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Trait defining the file operations variable extraction needs.
///
/// Implementations decide where stylesheets come from. The same runtime is
/// handed to name discovery and to the SASS compiler, so an import that
/// discovery can follow is also one the compiler can load.
pub trait SystemRuntime: Send + Sync {
    /// Read entire file contents as bytes.
    fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Read file as string with UTF-8 encoding.
    ///
    /// Default implementation reads bytes and converts to string.
    fn file_read_string(&self, path: &Path) -> RuntimeResult<String> {
        let bytes = self.file_read(path)?;
        String::from_utf8(bytes).map_err(|e| {
            RuntimeError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid UTF-8 in file: {}", e),
            ))
        })
    }

    /// Check if path exists, optionally filtering by type.
    fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool>;

    /// Check if path exists and is a file.
    ///
    /// Convenience method that calls `path_exists` with `PathKind::File`.
    fn is_file(&self, path: &Path) -> RuntimeResult<bool> {
        self.path_exists(path, Some(PathKind::File))
    }

    /// Check if path exists and is a directory.
    ///
    /// Convenience method that calls `path_exists` with `PathKind::Directory`.
    fn is_dir(&self, path: &Path) -> RuntimeResult<bool> {
        self.path_exists(path, Some(PathKind::Directory))
    }

    /// Make a path absolute and remove `.` and `..` components.
    ///
    /// The native runtime resolves symlinks when the path exists; the memory
    /// runtime only normalizes lexically.
    fn canonicalize(&self, path: &Path) -> RuntimeResult<PathBuf>;
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Never climbs above the root.
pub fn normalize_components(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                // Relative paths keep leading `..`
                _ => normalized.push(".."),
            },
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_components() {
        assert_eq!(
            normalize_components(Path::new("/a/b/../c/./d.scss")),
            PathBuf::from("/a/c/d.scss")
        );
        assert_eq!(
            normalize_components(Path::new("/../x.sass")),
            PathBuf::from("/x.sass")
        );
        assert_eq!(
            normalize_components(Path::new("../a/./../b")),
            PathBuf::from("../b")
        );
    }

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::SassError("Undefined variable.".to_string());
        assert_eq!(err.to_string(), "SASS compilation error: Undefined variable.");

        let io_err = RuntimeError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().starts_with("I/O error"));
        assert!(std::error::Error::source(&io_err).is_some());
    }
}
