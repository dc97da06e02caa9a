//! grass-backed rendering over a `SystemRuntime` (native only).
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The compiler resolves `@import`/`@use` itself. Routing its file access
//! through [`RuntimeFs`] means it sees the same tree that name discovery
//! walked, including purely in-memory trees.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};

use crate::traits::{RuntimeError, RuntimeResult, SystemRuntime};

/// `grass::Fs` view of a `SystemRuntime`.
pub struct RuntimeFs<'a> {
    runtime: &'a dyn SystemRuntime,
}

impl<'a> RuntimeFs<'a> {
    pub fn new(runtime: &'a dyn SystemRuntime) -> Self {
        Self { runtime }
    }
}

impl fmt::Debug for RuntimeFs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeFs").finish_non_exhaustive()
    }
}

impl grass::Fs for RuntimeFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.runtime.is_dir(path).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.runtime.is_file(path).unwrap_or(false)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.runtime.file_read(path).map_err(|e| match e {
            RuntimeError::Io(io_err) => io_err,
            other => io::Error::other(other.to_string()),
        })
    }
}

/// Render `scss` to expanded CSS, one declaration per line.
///
/// `load_paths` are searched in order for imports that do not resolve
/// relative to the importing file. Compiler diagnostics come back as
/// [`RuntimeError::SassError`].
pub fn compile_expanded(
    runtime: &dyn SystemRuntime,
    scss: &str,
    load_paths: &[PathBuf],
) -> RuntimeResult<String> {
    let fs = RuntimeFs::new(runtime);
    let options = Options::default()
        .fs(&fs)
        .load_paths(load_paths)
        .style(OutputStyle::Expanded);

    tracing::trace!(
        bytes = scss.len(),
        load_paths = load_paths.len(),
        "Rendering SCSS"
    );

    grass::from_string(scss, &options).map_err(|e| RuntimeError::SassError(e.to_string()))
}
