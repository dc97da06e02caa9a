//! Variable name discovery across a stylesheet's import closure.
//!
//! Copyright (c) 2025 Posit, PBC

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use sassvars_system_runtime::{SystemRuntime, normalize_components};

use crate::dialect::resolve_source;
use crate::error::{Result, SassVarsError};
use crate::syntax::parse_stylesheet;

/// Collect every variable name declared at the top level of `path` or of
/// any file it (transitively) `@import`s.
///
/// Names are returned exactly as declared, without the `$`. Each file is
/// parsed at most once per call: a file reached again through another
/// import path (or through an import cycle) contributes nothing new.
/// Nothing is cached between calls.
pub fn discover_names(runtime: &dyn SystemRuntime, path: &Path) -> Result<BTreeSet<String>> {
    let mut discovery = NameDiscovery {
        runtime,
        names: BTreeSet::new(),
        visited: HashSet::new(),
    };
    discovery.visit(path)?;

    tracing::debug!(
        path = %path.display(),
        files = discovery.visited.len(),
        names = discovery.names.len(),
        "Discovered SASS variable names"
    );
    Ok(discovery.names)
}

/// Resolve an import path against the directory of the importing file.
///
/// The result is normalized lexically; symlinks are left alone.
pub fn resolve_import_path(importer: &Path, import: &str) -> PathBuf {
    let joined = importer
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(import);
    normalize_components(&joined)
}

struct NameDiscovery<'a> {
    runtime: &'a dyn SystemRuntime,
    names: BTreeSet<String>,
    visited: HashSet<PathBuf>,
}

impl NameDiscovery<'_> {
    fn visit(&mut self, path: &Path) -> Result<()> {
        let source = resolve_source(self.runtime, path)?;
        let key = self
            .runtime
            .canonicalize(&source.path)
            .unwrap_or_else(|_| source.path.clone());
        if !self.visited.insert(key) {
            tracing::trace!(path = %source.path.display(), "Already visited, skipping");
            return Ok(());
        }

        let contents = self
            .runtime
            .file_read_string(&source.path)
            .map_err(|e| SassVarsError::Io {
                path: source.path.clone(),
                source: e,
            })?;
        let sheet = parse_stylesheet(&contents, source.dialect, &source.path)?;

        self.names
            .extend(sheet.variables().map(|decl| decl.name.clone()));

        for import in sheet.imports() {
            let target = resolve_import_path(&source.path, &import);
            tracing::trace!(
                from = %source.path.display(),
                to = %target.display(),
                "Following import"
            );
            self.visit(&target)?;
        }

        Ok(())
    }
}
