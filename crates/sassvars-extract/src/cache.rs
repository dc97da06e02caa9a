//! Per-file store of resolved variable values.
//!
//! Copyright (c) 2025 Posit, PBC

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Output-convention variable name → resolved textual value.
pub type VarMap = BTreeMap<String, String>;

/// Resolved values for every file an engine has been asked about.
///
/// Entries only grow: a name, once resolved for a file, keeps its first
/// value for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<PathBuf, VarMap>,
    /// Files whose complete variable set has been resolved
    complete: HashSet<PathBuf>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&VarMap> {
        self.entries.get(path)
    }

    /// The entry for `path`, created empty on first use.
    pub fn entry(&mut self, path: &Path) -> &VarMap {
        self.entries.entry(path.to_path_buf()).or_default()
    }

    /// The names from `names` that have no cached value for `path`,
    /// deduplicated, in request order.
    pub fn missing<S: AsRef<str>>(&self, path: &Path, names: &[S]) -> Vec<String> {
        let known = self.entries.get(path);
        let mut seen = HashSet::new();
        names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !known.is_some_and(|vars| vars.contains_key(*name)))
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    /// Merge newly resolved values into the entry for `path`.
    ///
    /// Names that already have a value keep it.
    pub fn merge(&mut self, path: &Path, resolved: VarMap) -> &VarMap {
        let vars = self.entries.entry(path.to_path_buf()).or_default();
        for (name, value) in resolved {
            match vars.get(&name) {
                Some(existing) if *existing != value => {
                    tracing::warn!(
                        path = %path.display(),
                        name = %name,
                        cached = %existing,
                        resolved = %value,
                        "Ignoring changed value for cached variable"
                    );
                }
                Some(_) => {}
                None => {
                    vars.insert(name, value);
                }
            }
        }
        vars
    }

    pub fn mark_complete(&mut self, path: &Path) {
        self.complete.insert(path.to_path_buf());
    }

    pub fn is_complete(&self, path: &Path) -> bool {
        self.complete.contains(path)
    }

    /// Number of files with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
