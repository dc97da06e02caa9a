//! Stylesheet dialects and entry-path inference.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fmt;
use std::path::{Path, PathBuf};

use sassvars_system_runtime::SystemRuntime;

use crate::error::{Result, SassVarsError};

/// The two stylesheet syntaxes, told apart by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Indentation-based syntax (`.sass`)
    Sass,
    /// Brace-and-semicolon syntax (`.scss`)
    Scss,
}

impl Dialect {
    /// Probe order for extension-less paths.
    pub const PROBE_ORDER: [Dialect; 2] = [Dialect::Sass, Dialect::Scss];

    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Sass => "sass",
            Dialect::Scss => "scss",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "sass" => Some(Dialect::Sass),
            "scss" => Some(Dialect::Scss),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A stylesheet located on disk (or in the runtime's filesystem).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub path: PathBuf,
    pub dialect: Dialect,
}

/// Determine the file and dialect a path refers to.
///
/// - `.sass` / `.scss` paths resolve to the file itself, or to its partial
///   `_<name>.<ext>` in the same directory
/// - extension-less paths probe `<path>.sass`, then `<path>.scss`, then the
///   partial forms `_<name>.sass` and `_<name>.scss`
/// - any other extension is rejected
///
/// A path with no matching file fails with
/// [`SassVarsError::ImportResolution`].
pub fn resolve_source(runtime: &dyn SystemRuntime, path: &Path) -> Result<SourceFile> {
    let candidates = match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy();
            let Some(dialect) = Dialect::from_extension(&ext) else {
                return Err(SassVarsError::UnknownExtension {
                    path: path.to_path_buf(),
                    extension: ext.into_owned(),
                });
            };
            explicit_candidates(path, dialect)
        }
        None => probe_candidates(path),
    };

    candidates
        .into_iter()
        .find(|candidate| runtime.is_file(&candidate.path).unwrap_or(false))
        .ok_or_else(|| SassVarsError::ImportResolution {
            path: path.to_path_buf(),
        })
}

fn explicit_candidates(path: &Path, dialect: Dialect) -> Vec<SourceFile> {
    let mut candidates = vec![SourceFile {
        path: path.to_path_buf(),
        dialect,
    }];
    if let Some(partial) = partial_path(path) {
        candidates.push(SourceFile {
            path: partial,
            dialect,
        });
    }
    candidates
}

fn probe_candidates(path: &Path) -> Vec<SourceFile> {
    let mut candidates: Vec<SourceFile> = Dialect::PROBE_ORDER
        .into_iter()
        .map(|dialect| SourceFile {
            path: path.with_extension(dialect.extension()),
            dialect,
        })
        .collect();

    if let Some(partial) = partial_path(path) {
        candidates.extend(Dialect::PROBE_ORDER.into_iter().map(|dialect| SourceFile {
            path: partial.with_extension(dialect.extension()),
            dialect,
        }));
    }

    candidates
}

/// `dir/_name` for `dir/name`; `None` when the name is already a partial.
fn partial_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_string_lossy();
    if name.starts_with('_') {
        return None;
    }
    Some(path.with_file_name(format!("_{}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassvars_system_runtime::MemoryRuntime;

    #[test]
    fn test_explicit_extensions() {
        let rt = MemoryRuntime::new();
        rt.add_file(Path::new("/t/abc.scss"), "$a: 1;");
        rt.add_file(Path::new("/t/abc.sass"), "$a: 1");

        let scss = resolve_source(&rt, Path::new("/t/abc.scss")).unwrap();
        assert_eq!(scss.path, PathBuf::from("/t/abc.scss"));
        assert_eq!(scss.dialect, Dialect::Scss);

        let sass = resolve_source(&rt, Path::new("/t/abc.sass")).unwrap();
        assert_eq!(sass.dialect, Dialect::Sass);
    }

    #[test]
    fn test_explicit_extension_falls_back_to_partial() {
        let rt = MemoryRuntime::new();
        rt.add_file(Path::new("/t/_palette.scss"), "$red: red;");

        let source = resolve_source(&rt, Path::new("/t/palette.scss")).unwrap();
        assert_eq!(source.path, PathBuf::from("/t/_palette.scss"));
        assert_eq!(source.dialect, Dialect::Scss);

        // The partial keeps the requested dialect
        let err = resolve_source(&rt, Path::new("/t/palette.sass")).unwrap_err();
        assert!(matches!(err, SassVarsError::ImportResolution { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_import_error() {
        let rt = MemoryRuntime::new();
        let err = resolve_source(&rt, Path::new("/t/gone.scss")).unwrap_err();
        assert!(
            matches!(err, SassVarsError::ImportResolution { ref path } if path == Path::new("/t/gone.scss"))
        );
    }

    #[test]
    fn test_unknown_extension() {
        let rt = MemoryRuntime::new();
        let err = resolve_source(&rt, Path::new("abc.html")).unwrap_err();
        assert!(
            matches!(err, SassVarsError::UnknownExtension { ref extension, .. } if extension == "html")
        );
    }

    #[test]
    fn test_probe_prefers_sass() {
        let rt = MemoryRuntime::new();
        rt.add_file(Path::new("/t/ambig.sass"), "$a: 1");
        rt.add_file(Path::new("/t/ambig.scss"), "$a: 1;");
        rt.add_file(Path::new("/t/only.scss"), "$b: 2;");

        let ambig = resolve_source(&rt, Path::new("/t/ambig")).unwrap();
        assert_eq!(ambig.path, PathBuf::from("/t/ambig.sass"));
        assert_eq!(ambig.dialect, Dialect::Sass);

        let only = resolve_source(&rt, Path::new("/t/only")).unwrap();
        assert_eq!(only.path, PathBuf::from("/t/only.scss"));
        assert_eq!(only.dialect, Dialect::Scss);
    }

    #[test]
    fn test_probe_falls_back_to_partials() {
        let rt = MemoryRuntime::new();
        rt.add_file(Path::new("/t/_colors.scss"), "$red: red;");

        let source = resolve_source(&rt, Path::new("/t/colors")).unwrap();
        assert_eq!(source.path, PathBuf::from("/t/_colors.scss"));
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let rt = MemoryRuntime::new();
        let err = resolve_source(&rt, Path::new("/t/nothing")).unwrap_err();
        assert!(matches!(err, SassVarsError::ImportResolution { .. }));
        assert!(err.to_string().contains("/t/nothing"));
    }
}
